//! shmwire Inspector
//!
//! Validates and pretty-prints captured protocol messages.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shmwire::protocol::{
    write_error, CommandType, Document, MessageKind, Reply, ReplyBody, ReplyType, Request,
};
use shmwire::{Status, StatusCode};
use tracing_subscriber::{fmt, EnvFilter};

/// shmwire Inspector
#[derive(Parser, Debug)]
#[command(name = "shmwire-inspect")]
#[command(about = "Inspect object-store protocol messages")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one message and print its kind and fields
    Decode {
        /// File holding the message (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// List every registered request and reply name
    Commands,

    /// Print an encoded error reply
    Error {
        /// Numeric status code
        #[arg(short, long)]
        code: i64,

        /// Human-readable message
        #[arg(short, long, default_value = "")]
        message: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shmwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Decode { file } => {
            if let Err(e) = decode(file) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Commands => {
            for cmd in CommandType::all() {
                println!("{:>3}  {}", cmd.code(), cmd.name());
            }
            for reply in ReplyType::all() {
                println!("  -  {}", reply.name());
            }
        }
        Commands::Error { code, message } => {
            println!("{}", write_error(&Status::new(StatusCode::from_code(code), message)));
        }
    }
}

/// Decode a message of any kind, printing a summary on success
fn decode(file: Option<PathBuf>) -> Result<(), String> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            buf
        }
    };

    let doc = Document::parse(raw.trim()).map_err(|e| e.to_string())?;
    let tag = doc.type_tag().map_err(|e| e.to_string())?;

    match MessageKind::parse(tag).map_err(|e| e.to_string())? {
        MessageKind::Request(cmd) => {
            Request::from_document(&doc).map_err(|e| e.to_string())?;
            println!("request  {} (code {})", cmd.name(), cmd.code());
        }
        MessageKind::Reply(_) => match ReplyBody::read(raw.trim()).map_err(|e| e.to_string())? {
            Reply::Ok(body) => println!("reply    {}", body.reply_type()),
            Reply::Error(status) => println!("error    {}", status),
        },
    }

    println!("{}", doc.to_pretty());
    Ok(())
}
