//! Dispatch Module
//!
//! Receiver-side routing: decode a request, hand it to a [`Handler`], encode
//! whichever reply shape the handler's result calls for.
//!
//! ## Failure Layers
//! - Decode failures and unknown commands come back as `Err`: they are
//!   connection-level protocol errors and the caller decides whether to drop
//!   the session.
//! - Handler failures become an `error_reply` carrying the handler's status.

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{write_error, CommandType, Document, ReplyBody, Request};
use crate::status::Status;

/// Business logic behind the protocol
///
/// Requests carrying a `wait` flag may block inside `handle`; the codec only
/// passes the flag along.
pub trait Handler {
    fn handle(&mut self, request: Request) -> std::result::Result<ReplyBody, Status>;
}

impl<F> Handler for F
where
    F: FnMut(Request) -> std::result::Result<ReplyBody, Status>,
{
    fn handle(&mut self, request: Request) -> std::result::Result<ReplyBody, Status> {
        self(request)
    }
}

/// Routes raw request text to a handler
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: Config,
}

impl Dispatcher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decode request text under the configured size limit
    pub fn decode(&self, raw: &str) -> Result<Request> {
        let doc = Document::parse_with_limit(raw, self.config.max_message_size)?;
        Request::from_document(&doc).map_err(|e| {
            tracing::warn!("Rejecting request: {}", e);
            e
        })
    }

    /// Handle one request; `Ok(None)` means the peer asked to exit
    pub fn dispatch<H: Handler + ?Sized>(&self, raw: &str, handler: &mut H) -> Result<Option<String>> {
        if self.config.trace_payloads {
            tracing::trace!("Request: {}", raw);
        }

        let request = self.decode(raw)?;
        let command = request.command_type();
        tracing::debug!("Dispatching {}", command);

        if command == CommandType::Exit {
            return Ok(None);
        }

        let reply = match handler.handle(request) {
            Ok(body) => self.check_shape(command, body),
            Err(status) => {
                tracing::debug!("{} failed: {}", command, status);
                write_error(&status)
            }
        };

        if self.config.trace_payloads {
            tracing::trace!("Reply: {}", reply);
        }
        Ok(Some(reply))
    }

    /// Encode `body`, or an `Invalid` error reply if it is not the shape
    /// `command` answers with or cannot be decoded by the peer
    fn check_shape(&self, command: CommandType, body: ReplyBody) -> String {
        if command.reply_type() == Some(body.reply_type()) {
            return body.try_encode().unwrap_or_else(|e| {
                tracing::warn!("Cannot send {} reply: {}", command, e);
                write_error(&e.to_status())
            });
        }

        tracing::warn!(
            "Handler answered {} with {}; sending error reply",
            command,
            body.reply_type()
        );
        write_error(&Status::invalid(format!(
            "handler produced {} for {}",
            body.reply_type(),
            command
        )))
    }
}
