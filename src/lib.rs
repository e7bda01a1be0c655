//! # shmwire
//!
//! Wire-protocol codec for a distributed shared-memory object store:
//! - Command registry of every request and reply name
//! - Schema-free documents with typed field access
//! - One encoder/decoder pair per operation
//! - A single reply envelope: normal payload or `error_reply`
//! - Receiver-side dispatch to a business handler
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   encode    ┌──────────────┐   decode    ┌──────────────┐
//! │    Client    │────────────▶│  Transport   │────────────▶│  Dispatcher  │
//! │ (*Request)   │             │  (external)  │             │  → Handler   │
//! └──────▲───────┘             └──────────────┘             └──────┬───────┘
//!        │          read_reply                       normal or     │
//!        └─────────────────────────────────────────── error_reply ─┘
//! ```
//!
//! The codec holds no state: every call is independent and safe to run from
//! any number of threads.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod status;
pub mod object;

pub mod protocol;
pub mod dispatch;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, WireError};
pub use config::Config;
pub use status::{Status, StatusCode};
pub use object::{InstanceId, Location, ObjectId, PayloadBlock};
pub use dispatch::{Dispatcher, Handler};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of shmwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
