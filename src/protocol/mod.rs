//! Protocol Module
//!
//! Defines the request/reply contract between clients and the store daemon.
//!
//! ## Message Format
//!
//! Every message is a JSON document with a mandatory `type` tag naming the
//! operation, plus that operation's fields:
//!
//! ```text
//! {"type": "create_buffer_request", "size": 4096}
//! ```
//!
//! ### Layers
//! - `command`:  registry of request and reply names
//! - `document`: schema-free `Value`/`Document` and the JSON text form
//! - `field`:    typed conversions into and out of document fields
//! - `message`:  the `Message` trait (tagging, tag checks, encode/decode)
//! - `request` / `reply`: one struct per operation
//!
//! ### Replies
//! A reply is either the operation's own `<op>_reply` shape or the generic
//! `error_reply`; see [`read_reply`].

#[macro_use]
mod message;

mod command;
mod document;
mod field;
mod reply;
mod request;

pub use command::{CommandType, MessageKind, ReplyType};
pub use document::{Document, Value, MAX_DEPTH, MAX_MESSAGE_SIZE, TYPE_FIELD};
pub use field::Field;
pub use message::{expect_type, Message};
pub use reply::{
    read_error, read_reply, read_reply_document, write_error, write_reply, ClusterMetaReply,
    CreateBufferReply, CreateDataReply, CreateStreamReply, DelDataReply, DropNameReply,
    ErrorReply, ExistsReply, GetBuffersReply, GetDataReply, GetNameReply,
    GetNextStreamChunkReply, IfPersistReply, InstanceStatusReply, PersistReply,
    PullNextStreamChunkReply, PutNameReply, RegisterReply, Reply, ReplyBody, ShallowCopyReply,
    StopStreamReply,
};
pub use request::{
    ClusterMetaRequest, CreateBufferRequest, CreateDataRequest, CreateStreamRequest,
    DelDataRequest, DropNameRequest, ExistsRequest, ExitRequest, GetBuffersRequest,
    GetDataRequest, GetNameRequest, GetNextStreamChunkRequest, IfPersistRequest,
    InstanceStatusRequest, ListDataRequest, PersistRequest, PullNextStreamChunkRequest,
    PutNameRequest, RegisterRequest, Request, ShallowCopyRequest, StopStreamRequest,
    DEFAULT_LIST_LIMIT,
};
