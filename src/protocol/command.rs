//! Command registry
//!
//! Two closed sets: [`CommandType`] for requests and [`ReplyType`] for reply
//! shapes. Both map to canonical wire names through static tables that are
//! never mutated, so lookups need no synchronization.

use std::fmt;

use crate::error::{Result, WireError};

/// Request operation codes
///
/// Codes 2, 4, 6, 7, 23 and 24 are unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    /// Sentinel for a name that is not in the registry
    Null = 0,
    Exit = 1,
    Register = 3,
    GetData = 5,
    Persist = 8,
    Exists = 9,
    DelData = 10,
    ClusterMeta = 11,
    ListData = 12,
    CreateBuffer = 13,
    GetBuffers = 14,
    CreateData = 15,
    PutName = 16,
    GetName = 17,
    DropName = 18,
    CreateStream = 19,
    GetNextStreamChunk = 20,
    PullNextStreamChunk = 21,
    StopStream = 22,
    IfPersist = 25,
    InstanceStatus = 26,
    ShallowCopy = 27,
}

/// Every real request kind with its wire name
const COMMANDS: &[(CommandType, &str)] = &[
    (CommandType::Exit, "exit_request"),
    (CommandType::Register, "register_request"),
    (CommandType::GetData, "get_data_request"),
    (CommandType::Persist, "persist_request"),
    (CommandType::Exists, "exists_request"),
    (CommandType::DelData, "del_data_request"),
    (CommandType::ClusterMeta, "cluster_meta_request"),
    (CommandType::ListData, "list_data_request"),
    (CommandType::CreateBuffer, "create_buffer_request"),
    (CommandType::GetBuffers, "get_buffers_request"),
    (CommandType::CreateData, "create_data_request"),
    (CommandType::PutName, "put_name_request"),
    (CommandType::GetName, "get_name_request"),
    (CommandType::DropName, "drop_name_request"),
    (CommandType::CreateStream, "create_stream_request"),
    (CommandType::GetNextStreamChunk, "get_next_stream_chunk_request"),
    (CommandType::PullNextStreamChunk, "pull_next_stream_chunk_request"),
    (CommandType::StopStream, "stop_stream_request"),
    (CommandType::IfPersist, "if_persist_request"),
    (CommandType::InstanceStatus, "instance_status_request"),
    (CommandType::ShallowCopy, "shallow_copy_request"),
];

impl CommandType {
    /// Look up a wire name; unknown names yield [`CommandType::Null`]
    pub fn parse(name: &str) -> CommandType {
        COMMANDS
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(cmd, _)| *cmd)
            .unwrap_or(CommandType::Null)
    }

    /// Like [`parse`](Self::parse), but the sentinel becomes `UnknownCommand`
    pub fn from_name(name: &str) -> Result<CommandType> {
        match Self::parse(name) {
            CommandType::Null => Err(WireError::UnknownCommand(name.to_string())),
            cmd => Ok(cmd),
        }
    }

    /// Look up a numeric code; unassigned codes yield [`CommandType::Null`]
    pub fn from_code(code: u8) -> CommandType {
        COMMANDS
            .iter()
            .find(|(cmd, _)| cmd.code() == code)
            .map(|(cmd, _)| *cmd)
            .unwrap_or(CommandType::Null)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Canonical wire name; the sentinel has the name `null_command`
    pub fn name(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(cmd, _)| *cmd == self)
            .map(|(_, n)| *n)
            .unwrap_or("null_command")
    }

    /// Shape of the normal reply; `None` for Exit and the sentinel
    pub fn reply_type(self) -> Option<ReplyType> {
        let reply = match self {
            CommandType::Null | CommandType::Exit => return None,
            CommandType::Register => ReplyType::Register,
            // Listing answers with the same object-metadata map as GetData
            CommandType::GetData | CommandType::ListData => ReplyType::GetData,
            CommandType::Persist => ReplyType::Persist,
            CommandType::Exists => ReplyType::Exists,
            CommandType::DelData => ReplyType::DelData,
            CommandType::ClusterMeta => ReplyType::ClusterMeta,
            CommandType::CreateBuffer => ReplyType::CreateBuffer,
            CommandType::GetBuffers => ReplyType::GetBuffers,
            CommandType::CreateData => ReplyType::CreateData,
            CommandType::PutName => ReplyType::PutName,
            CommandType::GetName => ReplyType::GetName,
            CommandType::DropName => ReplyType::DropName,
            CommandType::CreateStream => ReplyType::CreateStream,
            CommandType::GetNextStreamChunk => ReplyType::GetNextStreamChunk,
            CommandType::PullNextStreamChunk => ReplyType::PullNextStreamChunk,
            CommandType::StopStream => ReplyType::StopStream,
            CommandType::IfPersist => ReplyType::IfPersist,
            CommandType::InstanceStatus => ReplyType::InstanceStatus,
            CommandType::ShallowCopy => ReplyType::ShallowCopy,
        };
        Some(reply)
    }

    /// All registered request kinds, in code order
    pub fn all() -> impl Iterator<Item = CommandType> {
        COMMANDS.iter().map(|(cmd, _)| *cmd)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reply shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyType {
    /// Generic failure shape, substitutes for any normal reply
    Error,
    Register,
    GetData,
    Persist,
    Exists,
    DelData,
    ClusterMeta,
    CreateBuffer,
    GetBuffers,
    CreateData,
    PutName,
    GetName,
    DropName,
    CreateStream,
    GetNextStreamChunk,
    PullNextStreamChunk,
    StopStream,
    IfPersist,
    InstanceStatus,
    ShallowCopy,
}

const REPLIES: &[(ReplyType, &str)] = &[
    (ReplyType::Error, "error_reply"),
    (ReplyType::Register, "register_reply"),
    (ReplyType::GetData, "get_data_reply"),
    (ReplyType::Persist, "persist_reply"),
    (ReplyType::Exists, "exists_reply"),
    (ReplyType::DelData, "del_data_reply"),
    (ReplyType::ClusterMeta, "cluster_meta_reply"),
    (ReplyType::CreateBuffer, "create_buffer_reply"),
    (ReplyType::GetBuffers, "get_buffers_reply"),
    (ReplyType::CreateData, "create_data_reply"),
    (ReplyType::PutName, "put_name_reply"),
    (ReplyType::GetName, "get_name_reply"),
    (ReplyType::DropName, "drop_name_reply"),
    (ReplyType::CreateStream, "create_stream_reply"),
    (ReplyType::GetNextStreamChunk, "get_next_stream_chunk_reply"),
    (ReplyType::PullNextStreamChunk, "pull_next_stream_chunk_reply"),
    (ReplyType::StopStream, "stop_stream_reply"),
    (ReplyType::IfPersist, "if_persist_reply"),
    (ReplyType::InstanceStatus, "instance_status_reply"),
    (ReplyType::ShallowCopy, "shallow_copy_reply"),
];

impl ReplyType {
    /// Look up a wire name
    pub fn parse(name: &str) -> Option<ReplyType> {
        REPLIES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(reply, _)| *reply)
    }

    pub fn name(self) -> &'static str {
        REPLIES
            .iter()
            .find(|(reply, _)| *reply == self)
            .map(|(_, n)| *n)
            .unwrap_or("error_reply")
    }

    pub fn all() -> impl Iterator<Item = ReplyType> {
        REPLIES.iter().map(|(reply, _)| *reply)
    }
}

impl fmt::Display for ReplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of any request or reply kind; either way a registry name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request(CommandType),
    Reply(ReplyType),
}

impl MessageKind {
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Request(cmd) => cmd.name(),
            MessageKind::Reply(reply) => reply.name(),
        }
    }

    /// Classify a wire name
    pub fn parse(name: &str) -> Result<MessageKind> {
        match CommandType::parse(name) {
            CommandType::Null => ReplyType::parse(name)
                .map(MessageKind::Reply)
                .ok_or_else(|| WireError::UnknownCommand(name.to_string())),
            cmd => Ok(MessageKind::Request(cmd)),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
