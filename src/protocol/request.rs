//! Request messages
//!
//! One struct per operation a client can ask of the daemon. Flags that opt
//! into blocking (`wait`, `sync_remote`) are carried through untouched; any
//! blocking is the handler's business.

use std::collections::BTreeSet;

use crate::error::{Result, WireError};
use crate::object::ObjectId;
use super::command::{CommandType, MessageKind};
use super::document::Document;
use super::message::{read_ids, Message};

/// Default cap on the number of objects a listing returns
pub const DEFAULT_LIST_LIMIT: usize = 5;

// =============================================================================
// Connection lifecycle
// =============================================================================

empty_message! {
    /// Open a session; the daemon answers with its endpoints and instance id
    RegisterRequest => MessageKind::Request(CommandType::Register)
}

empty_message! {
    /// Close the session; there is no reply
    ExitRequest => MessageKind::Request(CommandType::Exit)
}

// =============================================================================
// Object metadata
// =============================================================================

/// Fetch metadata for one or more objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDataRequest {
    pub ids: Vec<ObjectId>,
    /// Refresh metadata from other instances before answering
    pub sync_remote: bool,
    /// Block until the objects exist
    pub wait: bool,
}

impl GetDataRequest {
    pub fn new(ids: Vec<ObjectId>, sync_remote: bool, wait: bool) -> Self {
        Self {
            ids,
            sync_remote,
            wait,
        }
    }

    pub fn single(id: ObjectId, sync_remote: bool, wait: bool) -> Self {
        Self::new(vec![id], sync_remote, wait)
    }
}

impl Message for GetDataRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::GetData);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("id", &self.ids);
        doc.put("sync_remote", &self.sync_remote);
        doc.put("wait", &self.wait);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            ids: read_ids(doc, "id")?,
            sync_remote: doc.get_or("sync_remote", false)?,
            wait: doc.get_or("wait", false)?,
        })
    }
}

/// List objects whose type name matches a glob or regex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDataRequest {
    pub pattern: String,
    pub regex: bool,
    pub limit: usize,
}

impl ListDataRequest {
    pub fn new(pattern: impl Into<String>, regex: bool, limit: usize) -> Self {
        Self {
            pattern: pattern.into(),
            regex,
            limit,
        }
    }
}

impl Message for ListDataRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::ListData);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("pattern", &self.pattern);
        doc.put("regex", &self.regex);
        doc.put("limit", &self.limit);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            pattern: doc.get("pattern")?,
            regex: doc.get_or("regex", false)?,
            limit: doc.get_or("limit", DEFAULT_LIST_LIMIT)?,
        })
    }
}

/// Register new object metadata
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDataRequest {
    pub content: Document,
}

impl CreateDataRequest {
    pub fn new(content: Document) -> Self {
        Self { content }
    }
}

impl Message for CreateDataRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::CreateData);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("content", &self.content);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            content: doc.get("content")?,
        })
    }
}

/// Make an object's metadata visible cluster-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistRequest {
    pub id: ObjectId,
}

impl Message for PersistRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::Persist);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("id", &self.id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self { id: doc.get("id")? })
    }
}

/// Ask whether an object has been persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfPersistRequest {
    pub id: ObjectId,
}

impl Message for IfPersistRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::IfPersist);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("id", &self.id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self { id: doc.get("id")? })
    }
}

/// Ask whether an object exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistsRequest {
    pub id: ObjectId,
}

impl Message for ExistsRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::Exists);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("id", &self.id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self { id: doc.get("id")? })
    }
}

/// Delete one or more objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelDataRequest {
    pub ids: Vec<ObjectId>,
    /// Skip reference-count checks
    pub force: bool,
    /// Also delete owned sub-objects
    pub deep: bool,
}

impl DelDataRequest {
    pub fn new(ids: Vec<ObjectId>, force: bool, deep: bool) -> Self {
        Self { ids, force, deep }
    }

    pub fn single(id: ObjectId, force: bool, deep: bool) -> Self {
        Self::new(vec![id], force, deep)
    }
}

impl Message for DelDataRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::DelData);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("id", &self.ids);
        doc.put("force", &self.force);
        doc.put("deep", &self.deep);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            ids: read_ids(doc, "id")?,
            force: doc.get_or("force", false)?,
            deep: doc.get_or("deep", false)?,
        })
    }
}

/// Create a new object id aliasing an existing object's buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShallowCopyRequest {
    pub id: ObjectId,
}

impl Message for ShallowCopyRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::ShallowCopy);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("id", &self.id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self { id: doc.get("id")? })
    }
}

// =============================================================================
// Cluster introspection
// =============================================================================

empty_message! {
    /// Fetch the cluster-wide metadata tree
    ClusterMetaRequest => MessageKind::Request(CommandType::ClusterMeta)
}

empty_message! {
    /// Fetch the daemon's runtime status
    InstanceStatusRequest => MessageKind::Request(CommandType::InstanceStatus)
}

// =============================================================================
// Buffers
// =============================================================================

/// Allocate a shared-memory buffer of `size` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateBufferRequest {
    pub size: u64,
}

impl Message for CreateBufferRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::CreateBuffer);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("size", &self.size);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            size: doc.get("size")?,
        })
    }
}

/// Fetch buffer descriptors for a set of ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBuffersRequest {
    /// Sorted, without duplicates
    pub ids: Vec<ObjectId>,
}

impl GetBuffersRequest {
    pub fn new(ids: impl IntoIterator<Item = ObjectId>) -> Self {
        let ids: BTreeSet<ObjectId> = ids.into_iter().collect();
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

impl Message for GetBuffersRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::GetBuffers);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("ids", &self.ids);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        let ids: Vec<ObjectId> = doc.get("ids")?;
        Ok(Self::new(ids))
    }
}

// =============================================================================
// Names
// =============================================================================

/// Bind a name to an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutNameRequest {
    pub object_id: ObjectId,
    pub name: String,
}

impl PutNameRequest {
    pub fn new(object_id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            object_id,
            name: name.into(),
        }
    }
}

impl Message for PutNameRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::PutName);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("object_id", &self.object_id);
        doc.put("name", &self.name);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            object_id: doc.get("object_id")?,
            name: doc.get("name")?,
        })
    }
}

/// Resolve a name to an object id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNameRequest {
    pub name: String,
    /// Block until the name is bound
    pub wait: bool,
}

impl GetNameRequest {
    pub fn new(name: impl Into<String>, wait: bool) -> Self {
        Self {
            name: name.into(),
            wait,
        }
    }
}

impl Message for GetNameRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::GetName);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("name", &self.name);
        doc.put("wait", &self.wait);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            name: doc.get("name")?,
            wait: doc.get_or("wait", false)?,
        })
    }
}

/// Unbind a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropNameRequest {
    pub name: String,
}

impl DropNameRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Message for DropNameRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::DropName);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("name", &self.name);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            name: doc.get("name")?,
        })
    }
}

// =============================================================================
// Streams
// =============================================================================

/// Open a stream backed by `object_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateStreamRequest {
    pub object_id: ObjectId,
}

impl Message for CreateStreamRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::CreateStream);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("object_id", &self.object_id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            object_id: doc.get("object_id")?,
        })
    }
}

/// Producer side: block until a chunk of `size` bytes can be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetNextStreamChunkRequest {
    pub stream_id: ObjectId,
    pub size: u64,
}

impl Message for GetNextStreamChunkRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::GetNextStreamChunk);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("stream_id", &self.stream_id);
        doc.put("size", &self.size);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            stream_id: doc.get("stream_id")?,
            size: doc.get("size")?,
        })
    }
}

/// Consumer side: poll for the next ready chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullNextStreamChunkRequest {
    pub stream_id: ObjectId,
}

impl Message for PullNextStreamChunkRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::PullNextStreamChunk);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("stream_id", &self.stream_id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            stream_id: doc.get("stream_id")?,
        })
    }
}

/// Close a stream; `failed` marks abnormal termination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopStreamRequest {
    pub stream_id: ObjectId,
    pub failed: bool,
}

impl Message for StopStreamRequest {
    const KIND: MessageKind = MessageKind::Request(CommandType::StopStream);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("stream_id", &self.stream_id);
        doc.put("failed", &self.failed);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            stream_id: doc.get("stream_id")?,
            failed: doc.get_or("failed", false)?,
        })
    }
}

// =============================================================================
// Any request
// =============================================================================

message_enum! {
    /// Any request, as seen by the receiving side
    Request {
        Register(RegisterRequest),
        Exit(ExitRequest),
        GetData(GetDataRequest),
        ListData(ListDataRequest),
        CreateData(CreateDataRequest),
        Persist(PersistRequest),
        IfPersist(IfPersistRequest),
        Exists(ExistsRequest),
        DelData(DelDataRequest),
        ShallowCopy(ShallowCopyRequest),
        ClusterMeta(ClusterMetaRequest),
        InstanceStatus(InstanceStatusRequest),
        CreateBuffer(CreateBufferRequest),
        GetBuffers(GetBuffersRequest),
        PutName(PutNameRequest),
        GetName(GetNameRequest),
        DropName(DropNameRequest),
        CreateStream(CreateStreamRequest),
        GetNextStreamChunk(GetNextStreamChunkRequest),
        PullNextStreamChunk(PullNextStreamChunkRequest),
        StopStream(StopStreamRequest),
    }
}

impl Request {
    pub fn command_type(&self) -> CommandType {
        match self.kind() {
            MessageKind::Request(cmd) => cmd,
            MessageKind::Reply(_) => CommandType::Null,
        }
    }

    /// Decode any request, resolving its tag through the registry
    pub fn from_document(doc: &Document) -> Result<Self> {
        let tag = doc.type_tag()?;
        match MessageKind::parse(tag)? {
            MessageKind::Request(cmd) => Self::read_tagged(cmd.name(), doc)
                .unwrap_or_else(|| Err(WireError::UnknownCommand(tag.to_string()))),
            MessageKind::Reply(_) => Err(WireError::Protocol(format!(
                "expected a request, found reply '{}'",
                tag
            ))),
        }
    }

    /// Parse and decode wire text
    pub fn decode(raw: &str) -> Result<Self> {
        Self::from_document(&Document::parse(raw)?)
    }
}
