//! Reply messages
//!
//! Every reply is either the operation's normal shape or the generic
//! `error_reply`:
//!
//! ```text
//! { "type": "get_name_reply", "object_id": "o0000000000000007" }
//! { "type": "error_reply", "code": 12, "message": "object not found" }
//! ```
//!
//! Readers go through [`read_reply`], which decides between the two shapes
//! from the `type` tag alone and hands back a [`Reply`] envelope.

use std::collections::BTreeMap;

use crate::error::{Result, WireError};
use crate::object::{InstanceId, ObjectId, PayloadBlock};
use crate::status::Status;
use super::command::{MessageKind, ReplyType};
use super::document::Document;
use super::field::{read_status, write_status};
use super::message::Message;

// =============================================================================
// Envelope
// =============================================================================

/// A decoded reply: the normal payload or the daemon's failure status
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Ok(T),
    Error(Status),
}

impl<T> Reply<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    pub fn into_result(self) -> std::result::Result<T, Status> {
        match self {
            Reply::Ok(payload) => Ok(payload),
            Reply::Error(status) => Err(status),
        }
    }
}

impl<T> From<std::result::Result<T, Status>> for Reply<T> {
    fn from(result: std::result::Result<T, Status>) -> Self {
        match result {
            Ok(payload) => Reply::Ok(payload),
            Err(status) => Reply::Error(status),
        }
    }
}

/// Generic failure reply, substitutes for any normal reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply {
    pub status: Status,
}

impl Message for ErrorReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::Error);

    fn write_fields(&self, doc: &mut Document) {
        if self.status.is_ok() {
            write_status(doc, &Status::invalid("failure reported with an ok status"));
        } else {
            write_status(doc, &self.status);
        }
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            status: read_status(doc)?,
        })
    }
}

/// Encode an error reply for `status`
///
/// An error reply never carries `Ok`: an `Ok` status is sent as `Invalid`.
pub fn write_error(status: &Status) -> String {
    ErrorReply {
        status: status.clone(),
    }
    .encode()
}

/// Decode an error reply back into its status
pub fn read_error(raw: &str) -> Result<Status> {
    ErrorReply::decode(raw).map(|reply| reply.status)
}

/// Encode either shape from a handler result
pub fn write_reply<T: Message>(result: &std::result::Result<T, Status>) -> String {
    match result {
        Ok(payload) => payload.encode(),
        Err(status) => write_error(status),
    }
}

/// Decode a reply expected to be `T` or an error reply
///
/// Any other tag is a protocol error.
pub fn read_reply<T: Message>(raw: &str) -> Result<Reply<T>> {
    read_reply_document(&Document::parse(raw)?)
}

/// [`read_reply`] for an already-parsed document
pub fn read_reply_document<T: Message>(doc: &Document) -> Result<Reply<T>> {
    if doc.type_tag()? == ReplyType::Error.name() {
        return ErrorReply::read_fields(doc).map(|e| Reply::Error(e.status));
    }
    T::from_document(doc).map(Reply::Ok)
}

// =============================================================================
// Connection lifecycle
// =============================================================================

/// Endpoints and identity of the daemon a client registered with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterReply {
    pub ipc_socket: String,
    pub rpc_endpoint: String,
    pub instance_id: InstanceId,
}

impl Message for RegisterReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::Register);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("ipc_socket", &self.ipc_socket);
        doc.put("rpc_endpoint", &self.rpc_endpoint);
        doc.put("instance_id", &self.instance_id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            ipc_socket: doc.get("ipc_socket")?,
            rpc_endpoint: doc.get("rpc_endpoint")?,
            instance_id: doc.get("instance_id")?,
        })
    }
}

// =============================================================================
// Object metadata
// =============================================================================

/// Metadata documents keyed by object id; also the answer to a listing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetDataReply {
    pub content: BTreeMap<ObjectId, Document>,
}

impl GetDataReply {
    pub fn new(content: BTreeMap<ObjectId, Document>) -> Self {
        Self { content }
    }

    /// Metadata for one requested id
    pub fn single(&self, id: ObjectId) -> Option<&Document> {
        self.content.get(&id)
    }
}

impl Message for GetDataReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::GetData);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("content", &self.content);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            content: doc.get("content")?,
        })
    }
}

/// Id assigned to newly created metadata, and the instance that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateDataReply {
    pub id: ObjectId,
    pub instance_id: InstanceId,
}

impl Message for CreateDataReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::CreateData);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("id", &self.id);
        doc.put("instance_id", &self.instance_id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            id: doc.get("id")?,
            instance_id: doc.get("instance_id")?,
        })
    }
}

empty_message! {
    PersistReply => MessageKind::Reply(ReplyType::Persist)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfPersistReply {
    pub persist: bool,
}

impl Message for IfPersistReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::IfPersist);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("persist", &self.persist);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            persist: doc.get("persist")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistsReply {
    pub exists: bool,
}

impl Message for ExistsReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::Exists);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("exists", &self.exists);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            exists: doc.get("exists")?,
        })
    }
}

empty_message! {
    DelDataReply => MessageKind::Reply(ReplyType::DelData)
}

/// Id of the new alias created by a shallow copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShallowCopyReply {
    pub target_id: ObjectId,
}

impl Message for ShallowCopyReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::ShallowCopy);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("target_id", &self.target_id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            target_id: doc.get("target_id")?,
        })
    }
}

// =============================================================================
// Cluster introspection
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterMetaReply {
    pub content: Document,
}

impl Message for ClusterMetaReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::ClusterMeta);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("content", &self.content);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            content: doc.get("content")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstanceStatusReply {
    pub content: Document,
}

impl Message for InstanceStatusReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::InstanceStatus);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("content", &self.content);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            content: doc.get("content")?,
        })
    }
}

// =============================================================================
// Buffers
// =============================================================================

/// A freshly allocated buffer
///
/// The reply's `id` is always the payload's own object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateBufferReply {
    payload: PayloadBlock,
}

impl CreateBufferReply {
    pub fn new(payload: PayloadBlock) -> Self {
        Self { payload }
    }

    pub fn id(&self) -> ObjectId {
        self.payload.object_id
    }

    pub fn payload(&self) -> PayloadBlock {
        self.payload
    }
}

impl Message for CreateBufferReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::CreateBuffer);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("id", &self.id());
        doc.put("payload", &self.payload);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        let id: ObjectId = doc.get("id")?;
        let payload: PayloadBlock = doc.get("payload")?;
        if payload.object_id != id {
            return Err(WireError::Protocol(format!(
                "buffer reply id {} does not match payload id {}",
                id, payload.object_id
            )));
        }
        Ok(Self { payload })
    }
}

/// Buffer descriptors keyed by object id
///
/// Keys are taken from the blocks themselves and cannot disagree with them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetBuffersReply {
    objects: BTreeMap<ObjectId, PayloadBlock>,
}

impl GetBuffersReply {
    pub fn new(blocks: impl IntoIterator<Item = PayloadBlock>) -> Self {
        Self {
            objects: blocks.into_iter().map(|b| (b.object_id, b)).collect(),
        }
    }

    pub fn objects(&self) -> &BTreeMap<ObjectId, PayloadBlock> {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&PayloadBlock> {
        self.objects.get(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Message for GetBuffersReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::GetBuffers);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("objects", &self.objects);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        let objects: BTreeMap<ObjectId, PayloadBlock> = doc.get("objects")?;
        if let Some((id, block)) = objects.iter().find(|(id, b)| **id != b.object_id) {
            return Err(WireError::Protocol(format!(
                "buffer keyed {} describes object {}",
                id, block.object_id
            )));
        }
        Ok(Self { objects })
    }
}

// =============================================================================
// Names
// =============================================================================

empty_message! {
    PutNameReply => MessageKind::Reply(ReplyType::PutName)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetNameReply {
    pub object_id: ObjectId,
}

impl Message for GetNameReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::GetName);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("object_id", &self.object_id);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            object_id: doc.get("object_id")?,
        })
    }
}

empty_message! {
    DropNameReply => MessageKind::Reply(ReplyType::DropName)
}

// =============================================================================
// Streams
// =============================================================================

empty_message! {
    CreateStreamReply => MessageKind::Reply(ReplyType::CreateStream)
}

/// Chunk handed to a stream producer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetNextStreamChunkReply {
    pub payload: PayloadBlock,
}

impl Message for GetNextStreamChunkReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::GetNextStreamChunk);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("payload", &self.payload);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            payload: doc.get("payload")?,
        })
    }
}

/// Chunk handed to a stream consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullNextStreamChunkReply {
    pub payload: PayloadBlock,
}

impl Message for PullNextStreamChunkReply {
    const KIND: MessageKind = MessageKind::Reply(ReplyType::PullNextStreamChunk);

    fn write_fields(&self, doc: &mut Document) {
        doc.put("payload", &self.payload);
    }

    fn read_fields(doc: &Document) -> Result<Self> {
        Ok(Self {
            payload: doc.get("payload")?,
        })
    }
}

empty_message! {
    StopStreamReply => MessageKind::Reply(ReplyType::StopStream)
}

// =============================================================================
// Any normal reply
// =============================================================================

message_enum! {
    /// Any normal reply, as produced by a request handler
    ReplyBody {
        Register(RegisterReply),
        GetData(GetDataReply),
        CreateData(CreateDataReply),
        Persist(PersistReply),
        IfPersist(IfPersistReply),
        Exists(ExistsReply),
        DelData(DelDataReply),
        ShallowCopy(ShallowCopyReply),
        ClusterMeta(ClusterMetaReply),
        InstanceStatus(InstanceStatusReply),
        CreateBuffer(CreateBufferReply),
        GetBuffers(GetBuffersReply),
        PutName(PutNameReply),
        GetName(GetNameReply),
        DropName(DropNameReply),
        CreateStream(CreateStreamReply),
        GetNextStreamChunk(GetNextStreamChunkReply),
        PullNextStreamChunk(PullNextStreamChunkReply),
        StopStream(StopStreamReply),
    }
}

impl ReplyBody {
    pub fn reply_type(&self) -> ReplyType {
        match self.kind() {
            MessageKind::Reply(reply) => reply,
            MessageKind::Request(_) => ReplyType::Error,
        }
    }

    /// Decode any normal reply or error reply by its tag
    pub fn read(raw: &str) -> Result<Reply<ReplyBody>> {
        let doc = Document::parse(raw)?;
        let tag = doc.type_tag()?;

        if tag == ReplyType::Error.name() {
            return ErrorReply::read_fields(&doc).map(|e| Reply::Error(e.status));
        }

        match MessageKind::parse(tag)? {
            MessageKind::Reply(_) => Self::read_tagged(tag, &doc)
                .unwrap_or_else(|| {
                    Err(WireError::Protocol(format!("'{}' has no reply body", tag)))
                })
                .map(Reply::Ok),
            MessageKind::Request(_) => Err(WireError::Protocol(format!(
                "expected a reply, found request '{}'",
                tag
            ))),
        }
    }
}
