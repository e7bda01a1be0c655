//! Dispatcher Tests
//!
//! These tests verify:
//! - Requests reach the handler decoded
//! - Handler failures become error replies
//! - Protocol violations surface as errors, not replies
//! - Exit produces no reply

use std::collections::HashMap;

use shmwire::protocol::{
    read_error, read_reply, ClusterMetaReply, ClusterMetaRequest, Document, ExitRequest,
    GetNameReply, GetNameRequest, Message, PutNameReply, PutNameRequest, RegisterReply,
    RegisterRequest, Reply, ReplyBody, Request, MAX_DEPTH,
};
use shmwire::{
    Config, Dispatcher, Handler, InstanceId, ObjectId, Status, StatusCode, WireError,
};

// =============================================================================
// Helper Types
// =============================================================================

/// In-memory name registry standing in for the daemon
#[derive(Default)]
struct NameTable {
    names: HashMap<String, ObjectId>,
    handled: usize,
}

impl Handler for NameTable {
    fn handle(&mut self, request: Request) -> Result<ReplyBody, Status> {
        self.handled += 1;
        match request {
            Request::Register(_) => Ok(RegisterReply {
                ipc_socket: "/tmp/store.sock".to_string(),
                rpc_endpoint: "127.0.0.1:9600".to_string(),
                instance_id: InstanceId::new(0),
            }
            .into()),
            Request::PutName(req) => {
                self.names.insert(req.name, req.object_id);
                Ok(PutNameReply.into())
            }
            Request::GetName(req) => self
                .names
                .get(&req.name)
                .map(|id| ReplyBody::from(GetNameReply { object_id: *id }))
                .ok_or_else(|| {
                    Status::object_not_exists(format!("name '{}' not bound", req.name))
                }),
            other => Err(Status::not_implemented(other.command_type().name())),
        }
    }
}

// =============================================================================
// Routing Tests
// =============================================================================

#[test]
fn test_dispatch_register() {
    let dispatcher = Dispatcher::default();
    let mut table = NameTable::default();

    let reply = dispatcher
        .dispatch(&RegisterRequest.encode(), &mut table)
        .unwrap()
        .unwrap();

    match read_reply::<RegisterReply>(&reply).unwrap() {
        Reply::Ok(r) => assert_eq!(r.ipc_socket, "/tmp/store.sock"),
        Reply::Error(status) => panic!("Unexpected error reply: {}", status),
    }
}

#[test]
fn test_dispatch_put_then_get_name() {
    let dispatcher = Dispatcher::default();
    let mut table = NameTable::default();

    let put = PutNameRequest::new(ObjectId::new(99), "dataset");
    dispatcher.dispatch(&put.encode(), &mut table).unwrap();

    let reply = dispatcher
        .dispatch(&GetNameRequest::new("dataset", false).encode(), &mut table)
        .unwrap()
        .unwrap();

    let reply = read_reply::<GetNameReply>(&reply).unwrap().into_result().unwrap();
    assert_eq!(reply.object_id, ObjectId::new(99));
    assert_eq!(table.handled, 2);
}

#[test]
fn test_handler_failure_becomes_error_reply() {
    let dispatcher = Dispatcher::default();
    let mut table = NameTable::default();

    let reply = dispatcher
        .dispatch(&GetNameRequest::new("absent", true).encode(), &mut table)
        .unwrap()
        .unwrap();

    let status = read_error(&reply).unwrap();
    assert_eq!(status.code(), StatusCode::ObjectNotExists);
    assert_eq!(status.message(), "name 'absent' not bound");
}

#[test]
fn test_wrong_reply_shape_becomes_invalid() {
    let dispatcher = Dispatcher::default();
    let mut handler = |_req: Request| -> Result<ReplyBody, Status> { Ok(PutNameReply.into()) };

    let reply = dispatcher
        .dispatch(&GetNameRequest::new("n", false).encode(), &mut handler)
        .unwrap()
        .unwrap();

    assert_eq!(read_error(&reply).unwrap().code(), StatusCode::Invalid);
}

#[test]
fn test_undecodable_reply_becomes_invalid() {
    let dispatcher = Dispatcher::default();
    let mut handler = |_req: Request| -> Result<ReplyBody, Status> {
        let mut content = Document::new();
        for _ in 0..MAX_DEPTH {
            let mut outer = Document::new();
            outer.insert("child", content);
            content = outer;
        }
        Ok(ClusterMetaReply { content }.into())
    };

    let reply = dispatcher
        .dispatch(&ClusterMetaRequest.encode(), &mut handler)
        .unwrap()
        .unwrap();

    assert_eq!(read_error(&reply).unwrap().code(), StatusCode::Invalid);
}

#[test]
fn test_exit_yields_no_reply() {
    let dispatcher = Dispatcher::default();
    let mut table = NameTable::default();

    let reply = dispatcher.dispatch(&ExitRequest.encode(), &mut table).unwrap();

    assert!(reply.is_none());
    assert_eq!(table.handled, 0);
}

// =============================================================================
// Protocol Violation Tests
// =============================================================================

#[test]
fn test_unknown_command_is_rejected() {
    let dispatcher = Dispatcher::default();
    let mut table = NameTable::default();

    match dispatcher.dispatch(r#"{"type":"not_a_real_command"}"#, &mut table) {
        Err(WireError::UnknownCommand(name)) => assert_eq!(name, "not_a_real_command"),
        other => panic!("Expected UnknownCommand, got {:?}", other),
    }
    assert_eq!(table.handled, 0);
}

#[test]
fn test_malformed_request_is_rejected() {
    let dispatcher = Dispatcher::default();
    let mut table = NameTable::default();

    let err = dispatcher.dispatch("{\"type\":", &mut table).unwrap_err();
    assert!(err.is_protocol());

    let err = dispatcher
        .dispatch(r#"{"type":"get_name_request"}"#, &mut table)
        .unwrap_err();
    assert_eq!(err, WireError::MissingField("name".to_string()));
    assert_eq!(table.handled, 0);
}

#[test]
fn test_size_limit_from_config() {
    let config = Config::builder().max_message_size(16).build();
    let dispatcher = Dispatcher::new(config);
    let mut table = NameTable::default();

    let raw = GetNameRequest::new("a-rather-long-name", false).encode();
    assert!(matches!(
        dispatcher.dispatch(&raw, &mut table),
        Err(WireError::MessageTooLarge { max: 16, .. })
    ));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults_and_builder() {
    let config = Config::default();
    assert_eq!(config.max_message_size, 64 * 1024 * 1024);
    assert!(!config.trace_payloads);

    let config = Config::builder()
        .max_message_size(1024)
        .trace_payloads(true)
        .build();
    assert_eq!(config.max_message_size, 1024);
    assert!(config.trace_payloads);
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: Config = serde_json::from_str(r#"{"trace_payloads": true}"#).unwrap();
    assert!(config.trace_payloads);
    assert_eq!(config.max_message_size, Config::default().max_message_size);
}
