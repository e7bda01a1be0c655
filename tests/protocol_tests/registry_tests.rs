//! Registry Tests
//!
//! Tests for the request/reply name registry.

use std::collections::HashSet;

use shmwire::protocol::{CommandType, MessageKind, ReplyType};
use shmwire::WireError;

// =============================================================================
// Name Lookup Tests
// =============================================================================

#[test]
fn test_parse_known_names() {
    assert_eq!(CommandType::parse("register_request"), CommandType::Register);
    assert_eq!(CommandType::parse("get_data_request"), CommandType::GetData);
    assert_eq!(CommandType::parse("create_buffer_request"), CommandType::CreateBuffer);
    assert_eq!(CommandType::parse("shallow_copy_request"), CommandType::ShallowCopy);
    assert_eq!(CommandType::parse("exit_request"), CommandType::Exit);
}

#[test]
fn test_parse_unknown_yields_sentinel() {
    assert_eq!(CommandType::parse("not_a_real_command"), CommandType::Null);
    assert_eq!(CommandType::parse(""), CommandType::Null);
    assert_eq!(CommandType::parse("REGISTER_REQUEST"), CommandType::Null);
}

#[test]
fn test_parse_reply_name_is_not_a_command() {
    assert_eq!(CommandType::parse("register_reply"), CommandType::Null);
    assert_eq!(CommandType::parse("error_reply"), CommandType::Null);
}

#[test]
fn test_from_name_rejects_sentinel() {
    match CommandType::from_name("not_a_real_command") {
        Err(WireError::UnknownCommand(name)) => assert_eq!(name, "not_a_real_command"),
        other => panic!("Expected UnknownCommand, got {:?}", other),
    }
    assert_eq!(CommandType::from_name("get_name_request").unwrap(), CommandType::GetName);
}

#[test]
fn test_every_command_round_trips_by_name_and_code() {
    for cmd in CommandType::all() {
        assert_eq!(CommandType::parse(cmd.name()), cmd);
        assert_eq!(CommandType::from_code(cmd.code()), cmd);
        assert_ne!(cmd, CommandType::Null);
    }
}

#[test]
fn test_registry_has_every_operation() {
    assert_eq!(CommandType::all().count(), 21);
    assert_eq!(ReplyType::all().count(), 20);
}

#[test]
fn test_names_are_unique_across_both_sets() {
    let mut seen = HashSet::new();
    for cmd in CommandType::all() {
        assert!(seen.insert(cmd.name()), "duplicate name {}", cmd.name());
    }
    for reply in ReplyType::all() {
        assert!(seen.insert(reply.name()), "duplicate name {}", reply.name());
    }
}

// =============================================================================
// Code Tests
// =============================================================================

#[test]
fn test_unassigned_codes_yield_sentinel() {
    for code in [0u8, 2, 4, 6, 7, 23, 24, 28, 255] {
        assert_eq!(CommandType::from_code(code), CommandType::Null, "code {}", code);
    }
}

#[test]
fn test_historical_codes() {
    assert_eq!(CommandType::Exit.code(), 1);
    assert_eq!(CommandType::Register.code(), 3);
    assert_eq!(CommandType::GetData.code(), 5);
    assert_eq!(CommandType::Persist.code(), 8);
    assert_eq!(CommandType::IfPersist.code(), 25);
    assert_eq!(CommandType::ShallowCopy.code(), 27);
}

#[test]
fn test_sentinel_name() {
    assert_eq!(CommandType::Null.name(), "null_command");
    assert_eq!(CommandType::Null.reply_type(), None);
}

// =============================================================================
// Reply Shape Tests
// =============================================================================

#[test]
fn test_reply_types() {
    assert_eq!(CommandType::Register.reply_type(), Some(ReplyType::Register));
    assert_eq!(CommandType::CreateBuffer.reply_type(), Some(ReplyType::CreateBuffer));
    assert_eq!(CommandType::StopStream.reply_type(), Some(ReplyType::StopStream));
    assert_eq!(CommandType::Exit.reply_type(), None);
}

#[test]
fn test_list_data_answers_with_get_data_shape() {
    assert_eq!(CommandType::ListData.reply_type(), Some(ReplyType::GetData));
}

#[test]
fn test_every_reply_name_parses() {
    for reply in ReplyType::all() {
        assert_eq!(ReplyType::parse(reply.name()), Some(reply));
    }
    assert_eq!(ReplyType::parse("get_data_request"), None);
}

#[test]
fn test_message_kind_classifies_names() {
    assert_eq!(
        MessageKind::parse("put_name_request").unwrap(),
        MessageKind::Request(CommandType::PutName)
    );
    assert_eq!(
        MessageKind::parse("error_reply").unwrap(),
        MessageKind::Reply(ReplyType::Error)
    );
    assert!(matches!(
        MessageKind::parse("bogus"),
        Err(WireError::UnknownCommand(_))
    ));
}
