//! Document Tests
//!
//! Tests for typed field access and the JSON text form.

use std::collections::BTreeMap;

use shmwire::protocol::{Document, Value, MAX_DEPTH, MAX_MESSAGE_SIZE};
use shmwire::{InstanceId, Location, ObjectId, PayloadBlock, Status, StatusCode, WireError};

/// A chain of `levels` documents, each holding the next under "child"
fn nested(levels: usize) -> Document {
    let mut doc = Document::new();
    doc.insert("leaf", 1u64);
    for _ in 1..levels {
        let mut outer = Document::new();
        outer.insert("child", doc);
        doc = outer;
    }
    doc
}

// =============================================================================
// Field Access Tests
// =============================================================================

#[test]
fn test_put_overwrites_previous_value() {
    let mut doc = Document::new();
    doc.put("name", &"first".to_string());
    doc.put("name", &"second".to_string());

    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get::<String>("name").unwrap(), "second");
}

#[test]
fn test_get_missing_field() {
    let doc = Document::new();
    match doc.get::<u64>("size") {
        Err(WireError::MissingField(field)) => assert_eq!(field, "size"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_get_type_mismatch() {
    let mut doc = Document::new();
    doc.insert("size", "large");

    match doc.get::<u64>("size") {
        Err(WireError::TypeMismatch { field, .. }) => assert_eq!(field, "size"),
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_negative_is_not_unsigned() {
    let mut doc = Document::new();
    doc.put("size", &-1i64);

    assert!(matches!(doc.get::<u64>("size"), Err(WireError::TypeMismatch { .. })));
    assert_eq!(doc.get::<i64>("size").unwrap(), -1);
}

#[test]
fn test_get_or_defaults_only_when_absent() {
    let mut doc = Document::new();
    assert!(!doc.get_or("wait", false).unwrap());

    doc.put("wait", &true);
    assert!(doc.get_or("wait", false).unwrap());

    doc.insert("wait", "yes");
    assert!(matches!(
        doc.get_or("wait", false),
        Err(WireError::TypeMismatch { .. })
    ));
}

#[test]
fn test_object_id_field() {
    let mut doc = Document::new();
    doc.put("id", &ObjectId::new(0xabc));

    assert_eq!(doc.value("id"), Some(&Value::from("o0000000000000abc")));
    assert_eq!(doc.get::<ObjectId>("id").unwrap(), ObjectId::new(0xabc));
}

#[test]
fn test_object_id_rejects_bad_text() {
    let mut doc = Document::new();
    for bad in [
        "",
        "o",
        "o7",
        "o0000000000000ABC",
        "x0000000000000001",
        "ozz",
        "o00000000000000001",
        "o+000000000000001",
    ] {
        doc.insert("id", bad);
        assert!(
            matches!(doc.get::<ObjectId>("id"), Err(WireError::TypeMismatch { .. })),
            "accepted {:?}",
            bad
        );
    }
}

#[test]
fn test_object_id_map_rejects_non_canonical_keys() {
    // "o1" would otherwise collapse onto the same id as the first key
    let raw = r#"{"sizes":{"o0000000000000001":10,"o1":20}}"#;
    let doc = Document::parse(raw).unwrap();

    assert!(matches!(
        doc.get::<BTreeMap<ObjectId, u64>>("sizes"),
        Err(WireError::TypeMismatch { .. })
    ));
}

#[test]
fn test_instance_id_field() {
    let mut doc = Document::new();
    doc.put("instance_id", &InstanceId::new(3));
    assert_eq!(doc.get::<InstanceId>("instance_id").unwrap(), InstanceId::new(3));
}

#[test]
fn test_list_with_one_bad_element_fails() {
    let mut doc = Document::new();
    doc.insert(
        "ids",
        vec![Value::from("o0000000000000001"), Value::from(true)],
    );
    assert!(matches!(
        doc.get::<Vec<ObjectId>>("ids"),
        Err(WireError::TypeMismatch { .. })
    ));
}

#[test]
fn test_payload_block_field() {
    let block = PayloadBlock::new(
        ObjectId::new(7),
        4096,
        Location {
            segment: 3,
            offset: 8192,
            map_size: 1 << 26,
        },
    );
    let mut doc = Document::new();
    doc.put("payload", &block);

    let inner = doc.value("payload").unwrap().as_document().unwrap();
    assert!(inner.contains_key("location"));
    assert_eq!(doc.get::<PayloadBlock>("payload").unwrap(), block);
}

#[test]
fn test_payload_block_missing_location_is_mismatch() {
    let mut inner = Document::new();
    inner.put("object_id", &ObjectId::new(1));
    inner.put("size", &10u64);

    let mut doc = Document::new();
    doc.insert("payload", inner);

    assert!(matches!(
        doc.get::<PayloadBlock>("payload"),
        Err(WireError::TypeMismatch { .. })
    ));
}

#[test]
fn test_object_id_map_field() {
    let mut map = BTreeMap::new();
    map.insert(ObjectId::new(1), 10u64);
    map.insert(ObjectId::new(2), 20u64);

    let mut doc = Document::new();
    doc.put("sizes", &map);

    assert_eq!(doc.get::<BTreeMap<ObjectId, u64>>("sizes").unwrap(), map);
}

#[test]
fn test_status_field() {
    let mut doc = Document::new();
    doc.put("last_error", &Status::object_not_exists("o0000000000000003"));
    doc.put("custom", &Status::new(StatusCode::from_code(77), "custom"));
    doc.put("fine", &Status::ok());

    let inner = doc.value("last_error").unwrap().as_document().unwrap();
    assert_eq!(inner.get::<i64>("code").unwrap(), 12);

    let parsed = Document::parse(&doc.to_wire()).unwrap();
    assert_eq!(
        parsed.get::<Status>("last_error").unwrap(),
        Status::object_not_exists("o0000000000000003")
    );
    assert_eq!(parsed.get::<Status>("custom").unwrap().code(), StatusCode::Other(77));
    assert!(parsed.get::<Status>("fine").unwrap().is_ok());

    doc.insert("broken", "not a status");
    assert!(matches!(
        doc.get::<Status>("broken"),
        Err(WireError::TypeMismatch { .. })
    ));
}

// =============================================================================
// Text Form Tests
// =============================================================================

#[test]
fn test_nested_document_survives_text_form() {
    let mut inner = Document::new();
    inner.insert("typename", "store::Tensor");
    inner.insert("shape", vec![Value::from(2u64), Value::from(3u64)]);
    inner.insert("scale", 0.5);
    inner.insert("owner", Value::Null);
    inner.insert("offset", -12i64);

    let mut doc = Document::tagged("create_data_request");
    doc.put("content", &inner);

    let parsed = Document::parse(&doc.to_wire()).unwrap();
    assert_eq!(parsed, doc);
    assert_eq!(parsed.type_tag().unwrap(), "create_data_request");
}

#[test]
fn test_full_u64_range_survives_text_form() {
    let mut doc = Document::new();
    doc.put("big", &u64::MAX);
    doc.put("small", &i64::MIN);

    let parsed = Document::parse(&doc.to_wire()).unwrap();
    assert_eq!(parsed.get::<u64>("big").unwrap(), u64::MAX);
    assert_eq!(parsed.get::<i64>("small").unwrap(), i64::MIN);
}

#[test]
fn test_floats_survive_text_form_bit_exact() {
    let mut values = vec![
        1.6180339887498947,
        0.1 + 0.2,
        1.0 / 3.0,
        f64::MIN_POSITIVE,
        5e-324,
        1e308,
        -2.5e-300,
        3.0,
    ];

    // xorshift over raw bit patterns, keeping only finite values
    let mut state = 0x9e37_79b9_7f4a_7c15u64;
    while values.len() < 5000 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let f = f64::from_bits(state);
        if f.is_finite() {
            values.push(f);
        }
    }

    for f in values {
        let mut doc = Document::new();
        doc.insert("x", f);

        let parsed = Document::parse(&doc.to_wire()).unwrap();
        match parsed.value("x") {
            Some(Value::Float(g)) => {
                assert_eq!(g.to_bits(), f.to_bits(), "{} came back as {}", f, g)
            }
            other => panic!("Expected float for {}, got {:?}", f, other),
        }
    }
}

#[test]
fn test_depth_limit_boundary() {
    let deepest = nested(MAX_DEPTH);
    assert!(deepest.check_depth().is_ok());
    assert_eq!(Document::parse(&deepest.to_wire()).unwrap(), deepest);

    let too_deep = nested(MAX_DEPTH + 1);
    assert!(matches!(too_deep.check_depth(), Err(WireError::Protocol(_))));
    assert!(matches!(
        Document::parse(&too_deep.to_wire()),
        Err(WireError::Protocol(_))
    ));
}

#[test]
fn test_lists_count_toward_depth() {
    let mut doc = nested(MAX_DEPTH - 1);
    assert!(doc.check_depth().is_ok());

    // Wrapping the chain in a list adds one level
    let mut outer = Document::new();
    outer.insert("items", vec![Value::from(doc.clone())]);
    assert!(matches!(outer.check_depth(), Err(WireError::Protocol(_))));

    doc = nested(MAX_DEPTH - 2);
    let mut outer = Document::new();
    outer.insert("items", vec![Value::from(doc)]);
    assert!(outer.check_depth().is_ok());
}

#[test]
fn test_parse_rejects_non_document() {
    for raw in ["[1, 2, 3]", "42", "\"text\"", "{not json", ""] {
        assert!(
            matches!(Document::parse(raw), Err(WireError::Protocol(_))),
            "accepted {:?}",
            raw
        );
    }
}

#[test]
fn test_parse_with_limit() {
    let raw = Document::tagged("exit_request").to_wire();

    match Document::parse_with_limit(&raw, 4) {
        Err(WireError::MessageTooLarge { size, max }) => {
            assert_eq!(size, raw.len());
            assert_eq!(max, 4);
        }
        other => panic!("Expected MessageTooLarge, got {:?}", other),
    }
    assert!(Document::parse_with_limit(&raw, MAX_MESSAGE_SIZE).is_ok());
}

#[test]
fn test_type_tag_errors() {
    let doc = Document::new();
    assert!(matches!(doc.type_tag(), Err(WireError::Protocol(_))));

    let mut doc = Document::new();
    doc.insert("type", 5u64);
    assert!(matches!(doc.type_tag(), Err(WireError::Protocol(_))));
}

#[test]
fn test_pretty_form_parses_back() {
    let mut doc = Document::tagged("cluster_meta_reply");
    doc.insert("content", Document::new());

    let pretty = doc.to_pretty();
    assert!(pretty.contains('\n'));
    assert_eq!(Document::parse(&pretty).unwrap(), doc);
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[test]
fn test_errors_map_to_status() {
    assert_eq!(
        WireError::MissingField("id".into()).to_status().code(),
        StatusCode::KeyError
    );
    assert_eq!(
        WireError::TypeMismatch {
            field: "id".into(),
            expected: "object id"
        }
        .to_status()
        .code(),
        StatusCode::TypeError
    );
    assert_eq!(
        WireError::UnknownCommand("x".into()).to_status().code(),
        StatusCode::Invalid
    );
    assert!(WireError::UnknownCommand("x".into()).is_protocol());
    assert!(!WireError::MissingField("id".into()).is_protocol());
}
