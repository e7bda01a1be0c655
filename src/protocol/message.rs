//! Message trait
//!
//! Every request and reply struct implements [`Message`]: it names its wire
//! kind and knows how to write/read its own fields. Tagging, tag checking and
//! text conversion live here once.

use crate::error::{Result, WireError};
use crate::object::ObjectId;
use super::command::MessageKind;
use super::document::{Document, Value};

/// A typed request or reply
pub trait Message: Sized {
    /// The exact wire name this message is tagged with
    const KIND: MessageKind;

    /// Write operation fields (everything except `type`)
    fn write_fields(&self, doc: &mut Document);

    /// Read operation fields; the tag has already been checked
    fn read_fields(doc: &Document) -> Result<Self>;

    /// Build the tagged document
    fn to_document(&self) -> Document {
        let mut doc = Document::tagged(Self::KIND.name());
        self.write_fields(&mut doc);
        doc
    }

    /// Serialize to wire text; never fails
    ///
    /// Free-form content nested past [`MAX_DEPTH`](super::document::MAX_DEPTH)
    /// still encodes, but no decoder will accept it. Use
    /// [`try_encode`](Self::try_encode) when the content comes from outside.
    fn encode(&self) -> String {
        self.to_document().to_wire()
    }

    /// Serialize to wire text, refusing anything a decoder would reject
    fn try_encode(&self) -> Result<String> {
        let doc = self.to_document();
        doc.check_depth()?;
        Ok(doc.to_wire())
    }

    /// Decode an already-parsed document, checking the tag first
    fn from_document(doc: &Document) -> Result<Self> {
        expect_type(doc, Self::KIND.name())?;
        Self::read_fields(doc)
    }

    /// Parse and decode wire text
    fn decode(raw: &str) -> Result<Self> {
        Self::from_document(&Document::parse(raw)?)
    }
}

/// Fail with `TypeTag` unless the document is tagged exactly `expected`
pub fn expect_type(doc: &Document, expected: &'static str) -> Result<()> {
    let found = doc.type_tag()?;
    if found != expected {
        return Err(WireError::TypeTag {
            expected,
            found: found.to_string(),
        });
    }
    Ok(())
}

/// Read an id field written either as a single id or as a list of ids
pub(crate) fn read_ids(doc: &Document, key: &str) -> Result<Vec<ObjectId>> {
    match doc.value(key) {
        Some(Value::String(_)) => Ok(vec![doc.get(key)?]),
        _ => doc.get(key),
    }
}

/// Declare a message with no fields beyond its tag
macro_rules! empty_message {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl $crate::protocol::Message for $name {
            const KIND: $crate::protocol::MessageKind = $kind;

            fn write_fields(&self, _doc: &mut $crate::protocol::Document) {}

            fn read_fields(_doc: &$crate::protocol::Document) -> $crate::error::Result<Self> {
                Ok($name)
            }
        }
    };
}

/// Declare an enum over a set of messages, with conversions from each member
macro_rules! message_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($ty:ty)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($variant($ty)),+
        }

        impl $name {
            /// Wire kind of the wrapped message
            pub fn kind(&self) -> $crate::protocol::MessageKind {
                match self {
                    $($name::$variant(_) => <$ty as $crate::protocol::Message>::KIND),+
                }
            }

            pub fn to_document(&self) -> $crate::protocol::Document {
                match self {
                    $($name::$variant(m) => $crate::protocol::Message::to_document(m)),+
                }
            }

            pub fn encode(&self) -> String {
                self.to_document().to_wire()
            }

            pub fn try_encode(&self) -> $crate::error::Result<String> {
                let doc = self.to_document();
                doc.check_depth()?;
                Ok(doc.to_wire())
            }

            /// Decode the member whose name is `tag`; `None` if no member has it
            fn read_tagged(
                tag: &str,
                doc: &$crate::protocol::Document,
            ) -> Option<$crate::error::Result<Self>> {
                $(
                    if tag == <$ty as $crate::protocol::Message>::KIND.name() {
                        return Some(
                            <$ty as $crate::protocol::Message>::read_fields(doc).map($name::$variant),
                        );
                    }
                )+
                None
            }
        }

        $(
            impl From<$ty> for $name {
                fn from(m: $ty) -> Self {
                    $name::$variant(m)
                }
            }
        )+
    };
}
