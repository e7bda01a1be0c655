//! Object identity and buffer descriptors
//!
//! ## Wire Forms
//! - `ObjectId`:   `"o"` followed by 16 lowercase hex digits, e.g. `"o0000000000000007"`
//! - `InstanceId`: unsigned integer
//! - `PayloadBlock`:
//! ```text
//! {
//!   "object_id": "o…",
//!   "size": 4096,
//!   "location": { "segment": 3, "offset": 8192, "map_size": 67108864 }
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::WireError;

/// Opaque identifier for a stored object, assigned by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o{:016x}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only the canonical form is accepted, so each id has exactly one spelling
        let hex = s
            .strip_prefix('o')
            .filter(|h| {
                h.len() == 16 && h.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
            })
            .ok_or_else(|| WireError::Protocol(format!("invalid object id '{}'", s)))?;

        u64::from_str_radix(hex, 16)
            .map(ObjectId)
            .map_err(|_| WireError::Protocol(format!("invalid object id '{}'", s)))
    }
}

/// Opaque identifier for one daemon process within a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for InstanceId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

/// Where a buffer lives: enough for another process to map the same bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Shared-memory segment handle; negative when the buffer is empty
    pub segment: i64,

    /// Byte offset of the buffer within the segment
    pub offset: u64,

    /// Total size of the segment to map
    pub map_size: u64,
}

/// One buffer resident in shared memory
///
/// The daemon owns the authoritative block; clients only ever receive copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBlock {
    pub object_id: ObjectId,
    pub size: u64,
    pub location: Location,
}

impl PayloadBlock {
    pub fn new(object_id: ObjectId, size: u64, location: Location) -> Self {
        Self {
            object_id,
            size,
            location,
        }
    }

    /// Zero-sized block that maps nothing
    pub fn empty(object_id: ObjectId) -> Self {
        Self::new(
            object_id,
            0,
            Location {
                segment: -1,
                offset: 0,
                map_size: 0,
            },
        )
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
