//! Configuration for shmwire
//!
//! Receiver-side settings with sensible defaults.

use serde::Deserialize;

use crate::protocol::MAX_MESSAGE_SIZE;

/// Settings for decoding incoming messages
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Decode Limits
    // -------------------------------------------------------------------------
    /// Largest message text accepted before parsing (in bytes)
    pub max_message_size: usize,

    // -------------------------------------------------------------------------
    // Logging
    // -------------------------------------------------------------------------
    /// Log full request and reply bodies at trace level
    pub trace_payloads: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE, // 64 MB
            trace_payloads: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the largest accepted message size (in bytes)
    pub fn max_message_size(mut self, bytes: usize) -> Self {
        self.config.max_message_size = bytes;
        self
    }

    /// Log full message bodies at trace level
    pub fn trace_payloads(mut self, enabled: bool) -> Self {
        self.config.trace_payloads = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
