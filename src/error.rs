//! Error types for the onion-skin navigation engine.

use crate::types::ItemId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a host implementation.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Item is not a group: {0}")]
    NotAGroup(ItemId),

    #[error("Invalid position {position} under {parent:?}")]
    InvalidPosition {
        parent: Option<ItemId>,
        position: usize,
    },
}

/// Errors surfaced by navigation, lifecycle and command operations.
#[derive(Debug, Error)]
pub enum OnionError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Lock unavailable at {}: {source}", path.display())]
    LockUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No active item")]
    NoActiveItem,

    #[error("Frame is not a layer group: {0}")]
    FrameNotGroup(String),

    #[error("Invalid context window: {0}")]
    InvalidContext(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Image document error: {0}")]
    Document(String),
}

impl From<config::ConfigError> for OnionError {
    fn from(err: config::ConfigError) -> Self {
        OnionError::ConfigError(err.to_string())
    }
}
