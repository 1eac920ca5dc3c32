//! Onion Layers: onion-skin frame navigation for layered images
//!
//! Treats the top-level items of an image as animation frames and moves a
//! "current frame" through them, showing neighbouring frames at reduced
//! opacity and optionally tinted. The image lives behind the [`host::Host`]
//! trait; [`host::MemoryHost`] is an in-memory implementation backed by a JSON
//! document.

pub mod cli;
pub mod commands;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod lifecycle;
pub mod logging;
pub mod name;
pub mod navigation;
pub mod renumber;
pub mod types;

pub use commands::{Command, OnionService, ServiceSettings};
pub use error::{HostError, OnionError};
pub use host::{Host, MemoryHost};
