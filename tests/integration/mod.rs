//! Integration tests for the onion-skin navigation engine

mod config_loading;
mod lifecycle;
mod test_utils;

pub use test_utils::*;
