//! CLI output: error mapping from engine errors to the CLI surface.

use crate::error::OnionError;

/// Map engine errors to a single line for stderr.
pub fn map_error(e: &OnionError) -> String {
    match e {
        OnionError::NoActiveItem => "No active layer: select a layer first".to_string(),
        OnionError::LockUnavailable { path, .. } => format!(
            "Cannot lock {}: is its directory missing?",
            path.display()
        ),
        other => other.to_string(),
    }
}
