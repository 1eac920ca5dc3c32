//! Shared value types: item handles, colours, blend modes and opacity constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opacity of the focal frame. Opacity values are percentages in `0.0..=100.0`.
pub const FULL_OPACITY: f64 = 100.0;

/// Neighbour opacities at or above this value are clamped to it when sampled,
/// so a neighbour never reads as the focal frame on the next call.
pub const NEIGHBOR_OPACITY_CAP: f64 = 99.0;

/// Handle to an item (layer or layer group) owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Layer compositing mode. Only the modes the engine creates are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Normal,
    Addition,
}
