//! Tint overlays
//!
//! Context frames can be tinted so frames before and after the focal one are
//! told apart. A tint is an additive, image-sized layer filled with a flat
//! colour and placed as the first child of the frame group. At most one tint
//! layer of each kind exists in the image; it is moved between frames rather
//! than recreated.

use crate::error::HostError;
use crate::host::Host;
use crate::types::{BlendMode, ItemId, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Tint instruction for one frame in a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tint {
    /// No instruction; the frame's tint layers are left alone.
    #[default]
    None,
    Before,
    After,
    /// Remove the frame's tint layers entirely.
    Clean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TintKind {
    Before,
    After,
}

impl TintKind {
    pub const ALL: [TintKind; 2] = [TintKind::Before, TintKind::After];

    pub fn as_str(&self) -> &'static str {
        match self {
            TintKind::Before => "before",
            TintKind::After => "after",
        }
    }
}

impl fmt::Display for TintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tint layer naming and colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TintPalette {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_before")]
    pub before: Rgb,
    #[serde(default = "default_after")]
    pub after: Rgb,
}

fn default_prefix() -> String {
    "onion-tint-".to_string()
}

fn default_before() -> Rgb {
    Rgb(100, 48, 135)
}

fn default_after() -> Rgb {
    Rgb(83, 135, 48)
}

impl Default for TintPalette {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            before: default_before(),
            after: default_after(),
        }
    }
}

impl TintPalette {
    pub fn layer_name(&self, kind: TintKind) -> String {
        format!("{}{}", self.prefix, kind)
    }

    pub fn color(&self, kind: TintKind) -> Rgb {
        match kind {
            TintKind::Before => self.before,
            TintKind::After => self.after,
        }
    }

    pub fn is_tint_name(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }
}

/// Hide every tint layer in the image. Runs before the per-frame pass so no
/// stale overlay survives a navigation step.
pub fn hide_all<H: Host + ?Sized>(host: &mut H, palette: &TintPalette) -> Result<(), HostError> {
    for kind in TintKind::ALL {
        if let Some(layer) = host.find_item_by_name(&palette.layer_name(kind))? {
            if host.visible(layer)? {
                host.set_visible(layer, false)?;
            }
        }
    }
    Ok(())
}

/// Whether a tint layer of this kind exists anywhere in the image.
pub fn exists<H: Host + ?Sized>(
    host: &H,
    palette: &TintPalette,
    kind: TintKind,
) -> Result<bool, HostError> {
    Ok(host.find_item_by_name(&palette.layer_name(kind))?.is_some())
}

/// Apply one frame's tint instruction.
pub fn apply_tint<H: Host + ?Sized>(
    host: &mut H,
    frame: ItemId,
    tint: Tint,
    palette: &TintPalette,
) -> Result<(), HostError> {
    match tint {
        Tint::None => Ok(()),
        Tint::Before => show_under(host, frame, TintKind::Before, palette),
        Tint::After => show_under(host, frame, TintKind::After, palette),
        Tint::Clean => remove_from(host, frame, palette),
    }
}

fn show_under<H: Host + ?Sized>(
    host: &mut H,
    frame: ItemId,
    kind: TintKind,
    palette: &TintPalette,
) -> Result<(), HostError> {
    let name = palette.layer_name(kind);
    match host.find_item_by_name(&name)? {
        Some(layer) => {
            if host.parent(layer)? != Some(frame) || host.position(layer)? != 0 {
                debug!(tint = %kind, frame = %frame, "Moving tint layer");
                host.reorder_item(layer, Some(frame), 0)?;
            }
            if !host.visible(layer)? {
                host.set_visible(layer, true)?;
            }
        }
        None => {
            debug!(tint = %kind, frame = %frame, "Creating tint layer");
            let layer = host.create_layer(&name, BlendMode::Addition)?;
            host.insert_item(layer, Some(frame), 0)?;

            // Fill with the tint colour without clobbering the user's foreground.
            let saved = host.foreground()?;
            host.set_foreground(palette.color(kind))?;
            let filled = host.fill_foreground(layer);
            host.set_foreground(saved)?;
            filled?;
        }
    }
    Ok(())
}

fn remove_from<H: Host + ?Sized>(
    host: &mut H,
    frame: ItemId,
    palette: &TintPalette,
) -> Result<(), HostError> {
    let mut tints = Vec::new();
    for child in host.children(frame)?.unwrap_or_default() {
        if palette.is_tint_name(&host.name(child)?) {
            tints.push(child);
        }
    }
    for layer in tints {
        debug!(frame = %frame, "Removing tint layer");
        host.remove_item(layer)?;
    }
    Ok(())
}
