//! Animation Frames
//!
//! A frame is one top-level item of the image: either a plain layer or a layer
//! group holding the frame's sub-layers. Frames carry *desired* state that a
//! navigation pass fills in, then [`Frame::apply`] writes only what differs
//! from the host.

pub mod enumerate;
pub mod tint;

pub use enumerate::{enumerate_frames, is_disabled_name};
pub use tint::{Tint, TintKind, TintPalette};

use crate::error::HostError;
use crate::host::Host;
use crate::types::ItemId;
use tracing::debug;

/// Shape of a frame item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Plain,
    /// Children as enumerated, top-most first.
    Group(Vec<ItemId>),
}

/// Host properties read when the frame was enumerated.
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    pub name: String,
    pub opacity: f64,
    pub visible: bool,
}

/// One frame plus the state a pass wants it to end up in.
#[derive(Debug, Clone)]
pub struct Frame {
    pub item: ItemId,
    pub kind: FrameKind,
    pub observed: Observed,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub tint: Tint,
}

impl Frame {
    pub fn new(item: ItemId, kind: FrameKind, observed: Observed) -> Self {
        Self {
            item,
            kind,
            observed,
            opacity: None,
            visible: None,
            tint: Tint::None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, FrameKind::Group(_))
    }

    pub fn children(&self) -> &[ItemId] {
        match &self.kind {
            FrameKind::Group(children) => children,
            FrameKind::Plain => &[],
        }
    }

    /// Write desired state to the host, skipping unset fields and values the
    /// item already has so no-op writes never reach the undo history.
    pub fn apply<H: Host + ?Sized>(
        &self,
        host: &mut H,
        palette: &TintPalette,
    ) -> Result<(), HostError> {
        if let Some(opacity) = self.opacity {
            if host.opacity(self.item)? != opacity {
                debug!(frame = %self.observed.name, opacity, "Setting frame opacity");
                host.set_opacity(self.item, opacity)?;
            }
        }

        if let Some(visible) = self.visible {
            if host.visible(self.item)? != visible {
                debug!(frame = %self.observed.name, visible, "Setting frame visibility");
                host.set_visible(self.item, visible)?;
            }
        }

        if self.is_group() {
            tint::apply_tint(host, self.item, self.tint, palette)?;
        }
        Ok(())
    }
}
