//! Frame Renumbering
//!
//! Gives every numbered frame, and every numbered item inside a group frame,
//! the number matching its stacking position: the top frame gets N, the bottom
//! frame gets 1. Stems and digit widths are kept; unnumbered items are left
//! alone.
//!
//! Renaming happens in two passes. The first moves every target to a marked
//! temporary name already carrying its new number, the second strips the
//! marker. No target name is ever taken while its old owner still holds it.

use crate::error::{HostError, OnionError};
use crate::frame::enumerate_frames;
use crate::host::{ChangeGroup, Host};
use crate::name::NumberedName;
use crate::types::ItemId;
use std::collections::HashSet;
use tracing::{debug, info};

/// Prefix carried by names between the two passes.
pub const TEMPORARY_MARKER: &str = "~onion-renumber~";

/// A single planned rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub item: ItemId,
    pub from: String,
    pub temporary: String,
    pub to: String,
}

/// Names of one frame and its direct children, top-most first.
#[derive(Debug, Clone)]
pub struct FrameNames {
    pub item: ItemId,
    pub name: String,
    pub children: Vec<(ItemId, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct RenumberPlan {
    pub renames: Vec<Rename>,
}

impl RenumberPlan {
    /// Plan from frame names in stacking order.
    pub fn from_names(frames: &[FrameNames]) -> Self {
        let count = frames.len() as u64;
        let mut renames = Vec::new();

        for (position, frame) in frames.iter().enumerate() {
            let number = count - position as u64;
            let targets = std::iter::once((frame.item, frame.name.as_str()))
                .chain(frame.children.iter().map(|(id, name)| (*id, name.as_str())));

            for (item, name) in targets {
                let parsed = NumberedName::parse(name);
                if parsed.number.is_none() {
                    continue;
                }
                let to = parsed.with_number(number).format();
                if to == name {
                    continue;
                }
                renames.push(Rename {
                    item,
                    from: name.to_string(),
                    temporary: format!("{}{}", TEMPORARY_MARKER, to),
                    to,
                });
            }
        }

        Self { renames }
    }

    /// Plan for the frames currently in the image.
    pub fn build<H: Host + ?Sized>(host: &H) -> Result<Self, HostError> {
        let mut names = Vec::new();
        for frame in enumerate_frames(host)? {
            let mut children = Vec::new();
            for &child in frame.children() {
                children.push((child, host.name(child)?));
            }
            names.push(FrameNames {
                item: frame.item,
                name: frame.observed.name,
                children,
            });
        }
        Ok(Self::from_names(&names))
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn temporary_names(&self) -> HashSet<&str> {
        self.renames.iter().map(|r| r.temporary.as_str()).collect()
    }

    pub fn final_names(&self) -> HashSet<&str> {
        self.renames.iter().map(|r| r.to.as_str()).collect()
    }

    /// Run both passes against the host.
    pub fn execute<H: Host + ?Sized>(&self, host: &mut H) -> Result<(), HostError> {
        for rename in &self.renames {
            debug!(from = %rename.from, to = %rename.temporary, "Renumber pass 1");
            host.set_name(rename.item, &rename.temporary)?;
        }
        for rename in &self.renames {
            debug!(from = %rename.temporary, to = %rename.to, "Renumber pass 2");
            host.set_name(rename.item, &rename.to)?;
        }
        Ok(())
    }
}

/// Renumber all frames in one change group. Returns the number of renamed items.
pub fn renumber<H: Host + ?Sized>(host: &mut H) -> Result<usize, OnionError> {
    let plan = RenumberPlan::build(host)?;
    if plan.is_empty() {
        debug!("Frame numbers already match stacking order");
        return Ok(0);
    }

    let mut batch = ChangeGroup::begin(host, "Renumber frames")?;
    plan.execute(&mut *batch)?;
    info!(renamed = plan.renames.len(), "Renumbered frames");
    Ok(plan.renames.len())
}
