//! Host Capabilities
//!
//! The image editor that owns the layer stack. The engine only needs an ordered
//! item tree with mutable opacity, visibility and names, plus a handful of
//! structural primitives. Stacking order is top-most first: index 0 of
//! `top_level_items()` or `children()` is the top of that stack.

pub mod memory;

pub use memory::MemoryHost;

use crate::error::HostError;
use crate::types::{BlendMode, ItemId, Rgb};
use std::ops::{Deref, DerefMut};

/// Host image interface
pub trait Host {
    /// Top-level items of the image in stacking order.
    fn top_level_items(&self) -> Result<Vec<ItemId>, HostError>;
    /// Children of a group in stacking order, `None` for a plain item.
    fn children(&self, item: ItemId) -> Result<Option<Vec<ItemId>>, HostError>;
    fn parent(&self, item: ItemId) -> Result<Option<ItemId>, HostError>;

    fn name(&self, item: ItemId) -> Result<String, HostError>;
    fn set_name(&mut self, item: ItemId, name: &str) -> Result<(), HostError>;
    fn opacity(&self, item: ItemId) -> Result<f64, HostError>;
    fn set_opacity(&mut self, item: ItemId, opacity: f64) -> Result<(), HostError>;
    fn visible(&self, item: ItemId) -> Result<bool, HostError>;
    fn set_visible(&mut self, item: ItemId, visible: bool) -> Result<(), HostError>;
    fn has_mask(&self, item: ItemId) -> Result<bool, HostError>;
    fn set_edit_mask(&mut self, item: ItemId, editing: bool) -> Result<(), HostError>;

    /// Create a detached, transparent, image-sized layer.
    fn create_layer(&mut self, name: &str, mode: BlendMode) -> Result<ItemId, HostError>;
    /// Create a detached, empty layer group.
    fn create_group(&mut self, name: &str) -> Result<ItemId, HostError>;
    /// Detached copy of an item (recursively for groups).
    fn duplicate_item(&mut self, item: ItemId) -> Result<ItemId, HostError>;
    /// Attach a detached item under `parent` (top level when `None`).
    fn insert_item(
        &mut self,
        item: ItemId,
        parent: Option<ItemId>,
        position: usize,
    ) -> Result<(), HostError>;
    fn remove_item(&mut self, item: ItemId) -> Result<(), HostError>;
    /// Move an attached item to a new parent and position.
    fn reorder_item(
        &mut self,
        item: ItemId,
        parent: Option<ItemId>,
        position: usize,
    ) -> Result<(), HostError>;
    /// Position of an item within its parent (or the top level).
    fn position(&self, item: ItemId) -> Result<usize, HostError>;
    /// First attached item anywhere in the image with exactly this name.
    fn find_item_by_name(&self, name: &str) -> Result<Option<ItemId>, HostError>;

    /// Fill the whole item with the current foreground colour.
    fn fill_foreground(&mut self, item: ItemId) -> Result<(), HostError>;
    fn foreground(&self) -> Result<Rgb, HostError>;
    fn set_foreground(&mut self, color: Rgb) -> Result<(), HostError>;

    fn active_item(&self) -> Result<Option<ItemId>, HostError>;
    fn set_active_item(&mut self, item: ItemId) -> Result<(), HostError>;

    fn begin_change_group(&mut self, label: &str) -> Result<(), HostError>;
    fn end_change_group(&mut self);

    fn is_group(&self, item: ItemId) -> Result<bool, HostError> {
        Ok(self.children(item)?.is_some())
    }

    /// Walk up the parent chain to the top-level item containing `item`.
    fn top_level_of(&self, item: ItemId) -> Result<ItemId, HostError> {
        let mut current = item;
        while let Some(parent) = self.parent(current)? {
            current = parent;
        }
        Ok(current)
    }
}

/// Scoped change-group bracket.
///
/// `begin_change_group` runs on creation and `end_change_group` on drop, so the
/// bracket is closed on every exit path including early `?` returns.
pub struct ChangeGroup<'h, H: Host + ?Sized> {
    host: &'h mut H,
}

impl<'h, H: Host + ?Sized> ChangeGroup<'h, H> {
    pub fn begin(host: &'h mut H, label: &str) -> Result<Self, HostError> {
        host.begin_change_group(label)?;
        Ok(Self { host })
    }
}

impl<H: Host + ?Sized> Deref for ChangeGroup<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: Host + ?Sized> DerefMut for ChangeGroup<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: Host + ?Sized> Drop for ChangeGroup<'_, H> {
    fn drop(&mut self) {
        self.host.end_change_group();
    }
}
