//! In-memory host
//!
//! A self-contained item tree implementing [`Host`]. Used by the `onion` binary,
//! which loads and saves it as a JSON [`ImageDocument`], and by tests, which
//! inspect the property-write counter and change-group log.

use super::Host;
use crate::error::{HostError, OnionError};
use crate::types::{BlendMode, ItemId, Rgb, FULL_OPACITY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
struct MemoryItem {
    name: String,
    opacity: f64,
    visible: bool,
    mode: BlendMode,
    fill: Option<Rgb>,
    children: Option<Vec<ItemId>>,
    parent: Option<ItemId>,
    mask: Option<bool>,
}

impl MemoryItem {
    fn new(name: &str, children: Option<Vec<ItemId>>) -> Self {
        Self {
            name: name.to_string(),
            opacity: FULL_OPACITY,
            visible: true,
            mode: BlendMode::Normal,
            fill: None,
            children,
            parent: None,
            mask: None,
        }
    }
}

/// In-memory image implementing [`Host`].
#[derive(Debug, Clone)]
pub struct MemoryHost {
    width: u32,
    height: u32,
    items: BTreeMap<ItemId, MemoryItem>,
    top_level: Vec<ItemId>,
    active: Option<ItemId>,
    foreground: Rgb,
    next_id: u64,
    change_depth: usize,
    change_groups: Vec<String>,
    writes: usize,
}

impl MemoryHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            items: BTreeMap::new(),
            top_level: Vec::new(),
            active: None,
            foreground: Rgb::BLACK,
            next_id: 1,
            change_depth: 0,
            change_groups: Vec::new(),
            writes: 0,
        }
    }

    /// Create a plain layer and append it at the bottom of `parent`.
    pub fn add_layer(&mut self, parent: Option<ItemId>, name: &str) -> Result<ItemId, HostError> {
        let id = self.alloc(MemoryItem::new(name, None));
        let position = self.siblings(parent)?.len();
        self.attach(id, parent, position)?;
        Ok(id)
    }

    /// Create an empty group and append it at the bottom of `parent`.
    pub fn add_group(&mut self, parent: Option<ItemId>, name: &str) -> Result<ItemId, HostError> {
        let id = self.alloc(MemoryItem::new(name, Some(Vec::new())));
        let position = self.siblings(parent)?.len();
        self.attach(id, parent, position)?;
        Ok(id)
    }

    pub fn add_mask(&mut self, item: ItemId) -> Result<(), HostError> {
        self.item_mut(item)?.mask = Some(false);
        Ok(())
    }

    /// Whether the item's mask is being edited (`None` without a mask).
    pub fn edit_mask(&self, item: ItemId) -> Result<Option<bool>, HostError> {
        Ok(self.item(item)?.mask)
    }

    pub fn fill_of(&self, item: ItemId) -> Result<Option<Rgb>, HostError> {
        Ok(self.item(item)?.fill)
    }

    pub fn mode_of(&self, item: ItemId) -> Result<BlendMode, HostError> {
        Ok(self.item(item)?.mode)
    }

    /// Number of mutating calls made so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn change_group_depth(&self) -> usize {
        self.change_depth
    }

    /// Labels of the outermost change groups opened so far, one per undo
    /// step. Nested groups fold into their enclosing one.
    pub fn change_groups(&self) -> &[String] {
        &self.change_groups
    }

    /// Names of every attached item, depth-first in stacking order.
    pub fn all_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.walk(&self.top_level, &mut |id| {
            if let Some(item) = self.items.get(&id) {
                out.push(item.name.clone());
            }
        });
        out
    }

    fn alloc(&mut self, item: MemoryItem) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, item);
        id
    }

    fn item(&self, id: ItemId) -> Result<&MemoryItem, HostError> {
        self.items.get(&id).ok_or(HostError::ItemNotFound(id))
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut MemoryItem, HostError> {
        self.items.get_mut(&id).ok_or(HostError::ItemNotFound(id))
    }

    fn siblings(&self, parent: Option<ItemId>) -> Result<&Vec<ItemId>, HostError> {
        match parent {
            None => Ok(&self.top_level),
            Some(p) => self.item(p)?.children.as_ref().ok_or(HostError::NotAGroup(p)),
        }
    }

    fn siblings_mut(&mut self, parent: Option<ItemId>) -> Result<&mut Vec<ItemId>, HostError> {
        match parent {
            None => Ok(&mut self.top_level),
            Some(p) => self
                .items
                .get_mut(&p)
                .ok_or(HostError::ItemNotFound(p))?
                .children
                .as_mut()
                .ok_or(HostError::NotAGroup(p)),
        }
    }

    fn is_attached(&self, id: ItemId) -> Result<bool, HostError> {
        let parent = self.item(id)?.parent;
        Ok(self.siblings(parent)?.contains(&id))
    }

    fn detach(&mut self, id: ItemId) -> Result<(), HostError> {
        let parent = self.item(id)?.parent;
        self.siblings_mut(parent)?.retain(|c| *c != id);
        self.item_mut(id)?.parent = None;
        Ok(())
    }

    fn attach(
        &mut self,
        id: ItemId,
        parent: Option<ItemId>,
        position: usize,
    ) -> Result<(), HostError> {
        // Refuse to parent an item under itself or one of its descendants.
        let mut ancestor = parent;
        while let Some(a) = ancestor {
            if a == id {
                return Err(HostError::InvalidPosition { parent, position });
            }
            ancestor = self.item(a)?.parent;
        }

        let siblings = self.siblings_mut(parent)?;
        if position > siblings.len() {
            return Err(HostError::InvalidPosition { parent, position });
        }
        siblings.insert(position, id);
        self.item_mut(id)?.parent = parent;
        Ok(())
    }

    fn walk(&self, ids: &[ItemId], visit: &mut dyn FnMut(ItemId)) {
        for id in ids {
            visit(*id);
            if let Some(children) = self.items.get(id).and_then(|i| i.children.as_ref()) {
                self.walk(children, visit);
            }
        }
    }

    fn copy_subtree(&mut self, id: ItemId) -> Result<ItemId, HostError> {
        let mut copy = self.item(id)?.clone();
        copy.parent = None;
        let children = copy.children.take();
        let new_id = self.alloc(copy);

        if let Some(children) = children {
            let mut copied = Vec::with_capacity(children.len());
            for child in children {
                let child_copy = self.copy_subtree(child)?;
                self.item_mut(child_copy)?.parent = Some(new_id);
                copied.push(child_copy);
            }
            self.item_mut(new_id)?.children = Some(copied);
        }
        Ok(new_id)
    }

    fn delete_subtree(&mut self, id: ItemId) {
        if let Some(item) = self.items.remove(&id) {
            if self.active == Some(id) {
                self.active = None;
            }
            for child in item.children.unwrap_or_default() {
                self.delete_subtree(child);
            }
        }
    }

    /// Build a host from a parsed document.
    pub fn from_document(doc: &ImageDocument) -> Result<Self, HostError> {
        let mut host = MemoryHost::new(doc.width, doc.height);
        host.foreground = doc.foreground;
        for node in &doc.layers {
            host.load_node(None, node)?;
        }
        if let Some(ref active) = doc.active {
            host.active = host.find_item_by_name(active)?;
        }
        Ok(host)
    }

    fn load_node(&mut self, parent: Option<ItemId>, node: &LayerNode) -> Result<(), HostError> {
        let id = match node.children {
            Some(_) => self.add_group(parent, &node.name)?,
            None => self.add_layer(parent, &node.name)?,
        };
        let item = self.item_mut(id)?;
        item.opacity = node.opacity;
        item.visible = node.visible;
        item.mode = node.mode;
        item.fill = node.fill;
        item.mask = node.mask.then_some(node.edit_mask);

        for child in node.children.iter().flatten() {
            self.load_node(Some(id), child)?;
        }
        Ok(())
    }

    /// Snapshot the attached tree as a document.
    pub fn to_document(&self) -> ImageDocument {
        ImageDocument {
            width: self.width,
            height: self.height,
            foreground: self.foreground,
            active: self
                .active
                .and_then(|id| self.items.get(&id))
                .map(|i| i.name.clone()),
            layers: self.save_nodes(&self.top_level),
        }
    }

    fn save_nodes(&self, ids: &[ItemId]) -> Vec<LayerNode> {
        ids.iter()
            .filter_map(|id| self.items.get(id))
            .map(|item| LayerNode {
                name: item.name.clone(),
                opacity: item.opacity,
                visible: item.visible,
                mode: item.mode,
                fill: item.fill,
                mask: item.mask.is_some(),
                edit_mask: item.mask.unwrap_or(false),
                children: item.children.as_ref().map(|c| self.save_nodes(c)),
            })
            .collect()
    }

    /// Load an image document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, OnionError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            OnionError::Document(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let doc: ImageDocument = serde_json::from_str(&text).map_err(|e| {
            OnionError::Document(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Self::from_document(&doc)?)
    }

    /// Write the image back as a JSON document.
    pub fn save(&self, path: &Path) -> Result<(), OnionError> {
        let text = serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| OnionError::Document(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| {
            OnionError::Document(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

impl Host for MemoryHost {
    fn top_level_items(&self) -> Result<Vec<ItemId>, HostError> {
        Ok(self.top_level.clone())
    }

    fn children(&self, item: ItemId) -> Result<Option<Vec<ItemId>>, HostError> {
        Ok(self.item(item)?.children.clone())
    }

    fn parent(&self, item: ItemId) -> Result<Option<ItemId>, HostError> {
        Ok(self.item(item)?.parent)
    }

    fn name(&self, item: ItemId) -> Result<String, HostError> {
        Ok(self.item(item)?.name.clone())
    }

    fn set_name(&mut self, item: ItemId, name: &str) -> Result<(), HostError> {
        self.item_mut(item)?.name = name.to_string();
        self.writes += 1;
        Ok(())
    }

    fn opacity(&self, item: ItemId) -> Result<f64, HostError> {
        Ok(self.item(item)?.opacity)
    }

    fn set_opacity(&mut self, item: ItemId, opacity: f64) -> Result<(), HostError> {
        self.item_mut(item)?.opacity = opacity.clamp(0.0, FULL_OPACITY);
        self.writes += 1;
        Ok(())
    }

    fn visible(&self, item: ItemId) -> Result<bool, HostError> {
        Ok(self.item(item)?.visible)
    }

    fn set_visible(&mut self, item: ItemId, visible: bool) -> Result<(), HostError> {
        self.item_mut(item)?.visible = visible;
        self.writes += 1;
        Ok(())
    }

    fn has_mask(&self, item: ItemId) -> Result<bool, HostError> {
        Ok(self.item(item)?.mask.is_some())
    }

    fn set_edit_mask(&mut self, item: ItemId, editing: bool) -> Result<(), HostError> {
        let entry = self.item_mut(item)?;
        if entry.mask.is_some() {
            entry.mask = Some(editing);
        }
        self.writes += 1;
        Ok(())
    }

    fn create_layer(&mut self, name: &str, mode: BlendMode) -> Result<ItemId, HostError> {
        let mut item = MemoryItem::new(name, None);
        item.mode = mode;
        self.writes += 1;
        Ok(self.alloc(item))
    }

    fn create_group(&mut self, name: &str) -> Result<ItemId, HostError> {
        self.writes += 1;
        Ok(self.alloc(MemoryItem::new(name, Some(Vec::new()))))
    }

    fn duplicate_item(&mut self, item: ItemId) -> Result<ItemId, HostError> {
        self.writes += 1;
        self.copy_subtree(item)
    }

    fn insert_item(
        &mut self,
        item: ItemId,
        parent: Option<ItemId>,
        position: usize,
    ) -> Result<(), HostError> {
        if self.is_attached(item)? {
            self.detach(item)?;
        }
        self.attach(item, parent, position)?;
        self.writes += 1;
        Ok(())
    }

    fn remove_item(&mut self, item: ItemId) -> Result<(), HostError> {
        self.detach(item)?;
        self.delete_subtree(item);
        self.writes += 1;
        Ok(())
    }

    fn reorder_item(
        &mut self,
        item: ItemId,
        parent: Option<ItemId>,
        position: usize,
    ) -> Result<(), HostError> {
        if !self.is_attached(item)? {
            return Err(HostError::ItemNotFound(item));
        }
        let old_parent = self.item(item)?.parent;
        let old_position = self.position(item)?;
        self.detach(item)?;
        if let Err(e) = self.attach(item, parent, position) {
            self.attach(item, old_parent, old_position)?;
            return Err(e);
        }
        self.writes += 1;
        Ok(())
    }

    fn position(&self, item: ItemId) -> Result<usize, HostError> {
        let parent = self.item(item)?.parent;
        self.siblings(parent)?
            .iter()
            .position(|c| *c == item)
            .ok_or(HostError::ItemNotFound(item))
    }

    fn find_item_by_name(&self, name: &str) -> Result<Option<ItemId>, HostError> {
        let mut found = None;
        self.walk(&self.top_level, &mut |id| {
            if found.is_none() && self.items.get(&id).is_some_and(|i| i.name == name) {
                found = Some(id);
            }
        });
        Ok(found)
    }

    fn fill_foreground(&mut self, item: ItemId) -> Result<(), HostError> {
        let color = self.foreground;
        self.item_mut(item)?.fill = Some(color);
        self.writes += 1;
        Ok(())
    }

    fn foreground(&self) -> Result<Rgb, HostError> {
        Ok(self.foreground)
    }

    fn set_foreground(&mut self, color: Rgb) -> Result<(), HostError> {
        self.foreground = color;
        self.writes += 1;
        Ok(())
    }

    fn active_item(&self) -> Result<Option<ItemId>, HostError> {
        Ok(self.active)
    }

    fn set_active_item(&mut self, item: ItemId) -> Result<(), HostError> {
        self.item(item)?;
        self.active = Some(item);
        self.writes += 1;
        Ok(())
    }

    fn begin_change_group(&mut self, label: &str) -> Result<(), HostError> {
        if self.change_depth == 0 {
            self.change_groups.push(label.to_string());
        }
        self.change_depth += 1;
        Ok(())
    }

    fn end_change_group(&mut self) {
        self.change_depth = self.change_depth.saturating_sub(1);
    }
}

/// Serialized image: a nested layer tree, top-most first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDocument {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_foreground")]
    pub foreground: Rgb,
    /// Name of the active item (first match in stacking order).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(default)]
    pub layers: Vec<LayerNode>,
}

/// One layer or group in an [`ImageDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerNode {
    pub name: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub mode: BlendMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgb>,
    #[serde(default)]
    pub mask: bool,
    #[serde(default)]
    pub edit_mask: bool,
    /// Present for groups, absent for plain layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LayerNode>>,
}

fn default_foreground() -> Rgb {
    Rgb::BLACK
}

fn default_opacity() -> f64 {
    FULL_OPACITY
}

fn default_visible() -> bool {
    true
}
