//! Shared fixtures: frame strips built on the in-memory host.

use onion_layers::host::{Host, MemoryHost};
use onion_layers::types::ItemId;

/// A strip of group frames, numbered from `count` at the top down to 1.
/// Each frame holds one sub-layer per stem, numbered like the frame. Only the
/// top frame is visible.
pub struct Strip {
    pub host: MemoryHost,
    pub frames: Vec<ItemId>,
}

impl Strip {
    pub fn new(count: usize, stems: &[&str]) -> Self {
        let mut host = MemoryHost::new(64, 64);
        let mut frames = Vec::new();
        for i in 0..count {
            let number = count - i;
            let frame = host.add_group(None, &format!("frame{:02}", number)).unwrap();
            for stem in stems {
                host.add_layer(Some(frame), &format!("{}{:02}", stem, number))
                    .unwrap();
            }
            host.set_visible(frame, i == 0).unwrap();
            frames.push(frame);
        }
        Self { host, frames }
    }

    /// Make the first sub-layer of frame `index` active.
    pub fn activate(&mut self, index: usize) -> ItemId {
        let child = self.child(index, 0);
        self.host.set_active_item(child).unwrap();
        child
    }

    pub fn child(&self, index: usize, position: usize) -> ItemId {
        self.host.children(self.frames[index]).unwrap().unwrap()[position]
    }

    /// Frame names from the top of the stack down.
    pub fn names(&self) -> Vec<String> {
        self.host
            .top_level_items()
            .unwrap()
            .into_iter()
            .map(|id| self.host.name(id).unwrap())
            .collect()
    }

    /// (visible, opacity) per frame, in fixture order.
    pub fn states(&self) -> Vec<(bool, f64)> {
        self.frames
            .iter()
            .map(|f| {
                (
                    self.host.visible(*f).unwrap(),
                    self.host.opacity(*f).unwrap(),
                )
            })
            .collect()
    }

    pub fn focal(&self) -> Vec<usize> {
        self.states()
            .iter()
            .enumerate()
            .filter(|(_, (visible, opacity))| *visible && *opacity == 100.0)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Active item's name, if any.
pub fn active_name(host: &MemoryHost) -> Option<String> {
    host.active_item()
        .unwrap()
        .map(|id| host.name(id).unwrap())
}
