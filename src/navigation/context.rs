//! Context windows
//!
//! A context window lists the opacity of each frame around the focal one, from
//! the farthest frame before it to the farthest after it. The middle slot is
//! the focal frame itself. An empty slot means "keep that neighbour hidden".

use crate::error::OnionError;
use crate::types::FULL_OPACITY;
use std::fmt;
use std::str::FromStr;

/// Symmetric, odd-length window of neighbour opacities.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextWindow {
    slots: Vec<Option<f64>>,
}

impl ContextWindow {
    /// # Panics
    ///
    /// If `slots` has even length. Callers construct windows from constants or
    /// validated input; use [`ContextWindow::try_new`] for anything else.
    pub fn new(slots: Vec<Option<f64>>) -> Self {
        assert!(
            slots.len() % 2 == 1,
            "context window must have odd length, got {}",
            slots.len()
        );
        Self { slots }
    }

    pub fn try_new(slots: Vec<Option<f64>>) -> Result<Self, OnionError> {
        if slots.len() % 2 == 0 {
            return Err(OnionError::InvalidContext(format!(
                "expected an odd number of slots, got {}",
                slots.len()
            )));
        }
        if let Some(bad) = slots.iter().flatten().find(|o| !(0.0..=FULL_OPACITY).contains(*o)) {
            return Err(OnionError::InvalidContext(format!(
                "opacity {} outside 0..=100",
                bad
            )));
        }
        Ok(Self { slots })
    }

    /// Only the focal frame.
    pub fn focus_only() -> Self {
        Self::new(vec![Some(FULL_OPACITY)])
    }

    /// Focal frame with both direct neighbours at `opacity`.
    pub fn symmetric(opacity: f64) -> Self {
        Self::new(vec![Some(opacity), Some(FULL_OPACITY), Some(opacity)])
    }

    pub fn slots(&self) -> &[Option<f64>] {
        &self.slots
    }

    pub fn radius(&self) -> usize {
        (self.slots.len() - 1) / 2
    }

    /// `(offset, slot)` pairs, offset relative to the focal frame.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, Option<f64>)> + '_ {
        let center = self.radius() as isize;
        self.slots
            .iter()
            .enumerate()
            .map(move |(j, slot)| (j as isize - center, *slot))
    }
}

impl fmt::Display for ContextWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .slots
            .iter()
            .map(|s| match s {
                Some(o) => format!("{}", o),
                None => "-".to_string(),
            })
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Parses `25,100,25` or `[-, 100, 25]`; `-` marks an empty slot.
impl FromStr for ContextWindow {
    type Err = OnionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
        let mut slots = Vec::new();
        for part in inner.split(',') {
            let part = part.trim();
            if part == "-" {
                slots.push(None);
            } else {
                let value = part.parse::<f64>().map_err(|e| {
                    OnionError::InvalidContext(format!("bad slot '{}': {}", part, e))
                })?;
                slots.push(Some(value));
            }
        }
        Self::try_new(slots)
    }
}

/// Windows stepped through by "cycle context": none, both, after only,
/// before only.
pub fn default_cycle(neighbor_opacity: f64) -> Vec<ContextWindow> {
    let o = Some(neighbor_opacity);
    let focal = Some(FULL_OPACITY);
    vec![
        ContextWindow::new(vec![None, focal, None]),
        ContextWindow::new(vec![o, focal, o]),
        ContextWindow::new(vec![None, focal, o]),
        ContextWindow::new(vec![o, focal, None]),
    ]
}
