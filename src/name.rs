//! Numbered names
//!
//! Frame and sub-layer names carry a trailing frame number (`outline01`). When a
//! layer mask is being edited the host reports the active item's name with a
//! ` mask` suffix appended; parsing strips it and records the fact.

use std::fmt;

const MASK_SUFFIX: &str = " mask";

/// A name split into stem and optional zero-padded numeric suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedName {
    pub stem: String,
    pub number: Option<u64>,
    /// Digit count of the suffix, leading zeros included. Set iff `number` is.
    pub width: Option<usize>,
    pub is_mask: bool,
}

impl NumberedName {
    /// Parse a raw item name. Never fails: names without a digit run simply
    /// have no number.
    pub fn parse(raw: &str) -> Self {
        let (base, is_mask) = match raw.strip_suffix(MASK_SUFFIX) {
            Some(base) => (base, true),
            None => (raw, false),
        };

        let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits = &base[stem.len()..];

        // A digit run too long for u64 has no usable numeric identity.
        match digits.parse::<u64>() {
            Ok(number) => NumberedName {
                stem: stem.to_string(),
                number: Some(number),
                width: Some(digits.len()),
                is_mask,
            },
            Err(_) => NumberedName {
                stem: base.to_string(),
                number: None,
                width: None,
                is_mask,
            },
        }
    }

    /// Same stem and width, different number.
    pub fn with_number(&self, number: u64) -> Self {
        NumberedName {
            stem: self.stem.clone(),
            number: Some(number),
            width: Some(self.width.unwrap_or(1)),
            is_mask: false,
        }
    }

    /// Render back to a name. The mask flag is metadata and is not re-emitted;
    /// the width is a minimum, never a cap.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NumberedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(number) => {
                let width = self.width.unwrap_or(1);
                write!(f, "{}{:0width$}", self.stem, number, width = width)
            }
            None => f.write_str(&self.stem),
        }
    }
}

/// Logical layer identity across frames: the name with its frame number and
/// mask suffix removed.
pub fn sanitize(name: &str) -> String {
    NumberedName::parse(name).stem
}
