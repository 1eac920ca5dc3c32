//! Frame enumeration: every top-level item whose name is not disabled.

use super::{Frame, FrameKind, Observed};
use crate::error::HostError;
use crate::host::Host;

const DISABLED_OPEN: char = '[';
const DISABLED_CLOSE: char = ']';

/// Disabled frames are bracket-wrapped; only the leading bracket is checked.
pub fn is_disabled_name(name: &str) -> bool {
    name.starts_with(DISABLED_OPEN)
}

/// `name` wrapped in the disabled marker, unchanged if already disabled.
pub fn disabled_name(name: &str) -> String {
    if is_disabled_name(name) {
        name.to_string()
    } else {
        format!("{DISABLED_OPEN}{name}{DISABLED_CLOSE}")
    }
}

/// `name` with the disabled marker removed, unchanged if not disabled.
pub fn enabled_name(name: &str) -> String {
    match name.strip_prefix(DISABLED_OPEN) {
        Some(rest) => rest.strip_suffix(DISABLED_CLOSE).unwrap_or(rest).to_string(),
        None => name.to_string(),
    }
}

/// Frames of the image in stacking order, read fresh from the host.
pub fn enumerate_frames<H: Host + ?Sized>(host: &H) -> Result<Vec<Frame>, HostError> {
    let mut frames = Vec::new();
    for item in host.top_level_items()? {
        let name = host.name(item)?;
        if is_disabled_name(&name) {
            continue;
        }
        let kind = match host.children(item)? {
            Some(children) => FrameKind::Group(children),
            None => FrameKind::Plain,
        };
        let observed = Observed {
            name,
            opacity: host.opacity(item)?,
            visible: host.visible(item)?,
        };
        frames.push(Frame::new(item, kind, observed));
    }
    Ok(frames)
}
