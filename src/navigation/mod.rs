//! Frame Navigation
//!
//! Locates the focal frame, works out (or takes) the context window around it,
//! steps to the next focal frame and writes the resulting visibility, opacity
//! and tint state back to the host in one change group. Nothing is kept between
//! calls: every pass re-derives its state from the item properties.

pub mod context;

pub use context::{default_cycle, ContextWindow};

use crate::error::{HostError, OnionError};
use crate::frame::{enumerate_frames, tint, Frame, FrameKind, Tint, TintPalette};
use crate::host::{ChangeGroup, Host};
use crate::name::sanitize;
use crate::types::{FULL_OPACITY, NEIGHBOR_OPACITY_CAP};
use tracing::{debug, info, warn};

/// Engine parameters that come from configuration.
#[derive(Debug, Clone)]
pub struct NavigationSettings {
    /// Neighbours sampled on each side when the context is computed.
    pub radius: usize,
    pub palette: TintPalette,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            radius: 1,
            palette: TintPalette::default(),
        }
    }
}

/// One navigation call.
#[derive(Debug, Clone, Default)]
pub struct NavigationRequest {
    /// Frames to move by; negative moves towards the top of the stack.
    pub increment: isize,
    /// Explicit window, or `None` to keep the window currently on screen.
    pub context: Option<ContextWindow>,
    pub tinting: bool,
    /// Compute the window only; touch nothing.
    pub dry_run: bool,
}

impl NavigationRequest {
    pub fn step(increment: isize, context: Option<ContextWindow>) -> Self {
        Self {
            increment,
            context,
            ..Default::default()
        }
    }

    pub fn query() -> Self {
        Self {
            dry_run: true,
            ..Default::default()
        }
    }

    pub fn with_tinting(mut self, tinting: bool) -> Self {
        self.tinting = tinting;
        self
    }
}

fn wrap(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

fn is_focal(frame: &Frame) -> bool {
    frame.observed.visible && frame.observed.opacity == FULL_OPACITY
}

/// Index of the last fully opaque, visible frame.
pub fn locate_current(frames: &[Frame]) -> Option<usize> {
    frames.iter().rposition(is_focal)
}

/// [`locate_current`], falling back to the first frame when none qualifies.
pub fn current_index(frames: &[Frame]) -> usize {
    match locate_current(frames) {
        Some(index) => index,
        None => {
            warn!(frames = frames.len(), "No focal frame found, using the first frame");
            0
        }
    }
}

/// Sample the window currently shown around `current`.
///
/// Neighbour opacities are capped below full so a neighbour is never read as
/// the focal frame by a later call. With no frames every slot is empty.
pub fn compute_context(frames: &[Frame], current: usize, radius: usize) -> ContextWindow {
    let n = frames.len();
    if n == 0 {
        return ContextWindow::new(vec![None; 2 * radius + 1]);
    }
    let r = radius as isize;
    let slots = (-r..=r)
        .map(|offset| {
            let frame = &frames[wrap(current as isize + offset, n)];
            if !frame.observed.visible {
                return None;
            }
            let opacity = frame.observed.opacity;
            if offset != 0 && opacity >= NEIGHBOR_OPACITY_CAP {
                Some(NEIGHBOR_OPACITY_CAP)
            } else {
                Some(opacity)
            }
        })
        .collect();
    ContextWindow::new(slots)
}

/// Fill in desired state for every frame and return the new focal index.
///
/// When the window wraps onto itself (window wider than the frame count) the
/// first slot to reach a frame wins. An empty slice plans nothing and
/// reports index 0.
pub fn plan_navigation(
    frames: &mut [Frame],
    current: usize,
    increment: isize,
    context: &ContextWindow,
    tinting: bool,
) -> usize {
    let n = frames.len();
    if n == 0 {
        return 0;
    }
    let focal = wrap(current as isize + increment, n);

    for frame in frames.iter_mut() {
        frame.visible = Some(false);
    }

    for (offset, slot) in context.offsets() {
        let Some(opacity) = slot else { continue };
        let target = wrap(focal as isize + offset, n);
        if target == focal || frames[target].visible == Some(true) {
            continue;
        }

        let frame = &mut frames[target];
        frame.opacity = Some(opacity);
        frame.visible = Some(true);
        if tinting {
            // Frames above the focal one get the "after" tint.
            frame.tint = if offset < 0 { Tint::After } else { Tint::Before };
        }
    }

    let frame = &mut frames[focal];
    frame.opacity = Some(FULL_OPACITY);
    frame.visible = Some(true);
    frame.tint = Tint::None;

    focal
}

/// Run one navigation pass. Returns the window used, or `None` when the image
/// has no frames.
pub fn navigate<H: Host + ?Sized>(
    host: &mut H,
    request: &NavigationRequest,
    settings: &NavigationSettings,
) -> Result<Option<ContextWindow>, OnionError> {
    let mut frames = enumerate_frames(host)?;
    if frames.is_empty() {
        debug!("No frames, nothing to navigate");
        return Ok(None);
    }

    let current = current_index(&frames);
    let context = match &request.context {
        Some(context) => context.clone(),
        None => compute_context(&frames, current, settings.radius),
    };
    debug!(current, context = %context, dry_run = request.dry_run, "Resolved context");

    if request.dry_run {
        return Ok(Some(context));
    }

    let previous_active = match host.active_item()? {
        Some(item) => Some(host.name(item)?),
        None => None,
    };

    let focal = plan_navigation(
        &mut frames,
        current,
        request.increment,
        &context,
        request.tinting,
    );

    {
        let mut batch = ChangeGroup::begin(host, "Onion navigation")?;
        tint::hide_all(&mut *batch, &settings.palette)?;
        for frame in &frames {
            frame.apply(&mut *batch, &settings.palette)?;
        }
    }

    focus_active(
        host,
        &frames[focal],
        previous_active.as_deref(),
        &settings.palette,
    )?;

    info!(
        from = current,
        to = focal,
        frame = %frames[focal].observed.name,
        "Navigated"
    );
    Ok(Some(context))
}

/// Make the matching sub-layer of the new focal frame active, so the user keeps
/// drawing on the same logical layer. Plain frames become active themselves.
fn focus_active<H: Host + ?Sized>(
    host: &mut H,
    frame: &Frame,
    previous_active: Option<&str>,
    palette: &TintPalette,
) -> Result<(), HostError> {
    let children = match &frame.kind {
        FrameKind::Plain => return host.set_active_item(frame.item),
        FrameKind::Group(children) => children,
    };
    let Some(previous) = previous_active else {
        return Ok(());
    };

    let wanted = sanitize(previous);
    for &child in children {
        let name = host.name(child)?;
        if palette.is_tint_name(&name) || sanitize(&name) != wanted {
            continue;
        }
        host.set_active_item(child)?;
        if host.has_mask(child)? {
            host.set_edit_mask(child, false)?;
        }
        break;
    }
    Ok(())
}
