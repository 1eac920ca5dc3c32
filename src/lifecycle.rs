//! Frame Lifecycle
//!
//! Operations that change the set or shape of frames rather than which frame
//! is on screen: adding a frame, enabling and disabling frames, wrapping bare
//! layers in groups, propagating a sub-layer to every frame, and resetting
//! every frame to fully visible.

use crate::error::{HostError, OnionError};
use crate::frame::enumerate::{disabled_name, enabled_name};
use crate::frame::{enumerate_frames, tint, Tint, TintKind, TintPalette};
use crate::host::{ChangeGroup, Host};
use crate::name::{sanitize, NumberedName};
use crate::navigation::{navigate, NavigationRequest, NavigationSettings};
use crate::renumber::renumber;
use crate::types::{BlendMode, ItemId, FULL_OPACITY};
use tracing::{debug, info};

/// Highest number carried by any frame or frame child.
fn max_frame_number<H: Host + ?Sized>(host: &H) -> Result<u64, HostError> {
    let mut max = 0;
    for frame in enumerate_frames(host)? {
        let mut names = vec![frame.observed.name.clone()];
        for &child in frame.children() {
            names.push(host.name(child)?);
        }
        for name in names {
            if let Some(number) = NumberedName::parse(&name).number {
                max = max.max(number);
            }
        }
    }
    Ok(max)
}

fn renumbered(name: &str, number: u64) -> String {
    let parsed = NumberedName::parse(name);
    match parsed.number {
        Some(_) => parsed.with_number(number).format(),
        None => name.to_string(),
    }
}

fn set_opacity_if_changed<H: Host + ?Sized>(
    host: &mut H,
    item: ItemId,
    opacity: f64,
) -> Result<(), HostError> {
    if host.opacity(item)? != opacity {
        host.set_opacity(item, opacity)?;
    }
    Ok(())
}

fn set_visible_if_changed<H: Host + ?Sized>(
    host: &mut H,
    item: ItemId,
    visible: bool,
) -> Result<(), HostError> {
    if host.visible(item)? != visible {
        host.set_visible(item, visible)?;
    }
    Ok(())
}

/// Show every frame at full opacity and remove all tint layers.
pub fn show_all<H: Host + ?Sized>(host: &mut H, palette: &TintPalette) -> Result<(), OnionError> {
    let mut frames = enumerate_frames(host)?;
    if frames.is_empty() {
        return Ok(());
    }
    for frame in frames.iter_mut() {
        frame.opacity = Some(FULL_OPACITY);
        frame.visible = Some(true);
        frame.tint = Tint::Clean;
    }

    let mut batch = ChangeGroup::begin(host, "Show all frames")?;
    for frame in &frames {
        frame.apply(&mut *batch, palette)?;
    }
    // Tints parked under disabled frames are not reached by the pass above.
    for kind in TintKind::ALL {
        if let Some(layer) = batch.find_item_by_name(&palette.layer_name(kind))? {
            batch.remove_item(layer)?;
        }
    }
    info!(frames = frames.len(), "Showing all frames");
    Ok(())
}

/// Recreate the layer structure of `source` (names, opacity, visibility)
/// under `target`, giving numbered items `number`.
fn copy_structure<H: Host + ?Sized>(
    host: &mut H,
    source: ItemId,
    target: ItemId,
    number: u64,
    palette: &TintPalette,
) -> Result<(), HostError> {
    let mut position = 0;
    for child in host.children(source)?.unwrap_or_default() {
        let name = host.name(child)?;
        if palette.is_tint_name(&name) {
            continue;
        }
        let new_name = renumbered(&name, number);
        let copy = if host.is_group(child)? {
            let group = host.create_group(&new_name)?;
            host.insert_item(group, Some(target), position)?;
            copy_structure(host, child, group, number, palette)?;
            group
        } else {
            let layer = host.create_layer(&new_name, BlendMode::Normal)?;
            host.insert_item(layer, Some(target), position)?;
            layer
        };
        let opacity = host.opacity(child)?;
        let visible = host.visible(child)?;
        set_opacity_if_changed(host, copy, opacity)?;
        set_visible_if_changed(host, copy, visible)?;
        position += 1;
    }
    Ok(())
}

/// Add an empty frame shaped like the one holding the active item, directly
/// above it, and make it the focal frame with the same context as before.
///
/// Returns the new frame group, or `None` when the image has no frames.
pub fn add_frame<H: Host + ?Sized>(
    host: &mut H,
    settings: &NavigationSettings,
) -> Result<Option<ItemId>, OnionError> {
    let Some(context) = navigate(host, &NavigationRequest::query(), settings)? else {
        return Ok(None);
    };

    let active = host.active_item()?.ok_or(OnionError::NoActiveItem)?;
    let frame = host.top_level_of(active)?;
    let frame_name = host.name(frame)?;
    if !host.is_group(frame)? {
        return Err(OnionError::FrameNotGroup(frame_name));
    }

    let provisional = max_frame_number(host)? + 1;
    // Insert, renumber and navigation share one bracket.
    let mut batch = ChangeGroup::begin(host, "Add frame")?;
    // Hidden so the new frame is the only focal candidate.
    set_visible_if_changed(&mut *batch, frame, false)?;

    let position = batch.position(frame)?;
    let group = batch.create_group(&renumbered(&frame_name, provisional))?;
    batch.insert_item(group, None, position)?;
    copy_structure(&mut *batch, frame, group, provisional, &settings.palette)?;
    debug!(frame = %frame_name, provisional, "Inserted new frame");

    renumber(&mut *batch)?;

    let tinting = tint::exists(&*batch, &settings.palette, TintKind::After)?;
    let request = NavigationRequest::step(0, Some(context)).with_tinting(tinting);
    navigate(&mut *batch, &request, settings)?;

    info!(name = %batch.name(group)?, "Added frame");
    Ok(Some(group))
}

/// Enable or disable the frame holding the active item.
pub fn set_frame_enabled<H: Host + ?Sized>(host: &mut H, enabled: bool) -> Result<(), OnionError> {
    // Disabled frames count here, so only a truly empty image is skipped.
    if host.top_level_items()?.is_empty() {
        debug!("Empty image, no frame to toggle");
        return Ok(());
    }
    let active = host.active_item()?.ok_or(OnionError::NoActiveItem)?;
    let frame = host.top_level_of(active)?;
    let name = host.name(frame)?;
    let new_name = if enabled {
        enabled_name(&name)
    } else {
        disabled_name(&name)
    };
    if new_name == name {
        debug!(frame = %name, enabled, "Frame already in requested state");
        return Ok(());
    }

    let mut batch = ChangeGroup::begin(host, "Toggle frame")?;
    batch.set_name(frame, &new_name)?;
    info!(from = %name, to = %new_name, "Toggled frame");
    Ok(())
}

/// Wrap every plain top-level frame in a single-child group, then renumber.
/// The frame's opacity and visibility move to the new group. Returns the
/// number of frames converted.
pub fn convert_bare_layers<H: Host + ?Sized>(host: &mut H) -> Result<usize, OnionError> {
    let bare: Vec<(ItemId, String)> = enumerate_frames(host)?
        .into_iter()
        .filter(|f| !f.is_group())
        .map(|f| (f.item, f.observed.name))
        .collect();
    if bare.is_empty() {
        return Ok(0);
    }

    let mut next = max_frame_number(host)? + 1;
    {
        let mut batch = ChangeGroup::begin(host, "Convert layers to frames")?;
        for (layer, name) in &bare {
            let group_name = NumberedName::parse(name).with_number(next).format();
            next += 1;

            let position = batch.position(*layer)?;
            let opacity = batch.opacity(*layer)?;
            let visible = batch.visible(*layer)?;

            let group = batch.create_group(&group_name)?;
            batch.insert_item(group, None, position)?;
            batch.reorder_item(*layer, Some(group), 0)?;

            set_opacity_if_changed(&mut *batch, group, opacity)?;
            set_visible_if_changed(&mut *batch, group, visible)?;
            set_opacity_if_changed(&mut *batch, *layer, FULL_OPACITY)?;
            set_visible_if_changed(&mut *batch, *layer, true)?;
            debug!(layer = %name, group = %group_name, "Wrapped layer");
        }
    }

    renumber(host)?;
    info!(converted = bare.len(), "Converted bare layers to frames");
    Ok(bare.len())
}

/// Make the active sub-layer exist in every group frame. Frames that already
/// have a layer with the same logical name get its visibility and opacity;
/// the rest get a copy at the same position, numbered after the frame.
/// Returns the number of copies made.
pub fn copy_layer_to_all_frames<H: Host + ?Sized>(host: &mut H) -> Result<usize, OnionError> {
    let frames = enumerate_frames(host)?;
    if frames.is_empty() {
        debug!("No frames, nothing to copy into");
        return Ok(0);
    }

    let active = host.active_item()?.ok_or(OnionError::NoActiveItem)?;
    let active_name = host.name(active)?;
    let wanted = sanitize(&active_name);
    let location = match host.parent(active)? {
        Some(_) => host.position(active)?,
        None => 0,
    };
    let visible = host.visible(active)?;
    let opacity = host.opacity(active)?;

    let mut copies = 0;
    let mut batch = ChangeGroup::begin(host, "Copy layer to all frames")?;

    for frame in frames.iter().filter(|f| f.is_group()) {
        let mut existing = None;
        for &child in frame.children() {
            if sanitize(&batch.name(child)?) == wanted {
                existing = Some(child);
                break;
            }
        }

        match existing {
            Some(child) => {
                set_visible_if_changed(&mut *batch, child, visible)?;
                set_opacity_if_changed(&mut *batch, child, opacity)?;
            }
            None => {
                let copy = batch.duplicate_item(active)?;
                let frame_number = NumberedName::parse(&frame.observed.name);
                if let Some(number) = frame_number.number {
                    let name = NumberedName {
                        stem: wanted.clone(),
                        number: Some(number),
                        width: frame_number.width,
                        is_mask: false,
                    };
                    batch.set_name(copy, &name.format())?;
                }
                let position = location.min(frame.children().len());
                batch.insert_item(copy, Some(frame.item), position)?;
                copies += 1;
                debug!(frame = %frame.observed.name, position, "Copied layer into frame");
            }
        }
    }

    info!(layer = %active_name, copies, "Copied layer to all frames");
    Ok(copies)
}
