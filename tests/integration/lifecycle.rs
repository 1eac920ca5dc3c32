//! Frame lifecycle operations: add, enable/disable, convert, copy, show all.

use onion_layers::error::OnionError;
use onion_layers::frame::TintPalette;
use onion_layers::host::{Host, MemoryHost};
use onion_layers::lifecycle::{
    add_frame, convert_bare_layers, copy_layer_to_all_frames, set_frame_enabled, show_all,
};
use onion_layers::navigation::{navigate, ContextWindow, NavigationRequest, NavigationSettings};

use crate::integration::{active_name, Strip};

fn context_step(host: &mut MemoryHost, increment: isize, tinting: bool) {
    let request = NavigationRequest::step(increment, Some(ContextWindow::symmetric(25.0)))
        .with_tinting(tinting);
    navigate(host, &request, &NavigationSettings::default()).unwrap();
}

fn children_names(host: &MemoryHost, item: onion_layers::types::ItemId) -> Vec<String> {
    host.children(item)
        .unwrap()
        .unwrap_or_default()
        .into_iter()
        .map(|c| host.name(c).unwrap())
        .collect()
}

#[test]
fn test_add_frame_inserts_above_and_renumbers() {
    let mut strip = Strip::new(3, &["ink", "paint"]);
    context_step(&mut strip.host, 1, false);
    strip.activate(1);

    let settings = NavigationSettings::default();
    let added = add_frame(&mut strip.host, &settings).unwrap().unwrap();

    assert_eq!(
        strip.names(),
        vec!["frame04", "frame03", "frame02", "frame01"]
    );
    assert_eq!(strip.host.position(added).unwrap(), 1);
    assert_eq!(strip.host.name(added).unwrap(), "frame03");
    assert_eq!(children_names(&strip.host, added), vec!["ink03", "paint03"]);
    assert_eq!(children_names(&strip.host, strip.frames[1]), vec!["ink02", "paint02"]);

    // The new frame is current, with the old context around it.
    assert!(strip.host.visible(added).unwrap());
    assert_eq!(strip.host.opacity(added).unwrap(), 100.0);
    assert_eq!(strip.host.opacity(strip.frames[0]).unwrap(), 25.0);
    assert!(strip.host.visible(strip.frames[1]).unwrap());
    assert_eq!(strip.host.opacity(strip.frames[1]).unwrap(), 25.0);
    assert_eq!(active_name(&strip.host).as_deref(), Some("ink03"));
}

#[test]
fn test_add_frame_keeps_tinting_in_use() {
    let mut strip = Strip::new(3, &["ink"]);
    context_step(&mut strip.host, 1, true);
    strip.activate(1);

    let added = add_frame(&mut strip.host, &NavigationSettings::default())
        .unwrap()
        .unwrap();

    let after = strip.host.find_item_by_name("onion-tint-after").unwrap().unwrap();
    assert_eq!(strip.host.parent(after).unwrap(), Some(strip.frames[0]));
    assert!(strip.host.visible(after).unwrap());
    assert!(!children_names(&strip.host, added)
        .iter()
        .any(|n| n.starts_with("onion-tint-")));
}

#[test]
fn test_add_frame_requires_group() {
    let mut host = MemoryHost::new(8, 8);
    let cel = host.add_layer(None, "cel01").unwrap();
    host.set_active_item(cel).unwrap();

    let err = add_frame(&mut host, &NavigationSettings::default()).unwrap_err();
    assert!(matches!(err, OnionError::FrameNotGroup(name) if name == "cel01"));
    assert_eq!(host.change_group_depth(), 0);
}

#[test]
fn test_add_frame_on_empty_image() {
    let mut host = MemoryHost::new(8, 8);
    assert_eq!(add_frame(&mut host, &NavigationSettings::default()).unwrap(), None);
}

#[test]
fn test_add_frame_is_one_change_group() {
    let mut strip = Strip::new(3, &["ink"]);
    context_step(&mut strip.host, 1, true);
    strip.activate(1);
    let before = strip.host.change_groups().len();

    add_frame(&mut strip.host, &NavigationSettings::default()).unwrap();
    assert_eq!(&strip.host.change_groups()[before..], &["Add frame".to_string()]);
    assert_eq!(strip.host.change_group_depth(), 0);
}

#[test]
fn test_active_item_commands_on_empty_image() {
    let mut host = MemoryHost::new(8, 8);
    assert_eq!(copy_layer_to_all_frames(&mut host).unwrap(), 0);
    set_frame_enabled(&mut host, false).unwrap();
    set_frame_enabled(&mut host, true).unwrap();
    assert_eq!(host.writes(), 0);
    assert!(host.change_groups().is_empty());
}

#[test]
fn test_enable_frame_when_every_frame_is_disabled() {
    let mut host = MemoryHost::new(8, 8);
    let frame = host.add_group(None, "[frame01]").unwrap();
    let ink = host.add_layer(Some(frame), "ink01").unwrap();
    host.set_active_item(ink).unwrap();

    set_frame_enabled(&mut host, true).unwrap();
    assert_eq!(host.name(frame).unwrap(), "frame01");
}

#[test]
fn test_add_frame_needs_active_item() {
    let mut strip = Strip::new(2, &["ink"]);
    assert!(matches!(
        add_frame(&mut strip.host, &NavigationSettings::default()),
        Err(OnionError::NoActiveItem)
    ));
}

#[test]
fn test_disable_removes_frame_from_navigation() {
    let mut strip = Strip::new(3, &["ink"]);
    strip.activate(1);
    set_frame_enabled(&mut strip.host, false).unwrap();
    assert_eq!(strip.names(), vec!["frame03", "[frame02]", "frame01"]);

    context_step(&mut strip.host, 1, false);
    assert_eq!(strip.focal(), vec![2]);

    strip.activate(1);
    set_frame_enabled(&mut strip.host, true).unwrap();
    assert_eq!(strip.names(), vec!["frame03", "frame02", "frame01"]);
}

#[test]
fn test_convert_bare_layers_wraps_and_renumbers() {
    let mut host = MemoryHost::new(8, 8);
    let group = host.add_group(None, "frame01").unwrap();
    host.add_layer(Some(group), "ink01").unwrap();
    let cel = host.add_layer(None, "cel").unwrap();
    host.set_opacity(cel, 25.0).unwrap();

    let converted = convert_bare_layers(&mut host).unwrap();
    assert_eq!(converted, 1);

    let top = host.top_level_items().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(host.name(top[0]).unwrap(), "frame02");
    assert_eq!(host.name(top[1]).unwrap(), "cel1");
    assert_eq!(host.children(top[1]).unwrap(), Some(vec![cel]));
    // Frame state moves to the wrapper.
    assert_eq!(host.opacity(top[1]).unwrap(), 25.0);
    assert_eq!(host.opacity(cel).unwrap(), 100.0);
    assert_eq!(host.change_group_depth(), 0);

    assert_eq!(convert_bare_layers(&mut host).unwrap(), 0);
}

#[test]
fn test_copy_layer_fills_missing_frames() {
    let mut strip = Strip::new(3, &["ink", "paint"]);
    let paper = strip.host.add_layer(Some(strip.frames[0]), "paper03").unwrap();
    strip.host.reorder_item(paper, Some(strip.frames[0]), 1).unwrap();
    strip.host.set_opacity(paper, 60.0).unwrap();
    strip.host.set_active_item(paper).unwrap();

    let copies = copy_layer_to_all_frames(&mut strip.host).unwrap();
    assert_eq!(copies, 2);
    assert_eq!(
        children_names(&strip.host, strip.frames[1]),
        vec!["ink02", "paper02", "paint02"]
    );
    assert_eq!(
        children_names(&strip.host, strip.frames[2]),
        vec!["ink01", "paper01", "paint01"]
    );
    let copy = strip.host.find_item_by_name("paper01").unwrap().unwrap();
    assert_eq!(strip.host.opacity(copy).unwrap(), 60.0);
}

#[test]
fn test_copy_layer_syncs_existing_layers() {
    let mut strip = Strip::new(2, &["ink"]);
    let ink = strip.activate(0);
    strip.host.set_visible(ink, false).unwrap();
    strip.host.set_opacity(ink, 30.0).unwrap();

    assert_eq!(copy_layer_to_all_frames(&mut strip.host).unwrap(), 0);
    let other = strip.child(1, 0);
    assert!(!strip.host.visible(other).unwrap());
    assert_eq!(strip.host.opacity(other).unwrap(), 30.0);
}

#[test]
fn test_show_all_is_idempotent() {
    let mut strip = Strip::new(4, &["ink"]);
    context_step(&mut strip.host, 1, true);
    let palette = TintPalette::default();

    show_all(&mut strip.host, &palette).unwrap();
    let first = strip.host.to_document();
    assert!(strip.states().iter().all(|s| *s == (true, 100.0)));
    assert!(!strip
        .host
        .all_names()
        .iter()
        .any(|n| palette.is_tint_name(n)));

    show_all(&mut strip.host, &palette).unwrap();
    let second = strip.host.to_document();
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn test_show_all_clears_tints_under_disabled_frames() {
    let mut strip = Strip::new(3, &["ink"]);
    context_step(&mut strip.host, 1, true);
    strip.host.set_name(strip.frames[0], "[frame03]").unwrap();

    show_all(&mut strip.host, &TintPalette::default()).unwrap();
    assert!(strip.host.find_item_by_name("onion-tint-after").unwrap().is_none());
}
