//! CLI presentation: text and json formatters.

use crate::commands::Command;
use crate::config::OnionConfig;
use crate::error::OnionError;
use crate::frame::Frame;
use crate::navigation::ContextWindow;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// One line summarising a finished command.
pub fn format_command_result(command: Command, window: Option<&ContextWindow>) -> String {
    match window {
        Some(window) => format!("{}: context {}", command.label(), window),
        None => format!("{}: done", command.label()),
    }
}

pub fn format_context(window: Option<&ContextWindow>) -> String {
    match window {
        Some(window) => window.to_string(),
        None => "No frames".to_string(),
    }
}

pub fn format_renumber_result(renamed: usize) -> String {
    match renamed {
        0 => "Frame numbers already in order".to_string(),
        1 => "Renamed 1 item".to_string(),
        n => format!("Renamed {} items", n),
    }
}

/// Frame table, top of the stack first. `focal` marks the current frame;
/// `disabled` lists the names of disabled frames.
pub fn format_frames_text(frames: &[Frame], focal: Option<usize>, disabled: &[String]) -> String {
    if frames.is_empty() && disabled.is_empty() {
        return "No frames".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Frame", "Kind", "Visible", "Opacity", ""]);
    for (i, frame) in frames.iter().enumerate() {
        let kind = if frame.is_group() {
            format!("group ({})", frame.children().len())
        } else {
            "layer".to_string()
        };
        let marker = if Some(i) == focal { "current" } else { "" };
        table.add_row(vec![
            (i + 1).to_string(),
            frame.observed.name.clone(),
            kind,
            if frame.observed.visible { "yes" } else { "no" }.to_string(),
            format!("{}", frame.observed.opacity),
            marker.to_string(),
        ]);
    }
    for name in disabled {
        table.add_row(vec![
            "-".to_string(),
            name.clone(),
            "disabled".to_string(),
            String::new(),
            String::new(),
            String::new(),
        ]);
    }

    let title = format!("Frames ({})", frames.len());
    format!("{}\n{}", title.bold().underline(), table)
}

pub fn format_frames_json(frames: &[Frame], focal: Option<usize>) -> Result<String, OnionError> {
    let rows: Vec<serde_json::Value> = frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            json!({
                "name": frame.observed.name,
                "group": frame.is_group(),
                "children": frame.children().len(),
                "visible": frame.observed.visible,
                "opacity": frame.observed.opacity,
                "current": Some(i) == focal,
            })
        })
        .collect();
    serde_json::to_string_pretty(&json!({ "frames": rows }))
        .map_err(|e| OnionError::Document(e.to_string()))
}

pub fn format_config_toml(config: &OnionConfig) -> Result<String, OnionError> {
    toml::to_string_pretty(config).map_err(|e| OnionError::ConfigError(e.to_string()))
}
