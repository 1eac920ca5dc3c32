//! CLI domain: parse, route, output, and presentation only.
//! No engine logic; a single route table dispatches to the command service.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_command_result, format_config_toml, format_context, format_frames_json,
    format_frames_text, format_renumber_result,
};
pub use route::RunContext;
