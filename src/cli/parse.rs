//! CLI parse: clap types for onion. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// onion - Onion-skin frame navigation for layered images
#[derive(Parser)]
#[command(name = "onion")]
#[command(about = "Onion-skin frame navigation for layered images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Image document (JSON) to operate on
    #[arg(long, global = true)]
    pub image: Option<PathBuf>,

    /// Configuration file path (replaces the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Show the frame above, alone
    Up,
    /// Show the frame below, alone
    Down,
    /// Show the frame above with both neighbours
    UpContext,
    /// Show the frame below with both neighbours
    DownContext,
    /// Show the frame above, keeping the current context
    UpAuto,
    /// Show the frame below, keeping the current context
    DownAuto,
    /// Show the frame above, keeping the current context, with tints
    UpAutoTint,
    /// Show the frame below, keeping the current context, with tints
    DownAutoTint,
    /// Switch to the next context in the cycle list
    CycleContext,
    /// Switch to the next context in the cycle list, with tints
    CycleContextTint,
    /// Show every frame at full opacity and remove tints
    ShowAll,
    /// Copy the active layer into every frame
    CopyLayer,
    /// Add an empty frame above the current one
    AddFrame,
    /// Enable the frame holding the active layer
    EnableFrame,
    /// Disable the frame holding the active layer
    DisableFrame,
    /// Wrap plain top-level layers into frame groups
    ConvertLayers,
    /// Renumber frames after their stacking order
    Renumber,
    /// Move by an arbitrary increment with an explicit or computed context
    Navigate {
        /// Frames to move; negative moves up
        #[arg(long, allow_hyphen_values = true, default_value = "0")]
        increment: isize,
        /// Context window, e.g. "25,100,25" or "-,100,25"
        #[arg(long)]
        context: Option<String>,
        /// Tint neighbouring frames
        #[arg(long)]
        tint: bool,
        /// Report the context without changing the image
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the context window currently shown
    Context,
    /// List frames and their state
    Frames {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
