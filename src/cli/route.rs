//! CLI route: single route table and run context. Dispatches to the engine and presentation.

use crate::commands::{Command, OnionService};
use crate::concurrency::{with_lock, FileLock};
use crate::config::{ConfigLoader, OnionConfig};
use crate::error::OnionError;
use crate::frame::{enumerate_frames, is_disabled_name};
use crate::host::{Host, MemoryHost};
use crate::navigation::{locate_current, navigate, ContextWindow, NavigationRequest};
use crate::renumber::renumber;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_command_result, format_config_toml, format_context, format_frames_json,
    format_frames_text, format_renumber_result,
};

impl Commands {
    /// Engine command behind this subcommand, if it maps onto one directly.
    pub fn engine_command(&self) -> Option<Command> {
        let command = match self {
            Commands::Up => Command::Up,
            Commands::Down => Command::Down,
            Commands::UpContext => Command::UpContext,
            Commands::DownContext => Command::DownContext,
            Commands::UpAuto => Command::UpAuto,
            Commands::DownAuto => Command::DownAuto,
            Commands::UpAutoTint => Command::UpAutoTint,
            Commands::DownAutoTint => Command::DownAutoTint,
            Commands::CycleContext => Command::CycleContext,
            Commands::CycleContextTint => Command::CycleContextTint,
            Commands::ShowAll => Command::ShowAll,
            Commands::CopyLayer => Command::CopyLayer,
            Commands::AddFrame => Command::AddFrame,
            Commands::EnableFrame => Command::EnableFrame,
            Commands::DisableFrame => Command::DisableFrame,
            Commands::ConvertLayers => Command::ConvertLayers,
            Commands::Context => Command::QueryContext,
            Commands::Renumber
            | Commands::Navigate { .. }
            | Commands::Frames { .. }
            | Commands::Config => return None,
        };
        Some(command)
    }
}

/// Runtime context for CLI execution: loaded config and the image document path.
pub struct RunContext {
    config: OnionConfig,
    image: Option<PathBuf>,
}

impl RunContext {
    /// Load configuration (explicit file or global file, then environment).
    pub fn new(image: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, OnionError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self::with_config(image, config))
    }

    pub fn with_config(image: Option<PathBuf>, config: OnionConfig) -> Self {
        Self { config, image }
    }

    pub fn config(&self) -> &OnionConfig {
        &self.config
    }

    fn image_path(&self) -> Result<&Path, OnionError> {
        self.image
            .as_deref()
            .ok_or_else(|| OnionError::Document("No image given (use --image)".to_string()))
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, OnionError> {
        debug!(command = ?command, "Executing CLI command");
        match command {
            Commands::Config => format_config_toml(&self.config),
            Commands::Frames { format } => self.list_frames(format),
            Commands::Renumber => {
                let renamed = self.with_image(true, |host| renumber(host))?;
                Ok(format_renumber_result(renamed))
            }
            Commands::Navigate {
                increment,
                context,
                tint,
                dry_run,
            } => self.navigate(*increment, context.as_deref(), *tint, *dry_run),
            other => match other.engine_command() {
                Some(engine) => self.run_engine(engine),
                None => Err(OnionError::Document(format!(
                    "No route for command {:?}",
                    other
                ))),
            },
        }
    }

    /// Load the image, run `body`, and write the image back when `save` is
    /// set, all under the invocation lock.
    fn with_image<T, F>(&self, save: bool, body: F) -> Result<T, OnionError>
    where
        F: FnOnce(&mut MemoryHost) -> Result<T, OnionError>,
    {
        let path = self.image_path()?;
        let lock: FileLock = self.config.file_lock()?;
        with_lock(&lock, || {
            let mut host = MemoryHost::load(path)?;
            let writes = host.writes();
            let result = body(&mut host)?;
            if save && host.writes() != writes {
                host.save(path)?;
                info!(image = %path.display(), "Saved image");
            }
            Ok(result)
        })
    }

    fn run_engine(&self, command: Command) -> Result<String, OnionError> {
        let service = OnionService::new(self.config.file_lock()?, self.config.settings());
        let path = self.image_path()?;
        let window = with_lock(service.lock(), || {
            let mut host = MemoryHost::load(path)?;
            let writes = host.writes();
            let window = service.run_unlocked(&mut host, command)?;
            if command.is_mutating() && host.writes() != writes {
                host.save(path)?;
                info!(image = %path.display(), "Saved image");
            }
            Ok(window)
        })?;

        Ok(match command {
            Command::QueryContext => format_context(window.as_ref()),
            _ => format_command_result(command, window.as_ref()),
        })
    }

    fn navigate(
        &self,
        increment: isize,
        context: Option<&str>,
        tinting: bool,
        dry_run: bool,
    ) -> Result<String, OnionError> {
        let context = context.map(str::parse::<ContextWindow>).transpose()?;
        let request = NavigationRequest {
            increment,
            context,
            tinting,
            dry_run,
        };
        let settings = self.config.settings();
        let window = self.with_image(!dry_run, |host| {
            navigate(host, &request, &settings.navigation)
        })?;
        Ok(format_context(window.as_ref()))
    }

    fn list_frames(&self, format: &str) -> Result<String, OnionError> {
        let path = self.image_path()?;
        let host = MemoryHost::load(path)?;
        let frames = enumerate_frames(&host)?;
        let focal = locate_current(&frames);

        match format {
            "json" => format_frames_json(&frames, focal),
            "text" => {
                let mut disabled = Vec::new();
                for item in host.top_level_items()? {
                    let name = host.name(item)?;
                    if is_disabled_name(&name) {
                        disabled.push(name);
                    }
                }
                Ok(format_frames_text(&frames, focal, &disabled))
            }
            other => Err(OnionError::Document(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}
