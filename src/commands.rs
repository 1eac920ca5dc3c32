//! Command surface
//!
//! One variant per user-facing command, and the service that runs each of
//! them against a host while holding the invocation lock.

use crate::concurrency::{with_lock, InvocationLock};
use crate::error::OnionError;
use crate::frame::TintPalette;
use crate::host::Host;
use crate::lifecycle;
use crate::navigation::{default_cycle, navigate, ContextWindow, NavigationRequest, NavigationSettings};
use tracing::debug;

/// Commands exposed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    UpContext,
    DownContext,
    UpAuto,
    DownAuto,
    UpAutoTint,
    DownAutoTint,
    CycleContext,
    CycleContextTint,
    QueryContext,
    ShowAll,
    CopyLayer,
    AddFrame,
    EnableFrame,
    DisableFrame,
    ConvertLayers,
}

impl Command {
    pub const ALL: [Command; 17] = [
        Command::Up,
        Command::Down,
        Command::UpContext,
        Command::DownContext,
        Command::UpAuto,
        Command::DownAuto,
        Command::UpAutoTint,
        Command::DownAutoTint,
        Command::CycleContext,
        Command::CycleContextTint,
        Command::QueryContext,
        Command::ShowAll,
        Command::CopyLayer,
        Command::AddFrame,
        Command::EnableFrame,
        Command::DisableFrame,
        Command::ConvertLayers,
    ];

    /// Human-readable label, as shown in a host menu.
    pub fn label(self) -> &'static str {
        match self {
            Command::Up => "Up",
            Command::Down => "Down",
            Command::UpContext => "Up with context",
            Command::DownContext => "Down with context",
            Command::UpAuto => "Up (auto context)",
            Command::DownAuto => "Down (auto context)",
            Command::UpAutoTint => "Up (auto context, tint)",
            Command::DownAutoTint => "Down (auto context, tint)",
            Command::CycleContext => "Cycle context",
            Command::CycleContextTint => "Cycle context with tint",
            Command::QueryContext => "Query context",
            Command::ShowAll => "Show all frames",
            Command::CopyLayer => "Copy layer to all frames",
            Command::AddFrame => "Add frame",
            Command::EnableFrame => "Enable frame",
            Command::DisableFrame => "Disable frame",
            Command::ConvertLayers => "Convert layers to frames",
        }
    }

    /// False only for commands that never write to the image.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Command::QueryContext)
    }
}

/// Runtime settings for [`OnionService`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub navigation: NavigationSettings,
    /// Neighbour opacity used by fixed-context commands and the cycle list.
    pub neighbor_opacity: f64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            navigation: NavigationSettings::default(),
            neighbor_opacity: 25.0,
        }
    }
}

impl ServiceSettings {
    pub fn palette(&self) -> &TintPalette {
        &self.navigation.palette
    }
}

/// Runs commands against a host, one at a time per lock.
pub struct OnionService<L: InvocationLock> {
    lock: L,
    settings: ServiceSettings,
}

impl<L: InvocationLock> OnionService<L> {
    pub fn new(lock: L, settings: ServiceSettings) -> Self {
        Self { lock, settings }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn lock(&self) -> &L {
        &self.lock
    }

    /// Run `command` under the invocation lock. Navigation commands return the
    /// context window that was used; other commands return `None`.
    pub fn run<H: Host + ?Sized>(
        &self,
        host: &mut H,
        command: Command,
    ) -> Result<Option<ContextWindow>, OnionError> {
        debug!(command = ?command, "Running command");
        with_lock(&self.lock, || self.run_unlocked(host, command))
    }

    /// Run `command` without taking the lock. The caller must already hold
    /// it, e.g. to cover loading and saving the image as well.
    pub fn run_unlocked<H: Host + ?Sized>(
        &self,
        host: &mut H,
        command: Command,
    ) -> Result<Option<ContextWindow>, OnionError> {
        let nav = &self.settings.navigation;
        let context = ContextWindow::symmetric(self.settings.neighbor_opacity);
        match command {
            Command::Up => self.step(host, -1, Some(ContextWindow::focus_only()), false),
            Command::Down => self.step(host, 1, Some(ContextWindow::focus_only()), false),
            Command::UpContext => self.step(host, -1, Some(context), false),
            Command::DownContext => self.step(host, 1, Some(context), false),
            Command::UpAuto => self.step(host, -1, None, false),
            Command::DownAuto => self.step(host, 1, None, false),
            Command::UpAutoTint => self.step(host, -1, None, true),
            Command::DownAutoTint => self.step(host, 1, None, true),
            Command::CycleContext => self.cycle_context(host, false),
            Command::CycleContextTint => self.cycle_context(host, true),
            Command::QueryContext => navigate(host, &NavigationRequest::query(), nav),
            Command::ShowAll => lifecycle::show_all(host, &nav.palette).map(|_| None),
            Command::CopyLayer => lifecycle::copy_layer_to_all_frames(host).map(|_| None),
            Command::AddFrame => lifecycle::add_frame(host, nav).map(|_| None),
            Command::EnableFrame => lifecycle::set_frame_enabled(host, true).map(|_| None),
            Command::DisableFrame => lifecycle::set_frame_enabled(host, false).map(|_| None),
            Command::ConvertLayers => lifecycle::convert_bare_layers(host).map(|_| None),
        }
    }

    fn step<H: Host + ?Sized>(
        &self,
        host: &mut H,
        increment: isize,
        context: Option<ContextWindow>,
        tinting: bool,
    ) -> Result<Option<ContextWindow>, OnionError> {
        let request = NavigationRequest::step(increment, context).with_tinting(tinting);
        navigate(host, &request, &self.settings.navigation)
    }

    /// Advance the on-screen context to the next entry of the cycle list. A
    /// window not in the list restarts the cycle at its first entry.
    fn cycle_context<H: Host + ?Sized>(
        &self,
        host: &mut H,
        tinting: bool,
    ) -> Result<Option<ContextWindow>, OnionError> {
        let nav = &self.settings.navigation;
        let Some(current) = navigate(host, &NavigationRequest::query(), nav)? else {
            return Ok(None);
        };

        let cycle = default_cycle(self.settings.neighbor_opacity);
        let next = match cycle.iter().position(|w| *w == current) {
            Some(index) => (index + 1) % cycle.len(),
            None => 0,
        };
        debug!(from = %current, to = %cycle[next], "Cycling context");
        self.step(host, 0, Some(cycle[next].clone()), tinting)
    }
}
