use anyhow::Result;

use crate::domain::{events::AppEvent, shell_state::ShellState};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Line sink the shell writes its views to.
pub trait ShellOutput {
    /// Called before each redraw.
    fn begin_frame(&mut self) -> Result<()> {
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> Result<()>;
}

/// Runs after the session has been cleared by `AuthStore::logout`.
pub trait LogoutHook: Send + Sync {
    fn on_logout(&self);
}

/// Process-wide presentation state driven by the theme store.
pub trait PresentationSink: Send + Sync {
    fn apply_dark_mode(&self, dark: bool);
}
