//! UI layer: line-oriented rendering and input for the chat shell.

mod event_source;
pub mod shell;
mod styles;
mod terminal;
mod view;

pub(crate) use event_source::LineEventSource;
pub(crate) use styles::GlobalDarkMode;
pub(crate) use terminal::TerminalOutput;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
