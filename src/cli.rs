use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "rchat", about = "Terminal chat demo with a simulated AI assistant")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in if needed, then start the chat shell
    Run,
    /// Sign in with a phone number and one-time code
    Login,
    /// Sign out and clear chat history
    Logout,
    /// Print saved chatrooms
    Rooms,
    /// Change the color theme
    Theme {
        #[arg(value_enum)]
        mode: ThemeMode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    Toggle,
    Dark,
    Light,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
