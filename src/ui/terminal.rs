use std::io::{self, IsTerminal, Stdout, Write};

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::usecases::contracts::ShellOutput;

/// Writes frames to stdout, clearing the screen first when attached to a terminal.
pub struct TerminalOutput {
    stdout: Stdout,
    clear_frames: bool,
}

impl TerminalOutput {
    pub fn new() -> Self {
        let stdout = io::stdout();
        let clear_frames = stdout.is_terminal();

        Self {
            stdout,
            clear_frames,
        }
    }
}

impl ShellOutput for TerminalOutput {
    fn begin_frame(&mut self) -> Result<()> {
        if self.clear_frames {
            execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.stdout, "{line}")?;
        self.stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub frames: usize,
    pub lines: Vec<String>,
}

#[cfg(test)]
impl ShellOutput for RecordingOutput {
    fn begin_frame(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_owned());
        Ok(())
    }
}
