use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::Duration,
};

use anyhow::Result;

use crate::{
    domain::events::{AppEvent, ShellCommand},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
const QUIT_COMMAND: &str = "/quit";

/// Reads input lines on a background thread so the shell keeps ticking while
/// the user is typing.
pub struct LineEventSource {
    lines: Receiver<io::Result<String>>,
}

impl LineEventSource {
    pub fn stdin() -> Self {
        Self::spawn(io::BufReader::new(io::stdin()))
    }

    pub fn spawn<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (sender, lines) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("rchat-input".to_owned())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if sender.send(line).is_err() || failed {
                        break;
                    }
                }
            });
        if let Err(error) = spawned {
            tracing::error!(error = %error, "failed to start input reader");
        }

        Self { lines }
    }
}

impl AppEventSource for LineEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        match self.lines.recv_timeout(EVENT_POLL_TIMEOUT) {
            Ok(Ok(line)) => {
                if line.trim() == QUIT_COMMAND {
                    return Ok(Some(AppEvent::QuitRequested));
                }
                Ok(ShellCommand::parse(&line).map(AppEvent::Command))
            }
            Ok(Err(error)) => Err(error.into()),
            Err(RecvTimeoutError::Timeout) => Ok(Some(AppEvent::Tick)),
            Err(RecvTimeoutError::Disconnected) => Ok(Some(AppEvent::QuitRequested)),
        }
    }
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(Some(
            self.queue.pop_front().unwrap_or(AppEvent::QuitRequested),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn next_input(source: &mut LineEventSource) -> Option<AppEvent> {
        loop {
            match source.next_event().expect("event should be read") {
                Some(AppEvent::Tick) => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn lines_become_commands_until_quit() {
        let mut source = LineEventSource::spawn(Cursor::new("hello\n/rooms\n/quit\n"));

        assert_eq!(
            next_input(&mut source),
            Some(AppEvent::Command(ShellCommand::Send("hello".to_owned())))
        );
        assert_eq!(
            next_input(&mut source),
            Some(AppEvent::Command(ShellCommand::ListRooms))
        );
        assert_eq!(next_input(&mut source), Some(AppEvent::QuitRequested));
    }

    #[test]
    fn blank_lines_produce_no_event() {
        let mut source = LineEventSource::spawn(Cursor::new("   \n"));

        assert_eq!(next_input(&mut source), None);
    }

    #[test]
    fn end_of_input_quits() {
        let mut source = LineEventSource::spawn(Cursor::new(""));

        assert_eq!(next_input(&mut source), Some(AppEvent::QuitRequested));
    }

    #[test]
    fn mock_source_quits_when_drained() {
        let mut source = MockEventSource::from(vec![AppEvent::Tick]);

        assert_eq!(
            source.next_event().expect("event should be read"),
            Some(AppEvent::Tick)
        );
        assert_eq!(
            source.next_event().expect("event should be read"),
            Some(AppEvent::QuitRequested)
        );
    }
}
