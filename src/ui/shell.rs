use anyhow::Result;

use crate::usecases::{
    chat_store::ChatStore,
    context::AppContext,
    contracts::{AppEventSource, ShellOrchestrator, ShellOutput},
};

use super::{
    styles::{self, GlobalDarkMode},
    view,
};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    output: &mut dyn ShellOutput,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        state_dir = %context.layout.state_dir.display(),
        "starting chat shell"
    );

    run_loop(&context.chat, event_source, orchestrator, output)?;

    tracing::info!("chat shell stopped");
    Ok(())
}

fn run_loop(
    chat: &ChatStore,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    output: &mut dyn ShellOutput,
) -> Result<()> {
    while orchestrator.state().is_running() {
        if orchestrator.state().needs_redraw() {
            draw(chat, orchestrator, output)?;
        }

        if let Some(event) = event_source.next_event()? {
            orchestrator.handle_event(event)?;
        }
    }

    // Notices raised by the final command, such as logout guidance.
    for notice in orchestrator.state().notices() {
        output.print_line(notice)?;
    }

    Ok(())
}

fn draw(
    chat: &ChatStore,
    orchestrator: &mut dyn ShellOrchestrator,
    output: &mut dyn ShellOutput,
) -> Result<()> {
    let lines = chat.read(|state| view::render(orchestrator.state(), state));
    let dark = GlobalDarkMode::is_dark();

    output.begin_frame()?;
    for line in &lines {
        output.print_line(&styles::paint(line, dark))?;
    }

    orchestrator.state_mut().mark_drawn();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::events::{AppEvent, ShellCommand},
        infra::{persistence::Slot, stubs::RecordingClipboard},
        test_support::memory_stores,
        ui::{event_source::MockEventSource, terminal::RecordingOutput},
        usecases::shell::DefaultShellOrchestrator,
    };

    fn command(line: &str) -> AppEvent {
        AppEvent::Command(ShellCommand::parse(line).expect("line must parse"))
    }

    #[tokio::test]
    async fn draws_once_then_stops_on_quit() {
        let stores = memory_stores();
        let mut source = MockEventSource::from(vec![AppEvent::QuitRequested]);
        let mut orchestrator = DefaultShellOrchestrator::new(
            &stores.chat,
            &stores.auth,
            &stores.theme,
            RecordingClipboard::default(),
        );
        let mut output = RecordingOutput::default();

        run_loop(&stores.chat, &mut source, &mut orchestrator, &mut output)
            .expect("loop must finish");

        assert_eq!(output.frames, 1);
        assert!(output.lines[0].contains("Chatrooms (0)"));
        assert!(!orchestrator.state().is_running());
    }

    #[tokio::test]
    async fn ticks_without_changes_do_not_redraw() {
        let stores = memory_stores();
        let mut source = MockEventSource::from(vec![AppEvent::Tick, AppEvent::Tick]);
        let mut orchestrator = DefaultShellOrchestrator::new(
            &stores.chat,
            &stores.auth,
            &stores.theme,
            RecordingClipboard::default(),
        );
        let mut output = RecordingOutput::default();

        run_loop(&stores.chat, &mut source, &mut orchestrator, &mut output)
            .expect("loop must finish");

        assert_eq!(output.frames, 1);
    }

    #[tokio::test]
    async fn commands_redraw_and_persist_state() {
        let stores = memory_stores();
        let mut source = MockEventSource::from(vec![command("/new Trip plans")]);
        let mut orchestrator = DefaultShellOrchestrator::new(
            &stores.chat,
            &stores.auth,
            &stores.theme,
            RecordingClipboard::default(),
        );
        let mut output = RecordingOutput::default();

        run_loop(&stores.chat, &mut source, &mut orchestrator, &mut output)
            .expect("loop must finish");
        stores.writer.flush();

        assert_eq!(output.frames, 2);
        assert!(output.lines.iter().any(|line| line.contains("Trip plans")));
        let saved = stores
            .storage
            .get(Slot::Chat.key())
            .expect("chat slot must be written");
        assert!(saved.contains("Trip plans"));
    }

    #[tokio::test]
    async fn final_notices_are_printed_after_logout() {
        let stores = memory_stores();
        let mut source = MockEventSource::from(vec![command("/logout")]);
        let mut orchestrator = DefaultShellOrchestrator::new(
            &stores.chat,
            &stores.auth,
            &stores.theme,
            RecordingClipboard::default(),
        );
        let mut output = RecordingOutput::default();

        run_loop(&stores.chat, &mut source, &mut orchestrator, &mut output)
            .expect("loop must finish");

        let last = output.lines.last().expect("output must not be empty");
        assert!(last.contains("rchat login"));
    }
}
