use std::sync::Arc;

use anyhow::Result;

use crate::{
    cli::{Cli, Command, ThemeMode},
    domain::{self, format::format_date},
    infra::{self, clipboard::SystemClipboard, secrets::mask_phone},
    ui::{self, GlobalDarkMode, LineEventSource, TerminalOutput},
    usecases::{
        self, bootstrap,
        context::AppContext,
        countries::{load_countries, CountrySource, JsonFileCountrySource},
        guided_auth::{run_guided_auth, GuidedAuthOutcome, RetryPolicy, StdTerminal},
        logout::logout_and_reset,
        otp::SimulatedOtpGateway,
        shell::DefaultShellOrchestrator,
        startup::{plan_startup, StartupFlowState},
    },
};

const SHELL_START_FAILED: &str = "SHELL_START_FAILED";

pub fn run(cli: Cli) -> Result<()> {
    let (context, _log_guard) =
        bootstrap::bootstrap(cli.config.as_deref(), Arc::new(GlobalDarkMode))?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    let result = dispatch(&context, cli.command_or_default());
    context.flush();
    result
}

fn dispatch(context: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Run => match plan_startup(&context.auth) {
            StartupFlowState::LaunchShell => start_shell(context)?,
            StartupFlowState::GuidedAuth => {
                tracing::info!("no saved session, starting guided sign-in");
                if sign_in(context)? {
                    if let Err(error) = start_shell(context) {
                        report_post_auth_shell_failure(&error);
                    }
                }
            }
        },
        Command::Login => match plan_startup(&context.auth) {
            StartupFlowState::LaunchShell => {
                let phone = context
                    .auth
                    .user()
                    .map(|user| format!("{} {}", user.country_code, mask_phone(&user.phone)))
                    .unwrap_or_default();
                println!("Already signed in {phone}. Run `rchat logout` to switch accounts.");
            }
            StartupFlowState::GuidedAuth => {
                sign_in(context)?;
            }
        },
        Command::Logout => {
            let outcome = logout_and_reset(context);
            tracing::info!(
                was_authenticated = outcome.was_authenticated,
                "logout completed"
            );
            if outcome.was_authenticated {
                println!("Signed out. Chat history has been cleared.");
            } else {
                println!("Not signed in. Local chat state has been reset.");
            }
        }
        Command::Rooms => print_rooms(context),
        Command::Theme { mode } => {
            let dark = match mode {
                ThemeMode::Toggle => context.theme.toggle_theme(),
                ThemeMode::Dark => {
                    context.theme.set_theme(true);
                    true
                }
                ThemeMode::Light => {
                    context.theme.set_theme(false);
                    false
                }
            };
            println!("Theme: {}", if dark { "dark" } else { "light" });
        }
    }

    Ok(())
}

/// Runs the guided sign-in and reports whether a session now exists.
fn sign_in(context: &AppContext) -> Result<bool> {
    let source = context
        .config
        .auth
        .countries_file
        .as_ref()
        .map(JsonFileCountrySource::new);
    let countries = load_countries(source.as_ref().map(|source| source as &dyn CountrySource));
    let gateway = SimulatedOtpGateway::from_config(&context.config.auth);

    let mut terminal = StdTerminal;
    let outcome = run_guided_auth(
        &mut terminal,
        &gateway,
        &countries,
        &context.auth,
        &RetryPolicy::default(),
    )?;
    context.flush();

    Ok(matches!(outcome, GuidedAuthOutcome::Authenticated(_)))
}

fn start_shell(context: &AppContext) -> Result<()> {
    let mut source = LineEventSource::stdin();
    let mut orchestrator = DefaultShellOrchestrator::new(
        &context.chat,
        &context.auth,
        &context.theme,
        SystemClipboard,
    );
    let mut output = TerminalOutput::new();

    ui::shell::start(context, &mut source, &mut orchestrator, &mut output)
}

fn print_rooms(context: &AppContext) {
    let rooms = context.chat.chatrooms();
    if rooms.is_empty() {
        println!("No chatrooms yet.");
        return;
    }

    for line in room_lines(&rooms) {
        println!("{line}");
    }
}

fn room_lines(rooms: &[domain::chat::Chatroom]) -> Vec<String> {
    rooms
        .iter()
        .map(|room| {
            format!(
                "{}  {}  ({} messages, {})",
                room.id,
                room.title,
                room.message_count,
                format_date(room.created_at)
            )
        })
        .collect()
}

fn report_post_auth_shell_failure(error: &anyhow::Error) {
    tracing::error!(
        code = SHELL_START_FAILED,
        error = ?error,
        "chat shell failed to start after sign-in"
    );

    for line in post_auth_shell_fallback_lines(SHELL_START_FAILED) {
        eprintln!("{line}");
    }
}

fn post_auth_shell_fallback_lines(error_code: &str) -> [String; 3] {
    [
        "Signed in. Your session is saved.".to_owned(),
        format!("{error_code}: the chat shell failed to start in this run."),
        "Run `rchat` again to open the chat shell with the saved session.".to_owned(),
    ]
}
