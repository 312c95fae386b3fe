use std::io;

use crate::{
    domain::{country::Country, user::User, validation},
    usecases::{
        auth_store::AuthStore,
        otp::{OtpError, OtpGateway},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub country_attempts: usize,
    pub phone_attempts: usize,
    pub code_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            country_attempts: 3,
            phone_attempts: 3,
            code_attempts: 3,
        }
    }
}

pub trait AuthTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct StdTerminal;

impl AuthTerminal for StdTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        use std::io::Write;

        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match rpassword::prompt_password(prompt) {
            Ok(secret) => Ok(Some(secret.trim().to_owned())),
            Err(source) if source.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidedAuthOutcome {
    Authenticated(User),
    ExitWithGuidance,
}

/// Country → phone → code, then signs the user in.
pub fn run_guided_auth(
    terminal: &mut dyn AuthTerminal,
    gateway: &dyn OtpGateway,
    countries: &[Country],
    auth: &AuthStore,
    retry_policy: &RetryPolicy,
) -> io::Result<GuidedAuthOutcome> {
    terminal.print_line("Welcome to rchat. Sign in with your phone number.")?;

    let Some(country) = collect_country(terminal, countries, retry_policy.country_attempts)? else {
        return Ok(GuidedAuthOutcome::ExitWithGuidance);
    };

    let Some(phone) = collect_phone(terminal, gateway, auth, country, retry_policy.phone_attempts)?
    else {
        return Ok(GuidedAuthOutcome::ExitWithGuidance);
    };

    if !collect_code(terminal, gateway, auth, retry_policy.code_attempts)? {
        return Ok(GuidedAuthOutcome::ExitWithGuidance);
    }

    let user = User::new(phone, country.dial_code.clone());
    auth.login(user.clone());
    terminal.print_line("Login successful!")?;

    Ok(GuidedAuthOutcome::Authenticated(user))
}

fn collect_country<'a>(
    terminal: &mut dyn AuthTerminal,
    countries: &'a [Country],
    attempts: usize,
) -> io::Result<Option<&'a Country>> {
    if countries.is_empty() {
        terminal.print_line("No countries are available. Check the auth.countries_file setting.")?;
        return Ok(None);
    }

    terminal.print_line("Step 1/3: Choose your country.")?;
    for (index, country) in countries.iter().enumerate() {
        terminal.print_line(&format!(
            "  {:>3}. {} {} ({})",
            index + 1,
            country.flag,
            country.name,
            country.dial_code
        ))?;
    }

    for attempt in 1..=attempts {
        let Some(answer) = terminal.prompt_line("Country number or code [1]: ")? else {
            terminal.print_line("Input cancelled (EOF). Run `rchat login` to retry.")?;
            return Ok(None);
        };

        if let Some(country) = pick_country(countries, &answer) {
            return Ok(Some(country));
        }

        terminal.print_line(&format!(
            "Please select a country. Attempts left: {}",
            attempts.saturating_sub(attempt)
        ))?;
    }

    terminal.print_line("Country step failed too many times. Run `rchat login` to retry.")?;
    Ok(None)
}

fn pick_country<'a>(countries: &'a [Country], answer: &str) -> Option<&'a Country> {
    let answer = answer.trim();
    if answer.is_empty() {
        return countries.first();
    }

    if let Ok(number) = answer.parse::<usize>() {
        return number.checked_sub(1).and_then(|index| countries.get(index));
    }

    countries
        .iter()
        .find(|country| country.code.eq_ignore_ascii_case(answer))
}

fn collect_phone(
    terminal: &mut dyn AuthTerminal,
    gateway: &dyn OtpGateway,
    auth: &AuthStore,
    country: &Country,
    attempts: usize,
) -> io::Result<Option<String>> {
    for attempt in 1..=attempts {
        terminal.print_line(&format!(
            "Step 2/3: Enter your phone number without the {} prefix.",
            country.dial_code
        ))?;
        let Some(phone) = terminal.prompt_line("Phone: ")? else {
            terminal.print_line("Input cancelled (EOF). Run `rchat login` to retry.")?;
            return Ok(None);
        };

        if let Err(error) = validation::validate_phone(&country.dial_code, &phone) {
            report_retry(terminal, &error.to_string(), attempt, attempts)?;
            continue;
        }

        terminal.print_line("Sending code...")?;
        auth.set_loading(true);
        let sent = gateway.send_code(&phone, &country.dial_code);
        auth.set_loading(false);

        match sent {
            Ok(()) => {
                terminal.print_line(&format!(
                    "Code sent to {}{}. Any 6-digit code works in this demo.",
                    country.dial_code, phone
                ))?;
                return Ok(Some(phone));
            }
            Err(error) => report_retry(terminal, &error.to_string(), attempt, attempts)?,
        }
    }

    terminal.print_line("Phone step failed too many times. Run `rchat login` to retry.")?;
    Ok(None)
}

fn collect_code(
    terminal: &mut dyn AuthTerminal,
    gateway: &dyn OtpGateway,
    auth: &AuthStore,
    attempts: usize,
) -> io::Result<bool> {
    for attempt in 1..=attempts {
        terminal.print_line("Step 3/3: Enter the 6-digit code.")?;
        let Some(code) = terminal.prompt_secret("Code: ")? else {
            terminal.print_line("Input cancelled (EOF). Run `rchat login` to retry.")?;
            return Ok(false);
        };

        if let Err(error) = validation::validate_otp(&code) {
            report_retry(terminal, &error.to_string(), attempt, attempts)?;
            continue;
        }

        auth.set_loading(true);
        let verified = gateway.verify_code(&code);
        auth.set_loading(false);

        match verified {
            Ok(()) => return Ok(true),
            Err(OtpError::Invalid(_)) => {
                report_retry(terminal, "Invalid OTP, please try again", attempt, attempts)?;
            }
        }
    }

    terminal.print_line("Code step failed too many times. Run `rchat login` to retry.")?;
    Ok(false)
}

fn report_retry(
    terminal: &mut dyn AuthTerminal,
    reason: &str,
    attempt: usize,
    max_attempts: usize,
) -> io::Result<()> {
    terminal.print_line(&format!(
        "{reason}. Attempts left: {}",
        max_attempts.saturating_sub(attempt)
    ))
}
