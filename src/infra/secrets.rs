use std::panic;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 4] = ["otp", "code", "phone", "token"];

/// Scrubs anything resembling a verification code or phone number.
pub fn redact_text(input: &str) -> String {
    input
        .split_whitespace()
        .map(redact_chunk)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps the last two digits of a phone number: `5551234567` → `********67`.
pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    let visible = digits.len().min(2);
    let hidden = digits.len() - visible;

    std::iter::repeat('*')
        .take(hidden)
        .chain(digits[hidden..].iter().copied())
        .collect()
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "rchat panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            );
        } else {
            eprintln!("rchat panic: {}", scrubbed);
        }
    }));
}

fn redact_chunk(chunk: &str) -> String {
    let lowered = chunk.to_ascii_lowercase();
    let marked = lowered.contains('=')
        && SENSITIVE_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker));

    if marked || looks_like_digits(chunk) {
        REDACTED.to_owned()
    } else {
        chunk.to_owned()
    }
}

fn looks_like_digits(value: &str) -> bool {
    let cleaned = value.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());
    cleaned.len() >= 6 && cleaned.chars().all(|ch| ch.is_ascii_digit())
}
