//! Input rules shared by the login flow, the shell and the chat store.

use thiserror::Error;

pub const MIN_PHONE_DIGITS: usize = 6;
pub const MAX_PHONE_DIGITS: usize = 15;
pub const OTP_LEN: usize = 6;
pub const MAX_TITLE_CHARS: usize = 50;
pub const MAX_MESSAGE_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a country")]
    MissingCountry,
    #[error("Phone number must be at least 6 digits")]
    PhoneTooShort,
    #[error("Phone number must be at most 15 digits")]
    PhoneTooLong,
    #[error("Phone number must contain only digits")]
    PhoneNotNumeric,
    #[error("OTP must be exactly 6 digits")]
    OtpLength,
    #[error("OTP must contain only digits")]
    OtpNotNumeric,
    #[error("Title is required")]
    TitleRequired,
    #[error("Title must be at most 50 characters")]
    TitleTooLong,
    #[error("Message cannot be empty")]
    MessageEmpty,
    #[error("Message must be at most 1000 characters")]
    MessageTooLong,
}

pub fn validate_phone(country_code: &str, phone: &str) -> Result<(), ValidationError> {
    if country_code.trim().is_empty() {
        return Err(ValidationError::MissingCountry);
    }

    let len = phone.chars().count();
    if len < MIN_PHONE_DIGITS {
        return Err(ValidationError::PhoneTooShort);
    }
    if len > MAX_PHONE_DIGITS {
        return Err(ValidationError::PhoneTooLong);
    }
    if !is_ascii_digits(phone) {
        return Err(ValidationError::PhoneNotNumeric);
    }

    Ok(())
}

pub fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.chars().count() != OTP_LEN {
        return Err(ValidationError::OtpLength);
    }
    if !is_ascii_digits(otp) {
        return Err(ValidationError::OtpNotNumeric);
    }

    Ok(())
}

/// Returns the trimmed title when it is acceptable.
pub fn validate_chatroom_title(title: &str) -> Result<&str, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong);
    }

    Ok(title)
}

/// Returns the trimmed message text when it is acceptable.
pub fn validate_message(content: &str) -> Result<&str, ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::MessageEmpty);
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooLong);
    }

    Ok(content)
}

fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}
