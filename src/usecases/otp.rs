use std::{thread, time::Duration};

use thiserror::Error;

use crate::{
    domain::validation::{self, ValidationError},
    infra::{config::AuthConfig, secrets::mask_phone},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// Delivery and verification of one-time sign-in codes.
pub trait OtpGateway {
    fn send_code(&self, phone: &str, country_code: &str) -> Result<(), OtpError>;
    fn verify_code(&self, otp: &str) -> Result<(), OtpError>;
}

/// Pretends to talk to an SMS backend: waits a little, then accepts any
/// well-formed six-digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedOtpGateway {
    send_delay: Duration,
    verify_delay: Duration,
}

impl SimulatedOtpGateway {
    pub fn new(send_delay: Duration, verify_delay: Duration) -> Self {
        Self {
            send_delay,
            verify_delay,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            Duration::from_millis(config.otp_send_delay_ms),
            Duration::from_millis(config.otp_verify_delay_ms),
        )
    }
}

impl OtpGateway for SimulatedOtpGateway {
    fn send_code(&self, phone: &str, country_code: &str) -> Result<(), OtpError> {
        validation::validate_phone(country_code, phone)?;
        thread::sleep(self.send_delay);

        tracing::info!(
            country_code,
            phone = %mask_phone(phone),
            "simulated code sent"
        );
        Ok(())
    }

    fn verify_code(&self, otp: &str) -> Result<(), OtpError> {
        thread::sleep(self.verify_delay);
        validation::validate_otp(otp)?;

        tracing::debug!("simulated code accepted");
        Ok(())
    }
}
