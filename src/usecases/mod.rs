//! Use case layer: stores, flows and shell orchestration.

pub mod auth_store;
pub mod bootstrap;
pub mod chat_store;
pub mod context;
pub mod contracts;
pub mod countries;
pub mod guided_auth;
pub mod logout;
pub mod otp;
pub mod responder;
pub mod shell;
pub mod startup;
pub mod theme_store;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
