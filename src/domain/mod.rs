//! Domain layer: core entities and business rules.

pub mod chat;
pub mod chat_state;
pub mod country;
pub mod events;
pub mod format;
pub mod ids;
pub mod message;
pub mod session;
pub mod shell_state;
pub mod timestamp;
pub mod user;
pub mod validation;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
