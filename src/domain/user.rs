use serde::{Deserialize, Serialize};

use super::ids::new_id;

/// The signed-in account. At most one is live at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub phone: String,
    /// International dialling prefix, e.g. `+44`.
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    pub fn new(phone: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            phone: phone.into(),
            country_code: country_code.into(),
            name: None,
        }
    }

    pub fn full_phone(&self) -> String {
        format!("{}{}", self.country_code, self.phone)
    }
}
