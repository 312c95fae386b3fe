use serde::{Deserialize, Serialize};

/// A selectable country for phone sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    pub dial_code: String,
    pub flag: String,
}

impl Country {
    fn new(name: &str, code: &str, dial_code: &str, flag: &str) -> Self {
        Self {
            name: name.to_owned(),
            code: code.to_owned(),
            dial_code: dial_code.to_owned(),
            flag: flag.to_owned(),
        }
    }
}

/// Static list used when the country directory is unavailable.
pub fn fallback_countries() -> Vec<Country> {
    vec![
        Country::new("United States", "US", "+1", "🇺🇸"),
        Country::new("United Kingdom", "GB", "+44", "🇬🇧"),
        Country::new("India", "IN", "+91", "🇮🇳"),
        Country::new("Canada", "CA", "+1", "🇨🇦"),
        Country::new("Australia", "AU", "+61", "🇦🇺"),
    ]
}
