//! User settings for Walletbook
//!
//! Settings travel inside the persisted aggregate, so every field has a serde
//! default and older snapshots keep loading as fields are added.

use serde::{Deserialize, Serialize};

use crate::models::Currency;

/// User settings and profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Display name of the profile owner
    #[serde(default)]
    pub profile_name: String,

    /// Currency shown first on the dashboard
    #[serde(default)]
    pub base_currency: Currency,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Number of days in the default period-totals window
    #[serde(default = "default_trailing_days")]
    pub trailing_days: u32,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_trailing_days() -> u32 {
    7
}

fn default_first_day_of_week() -> u8 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            profile_name: String::new(),
            base_currency: Currency::default(),
            date_format: default_date_format(),
            trailing_days: default_trailing_days(),
            first_day_of_week: default_first_day_of_week(),
        }
    }
}
