//! Calendar-level options for the encoder

use serde::{Deserialize, Serialize};

use crate::settings::{DEFAULT_CALENDAR_NAME, ORG_NAME, PRODUCT_NAME};

/// What the `VCALENDAR` envelope says about itself.
///
/// A `Config` is never mutated by the codec; build one per encode call (or share one, it is read-only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The calendar display name (`X-WR-CALNAME`)
    pub name: String,
    /// The product identifier. It is wrapped as `-//<prod_id>//EN` in the `PRODID` line
    pub prod_id: String,
    /// An optional calendar color, as a hex string (with or without the leading `#`)
    pub color: Option<String>,
}

impl Config {
    pub fn new(name: String, prod_id: String) -> Self {
        Self { name, prod_id, color: None }
    }

    pub fn with_color(mut self, color: String) -> Self {
        self.color = Some(color);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_CALENDAR_NAME.to_string(), default_prod_id())
    }
}

/// The inner part of the default PRODID, e.g. `My organization//TodoIcal`
pub fn default_prod_id() -> String {
    format!("{}//{}", ORG_NAME, PRODUCT_NAME)
}
