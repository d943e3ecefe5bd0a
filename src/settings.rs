//! Compiled-in constants used by the codec
//!
//! These are read-only on purpose: encoding and decoding can run concurrently without any synchronisation.

/// Part of the ProdID string that describes the organization (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
pub const ORG_NAME: &str = "My organization";

/// Part of the ProdID string that describes the product name (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
pub const PRODUCT_NAME: &str = "TodoIcal";

/// Display name used when a [`Config`](crate::config::Config) does not provide one
pub const DEFAULT_CALENDAR_NAME: &str = "Tasks";

/// How often clients should refresh a published calendar (`X-PUBLISHED-TTL`)
pub const PUBLISHED_TTL: &str = "PT4H";

/// `DATE-TIME` layout used on both sides of the codec, always in UTC
pub const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
/// `DATE-TIME` layout with the explicit UTC designator
pub const DATE_TIME_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
/// `DATE` layout (all-day values)
pub const DATE_FORMAT: &str = "%Y%m%d";
