//! Timestamps as iCal `DATE-TIME` and `DATE` values
//!
//! Timestamps are always written in UTC, without the `Z` designator.
//! When reading, clients send all sorts of variants, so this accepts:
//! * `20181201T011204Z` (UTC)
//! * `20181201T011204` (UTC, or local time in the zone given by a `TZID` parameter)
//! * `20181201` (midnight, same zone rules)

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use ical::parser::ical::component::IcalTimeZone;

use crate::settings::{DATE_FORMAT, DATE_TIME_FORMAT, DATE_TIME_UTC_FORMAT};

/// Format a timestamp the way the encoder writes every `DATE-TIME`
pub fn format_date_time(dt: &DateTime<Utc>) -> String {
    dt.format(DATE_TIME_FORMAT).to_string()
}

/// Find the zone a `TZID` parameter refers to.
///
/// Most clients use IANA names directly (sometimes with a leading `/`).
/// Otherwise, the `VTIMEZONE` that defines this TZID may tell the IANA name in its `X-LIC-LOCATION`.
pub fn resolve_tzid(tzid: &str, vtimezones: &[IcalTimeZone]) -> Option<Tz> {
    let tzid = tzid.trim().trim_matches('"');
    if let Ok(tz) = tzid.trim_start_matches('/').parse::<Tz>() {
        return Some(tz);
    }

    let location = vtimezones.iter()
        .find(|vtz| super::property_value(&vtz.properties, "TZID").map(str::trim) == Some(tzid))
        .and_then(|vtz| super::property_value(&vtz.properties, "X-LIC-LOCATION"));

    match location.map(|loc| loc.trim().parse::<Tz>()) {
        Some(Ok(tz)) => Some(tz),
        _ => {
            log::warn!("Unknown time zone {:?}, reading its times as UTC", tzid);
            None
        },
    }
}

/// Parse a `DATE-TIME` or `DATE` value.
///
/// `tz` is the resolved `TZID` parameter of the property, if any. It is ignored for values in UTC (`Z` suffix).
/// A malformed value is logged and returns `None`: a single bad timestamp is not worth rejecting a whole task.
pub fn parse_date_time(value: &str, tz: Option<Tz>) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = if value.ends_with('Z') || value.ends_with('z') {
        NaiveDateTime::parse_from_str(&value.to_uppercase(), DATE_TIME_UTC_FORMAT)
            .map(|naive| Some(Utc.from_utc_datetime(&naive)))
    } else if value.len() == 8 {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(|date| date.and_hms_opt(0, 0, 0).and_then(|naive| from_local(&naive, tz)))
    } else {
        NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
            .map(|naive| from_local(&naive, tz))
    };

    match parsed {
        Ok(Some(dt)) => Some(dt),
        Ok(None) => {
            log::warn!("Time {:?} does not exist in time zone {:?}, ignoring it", value, tz);
            None
        },
        Err(err) => {
            log::warn!("Error while parsing iCal time {:?}: {}", value, err);
            None
        },
    }
}

/// Interpret a floating time in the given zone (UTC when there is none)
fn from_local(naive: &NaiveDateTime, tz: Option<Tz>) -> Option<DateTime<Utc>> {
    match tz {
        None => Some(Utc.from_utc_datetime(naive)),
        Some(tz) => tz.from_local_datetime(naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}
