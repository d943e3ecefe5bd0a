//! Priority conversion between the internal scale and iCalendar's
//!
//! Internally, priorities go from 0 (unset) to 5 ("do now").
//! RFC5545 uses 0 (undefined) then 1 (highest) to 9 (lowest).
//!
//! Both mappings are lossy and are not inverses of each other, e.g. internal 1 encodes to 9 but 9 decodes to 1.
//! Calendar clients have been seeing these exact values for a long time, do not "fix" them.

/// iCal priority for each internal priority, indexed by the internal value
const TO_ICAL: [u8; 6] = [0, 9, 5, 3, 2, 1];

/// Internal priority for each iCal priority, indexed by the iCal value
const FROM_ICAL: [u8; 10] = [0, 5, 4, 3, 3, 2, 1, 1, 1, 1];

/// Map an internal priority (0-5) to an iCal `PRIORITY` value.
/// Anything out of range maps to 0, which the encoder does not emit.
pub fn to_ical(priority: u8) -> u8 {
    TO_ICAL.get(priority as usize).copied().unwrap_or(0)
}

/// Map an iCal `PRIORITY` value (0-9) to an internal priority.
/// Anything out of range maps to 0 (unset).
pub fn from_ical(priority: i64) -> u8 {
    if priority < 0 {
        return 0;
    }
    FROM_ICAL.get(priority as usize).copied().unwrap_or(0)
}

/// Parse and map a raw `PRIORITY` property value
pub fn parse(value: &str) -> u8 {
    match value.trim().parse::<i64>() {
        Ok(p) => from_ical(p),
        Err(err) => {
            log::warn!("Invalid PRIORITY value {:?}: {}. Leaving priority unset", value, err);
            0
        }
    }
}
