//! Errors returned by the decoder

use thiserror::Error;

/// A structural failure: the document cannot be turned into a task at all.
///
/// Field-level problems (a bad date, a weird duration...) are not errors, they are logged and the field is left unset.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// The iCal stream itself is malformed
    #[error("unable to parse iCal data: {0}")]
    Ical(String),
    /// No `VCALENDAR` was found in the input
    #[error("no calendar found in iCal data")]
    NoCalendar,
    /// The calendar has no `VTODO` component
    #[error("no VTODO component found in calendar")]
    NoTodo,
}
