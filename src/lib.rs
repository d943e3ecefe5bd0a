//! This crate converts to-do tasks from and to iCalendar (RFC5545) documents, the way CalDAV clients exchange them.
//!
//! * Encoding: a list of [`Todo`]s (usually built from application [`Task`]s with `Todo::from(&task)`) and a [`Config`] become one `VCALENDAR`, see [`ical::build_calendar`].
//! * Decoding: a `VCALENDAR` with a `VTODO` becomes a [`Task`], see [`ical::parse`].
//!
//! Both directions are pure functions: no I/O, no shared state.
//! Decoding is lenient: clients send all sorts of slightly broken data, so a field that cannot be understood is logged (using the `log::*` macros) and left unset instead of failing the whole document.

pub mod config;
pub use config::Config;
pub mod error;
pub use error::ParseError;
pub mod task;
pub use task::Task;
pub mod todo;
pub use todo::Todo;

pub mod color;
pub mod priority;
pub mod recurrence;
pub mod settings;

pub mod ical;
