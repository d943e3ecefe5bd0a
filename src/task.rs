//! The application-side task record
//!
//! This is what the decoder hands back, and what callers usually have at hand (from their store) before they convert it into a [`Todo`](crate::todo::Todo) for encoding.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// How a repeating task computes its next occurrence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Repeat every `repeat_after` seconds
    Default,
    /// Repeat on the same day of every month, whatever `repeat_after` says
    Monthly,
    /// Never repeat
    None,
}

impl Default for RepeatMode {
    fn default() -> Self {
        RepeatMode::Default
    }
}

/// A label attached to a task. Labels only carry their title at this level, the caller matches them against its own store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub title: String,
}

impl Label {
    pub fn new(title: String) -> Self {
        Self { title }
    }
}

/// The date a relative reminder is anchored to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderRelation {
    DueDate,
    StartDate,
    EndDate,
}

/// A reminder, either at a fixed time or relative to one of the task dates
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskReminder {
    /// The absolute reminder time. For relative reminders, this is computed by the caller and may be left unset
    pub reminder: Option<DateTime<Utc>>,
    /// Offset in seconds from `relative_to` (negative means "before")
    pub relative_period: i64,
    /// Set for relative reminders only
    pub relative_to: Option<ReminderRelation>,
}

impl TaskReminder {
    pub fn absolute(at: DateTime<Utc>) -> Self {
        Self { reminder: Some(at), relative_period: 0, relative_to: None }
    }

    pub fn relative(period: i64, relative_to: ReminderRelation) -> Self {
        Self { reminder: None, relative_period: period, relative_to: Some(relative_to) }
    }
}

/// All the kinds of links between tasks the application knows about.
///
/// Only `Subtask` and `ParentTask` have a calendar counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Subtask,
    ParentTask,
    Related,
    DuplicateOf,
    Duplicates,
    Blocking,
    Blocked,
    Precedes,
    Follows,
    CopiedFrom,
    CopiedTo,
}

/// A link to another task, known only by its UID.
///
/// The codec never holds the other task itself: resolving the UID is the caller's job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTask {
    pub kind: RelationKind,
    pub uid: String,
}

/// A to-do task, as the application stores it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Persistent, globally unique identifier for the calendar component
    pub uid: String,
    pub title: String,
    pub description: String,
    /// Priority on the internal 0 (unset) to 5 (do now) scale
    pub priority: u8,

    pub done: bool,
    pub done_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,

    /// Repeat interval in seconds, 0 when the task does not repeat
    pub repeat_after: i64,
    pub repeat_mode: RepeatMode,

    /// Six hex digits, without the leading `#`
    pub hex_color: Option<String>,

    pub labels: Vec<Label>,
    pub reminders: Vec<TaskReminder>,
    pub related_tasks: Vec<RelatedTask>,
}

impl Task {
    /// Create a task that only has a title
    pub fn new(title: String) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    /// Whether an `RRULE` should be written for this task
    pub fn is_repeating(&self) -> bool {
        self.repeat_mode != RepeatMode::None
            && (self.repeat_after > 0 || self.repeat_mode == RepeatMode::Monthly)
    }
}
