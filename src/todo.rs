//! The record the encoder works on (one iCal `VTODO`)

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::ical::time::format_date_time;
use crate::task::{RelationKind, ReminderRelation, RepeatMode, Task, TaskReminder};

/// The direction of a `RELATED-TO` link, seen from the task that carries it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Parent,
    Child,
}

impl RelationType {
    /// The `RELTYPE` parameter value
    pub fn as_reltype(&self) -> &'static str {
        match self {
            RelationType::Parent => "PARENT",
            RelationType::Child => "CHILD",
        }
    }

    /// Read a `RELTYPE` parameter. Anything else than `CHILD` (including nothing) is a parent link, which is also the RFC5545 default
    pub fn from_reltype(reltype: Option<&str>) -> Self {
        match reltype {
            Some(r) if r.eq_ignore_ascii_case("CHILD") => RelationType::Child,
            _ => RelationType::Parent,
        }
    }

    /// The application relation kind this link stands for
    pub fn kind(&self) -> RelationKind {
        match self {
            RelationType::Parent => RelationKind::ParentTask,
            RelationType::Child => RelationKind::Subtask,
        }
    }

    /// Collapse an application relation kind. Kinds that calendar clients know nothing about give `None`
    pub fn from_kind(kind: RelationKind) -> Option<Self> {
        match kind {
            RelationKind::ParentTask => Some(RelationType::Parent),
            RelationKind::Subtask => Some(RelationType::Child),
            _ => None,
        }
    }
}

/// A link to another task, by UID.
///
/// Links are not deduplicated here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub relation_type: RelationType,
    pub uid: String,
}

/// The date a relative alarm is anchored to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmRelation {
    Start,
    Due,
    End,
}

impl From<ReminderRelation> for AlarmRelation {
    fn from(relation: ReminderRelation) -> Self {
        match relation {
            ReminderRelation::StartDate => AlarmRelation::Start,
            ReminderRelation::DueDate => AlarmRelation::Due,
            ReminderRelation::EndDate => AlarmRelation::End,
        }
    }
}

/// When an alarm fires
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmTrigger {
    /// At a fixed time
    Absolute(DateTime<Utc>),
    /// `duration` seconds after (or before, when negative) one of the task dates. A zero duration fires right at that date
    Relative { duration: i64, relative_to: AlarmRelation },
}

/// An iCal `VALARM`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub trigger: AlarmTrigger,
    /// Text shown when the alarm fires. The task summary is used when this is empty
    #[serde(default)]
    pub description: String,
}

impl Alarm {
    pub fn absolute(at: DateTime<Utc>) -> Self {
        Self { trigger: AlarmTrigger::Absolute(at), description: String::new() }
    }

    pub fn relative(duration: i64, relative_to: AlarmRelation) -> Self {
        Self { trigger: AlarmTrigger::Relative { duration, relative_to }, description: String::new() }
    }

    /// Convert a task reminder. Absolute reminders without a time cannot be expressed and give `None`
    pub fn from_reminder(reminder: &TaskReminder) -> Option<Self> {
        match (reminder.relative_to, reminder.reminder) {
            (Some(relative_to), _) => Some(Self::relative(reminder.relative_period, relative_to.into())),
            (None, Some(at)) => Some(Self::absolute(at)),
            (None, None) => None,
        }
    }
}

/// A to-do item, as it will be written into a `VTODO`.
///
/// Every optional field can be left unset, it is then simply not written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Todo {
    /// Persistent identifier of the calendar component. When empty, one is derived from `updated` and `summary`
    pub uid: String,
    pub summary: String,
    pub description: String,
    /// Priority on the internal 0-5 scale
    pub priority: u8,

    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub due: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
    /// Length of the task in seconds, only written when there is a start but no end
    pub duration: i64,

    /// Repeat interval in seconds
    pub repeat_after: i64,
    pub repeat_mode: RepeatMode,

    pub categories: Vec<String>,
    /// Hex string, with or without `#`
    pub color: Option<String>,
    pub alarms: Vec<Alarm>,
    pub relations: Vec<Relation>,
}

impl Todo {
    /// The UID to write: the actual one, or a deterministic one derived from the last modification time and the summary
    pub fn uid_or_generated(&self) -> Cow<'_, str> {
        if !self.uid.is_empty() {
            return Cow::Borrowed(&self.uid);
        }
        let stamp = self.updated.as_ref().map(format_date_time).unwrap_or_default();
        let hash = Sha256::digest(self.summary.as_bytes());
        Cow::Owned(format!("{}{:x}", stamp, hash))
    }
}

impl From<&Task> for Todo {
    fn from(task: &Task) -> Self {
        let relations = task.related_tasks.iter()
            .filter_map(|related| {
                RelationType::from_kind(related.kind).map(|relation_type| Relation {
                    relation_type,
                    uid: related.uid.clone(),
                })
            })
            .collect();

        Self {
            uid: task.uid.clone(),
            summary: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            start: task.start_date,
            end: task.end_date,
            due: task.due_date,
            created: task.created,
            updated: task.updated,
            completed: if task.done { task.done_at } else { None },
            duration: 0,
            repeat_after: if task.is_repeating() { task.repeat_after } else { 0 },
            repeat_mode: task.repeat_mode,
            categories: task.labels.iter().map(|l| l.title.clone()).collect(),
            color: task.hex_color.clone(),
            alarms: task.reminders.iter().filter_map(Alarm::from_reminder).collect(),
            relations,
        }
    }
}
