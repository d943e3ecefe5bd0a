//! A module to parse ICal files

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use ical::parser::ical::component::{IcalAlarm, IcalTimeZone};
use ical::property::Property;

use crate::color::find_color;
use crate::error::ParseError;
use crate::ical::duration::{is_duration, parse_duration};
use crate::ical::time::{parse_date_time, resolve_tzid};
use crate::ical::{param_value, split_text_list, unescape_text};
use crate::priority;
use crate::task::{Label, RelatedTask, ReminderRelation, Task, TaskReminder};
use crate::todo::RelationType;


/// Parse an iCal file into a [`Task`].
///
/// Only the first `VTODO` of the first calendar is read. `VTIMEZONE`s of that calendar are used to resolve `TZID` parameters.
///
/// Fields that cannot be understood (a malformed date, a weird duration...) are logged and left unset: only a document without any calendar or any `VTODO` is an error.
/// Labels and related tasks are placeholders that only carry a title or a UID, it is up to the caller to match them with actual records.
pub fn parse(content: &str) -> Result<Task, ParseError> {
    let mut reader = ical::IcalParser::new(content.as_bytes());
    let calendar = match reader.next() {
        None => return Err(ParseError::NoCalendar),
        Some(Err(err)) => return Err(ParseError::Ical(err.to_string())),
        Some(Ok(calendar)) => calendar,
    };

    let vtodo = calendar.todos.first().ok_or(ParseError::NoTodo)?;
    if calendar.todos.len() > 1 {
        log::debug!("Calendar has {} VTODOs, only the first one is read", calendar.todos.len());
    }

    let props = TodoProperties::new(&vtodo.properties, &calendar.timezones);
    let mut task = Task::new(props.text("SUMMARY").unwrap_or_default());

    task.uid = props.value("UID").map(|uid| uid.trim().to_string()).unwrap_or_default();
    if task.uid.is_empty() {
        log::debug!("VTODO has no UID");
    }
    task.description = props.text("DESCRIPTION").unwrap_or_default();
    task.priority = props.value("PRIORITY").map(priority::parse).unwrap_or(0);

    task.done = props.value("STATUS").map_or(false, |s| s.trim().eq_ignore_ascii_case("COMPLETED"));
    task.done_at = props.date("COMPLETED");
    task.due_date = props.date("DUE");
    task.start_date = props.date("DTSTART");
    task.end_date = props.date("DTEND");
    task.created = props.date("CREATED");
    task.updated = props.date("DTSTAMP").or_else(|| props.date("LAST-MODIFIED"));

    let duration = props.value("DURATION").map(|value| match parse_duration(value) {
        Some(seconds) => seconds,
        None => {
            log::warn!("Invalid DURATION {:?}, ignoring it", value);
            0
        },
    }).unwrap_or(0);
    if let (true, None, Some(start)) = (duration > 0, task.end_date, task.start_date) {
        task.end_date = Duration::try_seconds(duration).and_then(|d| start.checked_add_signed(d));
        if task.end_date.is_none() {
            log::warn!("DURATION of {}s goes past the supported date range, task {:?} has no end date", duration, task.uid);
        }
    }

    if props.value("RRULE").is_some() {
        log::debug!("Ignoring RRULE of task {:?}, recurrence is not read from calendar clients", task.uid);
    }

    task.labels = props.value("CATEGORIES")
        .map(|categories| {
            split_text_list(categories).into_iter()
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty())
                .map(Label::new)
                .collect()
        })
        .unwrap_or_default();

    task.hex_color = find_color(|name| props.value(name));

    task.related_tasks = props.related.iter()
        .filter_map(|prop| {
            let uid = prop.value.as_deref().map(str::trim).unwrap_or_default();
            if uid.is_empty() {
                log::warn!("Ignoring a RELATED-TO without UID");
                return None;
            }
            let relation_type = RelationType::from_reltype(param_value(prop, "RELTYPE"));
            Some(RelatedTask { kind: relation_type.kind(), uid: uid.to_string() })
        })
        .collect();

    let reminders = vtodo.alarms.iter()
        .filter_map(|alarm| parse_alarm(alarm, &task, &calendar.timezones))
        .collect();
    task.reminders = reminders;

    Ok(task)
}

/// The properties of a `VTODO`, by (uppercase) name.
///
/// A property that appears several times keeps its last value, except `RELATED-TO` which is a list.
struct TodoProperties<'a> {
    by_name: HashMap<String, &'a Property>,
    related: Vec<&'a Property>,
    timezones: &'a [IcalTimeZone],
}

impl<'a> TodoProperties<'a> {
    fn new(properties: &'a [Property], timezones: &'a [IcalTimeZone]) -> Self {
        let mut by_name = HashMap::new();
        let mut related = Vec::new();
        for prop in properties {
            let name = prop.name.to_uppercase();
            if name == "RELATED-TO" {
                related.push(prop);
            } else {
                by_name.insert(name, prop);
            }
        }
        Self { by_name, related, timezones }
    }

    fn value(&self, name: &str) -> Option<&'a str> {
        self.by_name.get(name).and_then(|prop| prop.value.as_deref())
    }

    /// An unescaped `TEXT` value
    fn text(&self, name: &str) -> Option<String> {
        self.value(name).map(unescape_text)
    }

    fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        let prop = self.by_name.get(name)?;
        parse_date_time(prop.value.as_deref()?, property_tz(prop, self.timezones))
    }
}

fn property_tz(prop: &Property, timezones: &[IcalTimeZone]) -> Option<Tz> {
    param_value(prop, "TZID").and_then(|tzid| resolve_tzid(tzid, timezones))
}

/// Turn a `VALARM` into a reminder.
///
/// * `TRIGGER;VALUE=DATE-TIME:...` (or any trigger that is not a duration) is an absolute reminder
/// * `TRIGGER;RELATED=END:-PT2H` is relative to the end date, or to the due date for tasks without end date
/// * `TRIGGER:-PT2H` and `TRIGGER;RELATED=START:-PT2H` are relative to the start date, or to the due date for tasks without start date
fn parse_alarm(alarm: &IcalAlarm, task: &Task, timezones: &[IcalTimeZone]) -> Option<TaskReminder> {
    let trigger = match alarm.properties.iter().find(|prop| prop.name.eq_ignore_ascii_case("TRIGGER")) {
        Some(trigger) => trigger,
        None => {
            log::warn!("Ignoring a VALARM without TRIGGER in task {:?}", task.uid);
            return None;
        },
    };
    let value = trigger.value.as_deref().map(str::trim).unwrap_or_default();

    let is_date_time = param_value(trigger, "VALUE").map_or(false, |v| v.eq_ignore_ascii_case("DATE-TIME"));
    if is_date_time || !is_duration(value) {
        return parse_date_time(value, property_tz(trigger, timezones))
            .map(TaskReminder::absolute);
    }

    let period = match parse_duration(value) {
        Some(seconds) => seconds,
        None => {
            log::warn!("Invalid alarm TRIGGER {:?} in task {:?}, firing it at its anchor date", value, task.uid);
            0
        },
    };

    let related_to_end = param_value(trigger, "RELATED").map_or(false, |r| r.eq_ignore_ascii_case("END"));
    let relative_to = match (related_to_end, task.end_date.is_some(), task.start_date.is_some()) {
        (true, true, _) => ReminderRelation::EndDate,
        (true, false, _) => ReminderRelation::DueDate,
        (false, _, true) => ReminderRelation::StartDate,
        (false, _, false) => ReminderRelation::DueDate,
    };

    Some(TaskReminder::relative(period, relative_to))
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use crate::task::RelationKind;

    const EXAMPLE_ICAL: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Nextcloud Tasks v0.13.6
BEGIN:VTODO
UID:0633de27-8c32-42be-bcb8-63bc879c6185
CREATED:20210321T001600
LAST-MODIFIED:20210321T001600
DTSTAMP:20210321T001600
SUMMARY:Do not forget to do this
END:VTODO
END:VCALENDAR
"#;

    #[test]
    fn test_ical_parsing() {
        let task = parse(EXAMPLE_ICAL).unwrap();
        let stamp = Utc.with_ymd_and_hms(2021, 3, 21, 0, 16, 0).unwrap();

        assert_eq!(task.uid, "0633de27-8c32-42be-bcb8-63bc879c6185");
        assert_eq!(task.title, "Do not forget to do this");
        assert_eq!(task.done, false);
        assert_eq!(task.created, Some(stamp));
        assert_eq!(task.updated, Some(stamp));
        assert_eq!(task.priority, 0);
        assert!(task.labels.is_empty());
        assert!(task.reminders.is_empty());
    }

    #[test]
    fn test_structural_errors() {
        assert!(parse("").is_err());
        assert!(parse("this is not a calendar").is_err());

        let no_todo = "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nUID:event\nSUMMARY:An event\nEND:VEVENT\nEND:VCALENDAR\n";
        assert_eq!(parse(no_todo), Err(ParseError::NoTodo));
    }

    #[test]
    fn test_bad_dates_degrade() {
        let ical = "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VTODO\nUID:uid\nSUMMARY:Bad dates\nDUE:tomorrow\nDTSTART:20230301T150000\nDURATION:forever\nPRIORITY:urgent\nEND:VTODO\nEND:VCALENDAR\n";
        let task = parse(ical).unwrap();
        assert_eq!(task.title, "Bad dates");
        assert_eq!(task.due_date, None);
        assert_eq!(task.start_date, Some(Utc.with_ymd_and_hms(2023, 3, 1, 15, 0, 0).unwrap()));
        assert_eq!(task.end_date, None);
        assert_eq!(task.priority, 0);
    }

    #[test]
    fn test_duration_gives_end_date() {
        let ical = "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VTODO\nUID:uid\nSUMMARY:Meeting prep\nDTSTART:20230301T150000Z\nDURATION:PT1H30M\nEND:VTODO\nEND:VCALENDAR\n";
        let task = parse(ical).unwrap();
        assert_eq!(task.end_date, Some(Utc.with_ymd_and_hms(2023, 3, 1, 16, 30, 0).unwrap()));
    }

    #[test]
    fn test_huge_duration_leaves_no_end_date() {
        for duration in &["P100000000W", "P99999999999999999W"] {
            let ical = format!("BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VTODO\nUID:uid\nSUMMARY:Forever\nDTSTART:20230301T150000Z\nDURATION:{}\nEND:VTODO\nEND:VCALENDAR\n", duration);
            let task = parse(&ical).unwrap();
            assert_eq!(task.title, "Forever");
            assert_eq!(task.start_date, Some(Utc.with_ymd_and_hms(2023, 3, 1, 15, 0, 0).unwrap()));
            assert_eq!(task.end_date, None);
        }
    }

    #[test]
    fn test_tzid_and_vtimezone() {
        let ical = "BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Some client//EN
BEGIN:VTIMEZONE
TZID:Custom_Zone
X-LIC-LOCATION:Europe/Berlin
BEGIN:STANDARD
DTSTART:19701025T030000
TZOFFSETFROM:+0200
TZOFFSETTO:+0100
END:STANDARD
END:VTIMEZONE
BEGIN:VTODO
UID:uid
SUMMARY:Zoned
DUE;TZID=Europe/Berlin:20230301T150000
DTSTART;TZID=Custom_Zone:20230301T090000
END:VTODO
END:VCALENDAR
";
        let task = parse(ical).unwrap();
        assert_eq!(task.due_date, Some(Utc.with_ymd_and_hms(2023, 3, 1, 14, 0, 0).unwrap()));
        assert_eq!(task.start_date, Some(Utc.with_ymd_and_hms(2023, 3, 1, 8, 0, 0).unwrap()));
    }

    #[test]
    fn test_relations() {
        let ical = "BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VTODO
UID:uid
SUMMARY:Linked
RELATED-TO;RELTYPE=PARENT:uid-parent
RELATED-TO;RELTYPE=CHILD:uid-child
RELATED-TO;RELTYPE=SIBLING:uid-sibling
RELATED-TO:uid-default
END:VTODO
END:VCALENDAR
";
        let task = parse(ical).unwrap();
        assert_eq!(task.related_tasks, vec![
            RelatedTask { kind: RelationKind::ParentTask, uid: String::from("uid-parent") },
            RelatedTask { kind: RelationKind::Subtask, uid: String::from("uid-child") },
            RelatedTask { kind: RelationKind::ParentTask, uid: String::from("uid-sibling") },
            RelatedTask { kind: RelationKind::ParentTask, uid: String::from("uid-default") },
        ]);
    }

    #[test]
    fn test_alarms() {
        let ical = "BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VTODO
UID:uid
SUMMARY:Alarms
DTSTART:20181201T011204
DUE:20181203T011204
BEGIN:VALARM
TRIGGER;VALUE=DATE-TIME:20181201T011210Z
ACTION:DISPLAY
END:VALARM
BEGIN:VALARM
TRIGGER;RELATED=END:-PT2H
ACTION:DISPLAY
END:VALARM
BEGIN:VALARM
TRIGGER:-PT60M
ACTION:DISPLAY
END:VALARM
BEGIN:VALARM
TRIGGER;RELATED=START:PT0S
ACTION:DISPLAY
END:VALARM
BEGIN:VALARM
ACTION:DISPLAY
DESCRIPTION:No trigger
END:VALARM
END:VTODO
END:VCALENDAR
";
        let task = parse(ical).unwrap();
        assert_eq!(task.reminders, vec![
            TaskReminder::absolute(Utc.with_ymd_and_hms(2018, 12, 1, 1, 12, 10).unwrap()),
            TaskReminder::relative(-7200, ReminderRelation::DueDate),
            TaskReminder::relative(-3600, ReminderRelation::StartDate),
            TaskReminder::relative(0, ReminderRelation::StartDate),
        ]);
    }

    #[test]
    fn test_alarm_relative_to_end_date() {
        let ical = "BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VTODO
UID:uid
SUMMARY:Alarms
DTSTART:20181201T011204
DTEND:20181202T011204
BEGIN:VALARM
TRIGGER;RELATED=END:-PT2H
ACTION:DISPLAY
END:VALARM
END:VTODO
END:VCALENDAR
";
        let task = parse(ical).unwrap();
        assert_eq!(task.reminders, vec![TaskReminder::relative(-7200, ReminderRelation::EndDate)]);
    }
}
