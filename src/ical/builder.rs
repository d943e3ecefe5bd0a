//! A module to build iCal files
//!
//! The layout is fixed: calendar clients (and their test suites) compare these documents line by line.
//! Lines are separated by `\n`, and are not folded.

use crate::color::color_lines;
use crate::config::Config;
use crate::ical::duration::format_duration;
use crate::ical::escape_text;
use crate::ical::time::format_date_time;
use crate::priority;
use crate::recurrence;
use crate::settings::PUBLISHED_TTL;
use crate::todo::{Alarm, AlarmRelation, AlarmTrigger, Todo};

/// Build a whole `VCALENDAR` containing one `VTODO` per task, in the given order
pub fn build_calendar(config: &Config, todos: &[Todo]) -> String {
    let mut lines = vec![
        String::from("BEGIN:VCALENDAR"),
        String::from("VERSION:2.0"),
        String::from("METHOD:PUBLISH"),
        format!("X-PUBLISHED-TTL:{}", PUBLISHED_TTL),
        format!("X-WR-CALNAME:{}", config.name),
        format!("PRODID:-//{}//EN", config.prod_id),
    ];
    lines.extend(color_lines(config.color.as_deref()));

    for todo in todos {
        lines.push(build_todo(todo));
    }
    lines.push(String::from("END:VCALENDAR"));

    lines.join("\n")
}

/// Build a single `VTODO` block (without a trailing line break)
pub fn build_todo(todo: &Todo) -> String {
    let uid = todo.uid_or_generated();
    log::trace!("Building VTODO {}", uid);

    let mut lines = vec![
        String::from("BEGIN:VTODO"),
        format!("UID:{}", uid),
    ];
    match &todo.updated {
        Some(updated) => lines.push(format!("DTSTAMP:{}", format_date_time(updated))),
        None => log::debug!("VTODO {} has no modification time, it is written without DTSTAMP", uid),
    }
    lines.push(format!("SUMMARY:{}", escape_text(&todo.summary)));

    match (&todo.start, &todo.end) {
        (Some(start), Some(end)) => {
            lines.push(format!("DTSTART:{}", format_date_time(start)));
            lines.push(format!("DTEND:{}", format_date_time(end)));
        },
        (Some(start), None) if todo.duration > 0 => {
            lines.push(format!("DTSTART:{}", format_date_time(start)));
            lines.push(format!("DURATION:{}", format_duration(todo.duration)));
        },
        _ => {},
    }

    lines.extend(color_lines(todo.color.as_deref()));

    if !todo.description.is_empty() {
        lines.push(format!("DESCRIPTION:{}", escape_text(&todo.description)));
    }
    if let Some(completed) = &todo.completed {
        lines.push(format!("COMPLETED:{}", format_date_time(completed)));
        lines.push(String::from("STATUS:COMPLETED"));
    }
    if let Some(due) = &todo.due {
        lines.push(format!("DUE:{}", format_date_time(due)));
    }
    if let Some(created) = &todo.created {
        lines.push(format!("CREATED:{}", format_date_time(created)));
    }

    let ical_priority = priority::to_ical(todo.priority);
    if ical_priority != 0 {
        lines.push(format!("PRIORITY:{}", ical_priority));
    }
    if let Some(rrule) = recurrence::rrule(todo.repeat_after, todo.repeat_mode, todo.due.as_ref()) {
        if todo.due.is_none() && !lines.iter().any(|line| line.starts_with("DTSTART:")) {
            log::debug!("VTODO {} repeats without DUE nor DTSTART, clients will anchor it themselves", uid);
        }
        lines.push(format!("RRULE:{}", rrule));
    }
    if !todo.categories.is_empty() {
        let categories: Vec<String> = todo.categories.iter().map(|c| escape_text(c)).collect();
        lines.push(format!("CATEGORIES:{}", categories.join(",")));
    }
    if let Some(updated) = &todo.updated {
        lines.push(format!("LAST-MODIFIED:{}", format_date_time(updated)));
    }

    for relation in &todo.relations {
        lines.push(format!("RELATED-TO;RELTYPE={}:{}", relation.relation_type.as_reltype(), relation.uid));
    }

    let alarms = build_alarms(&todo.alarms, &todo.summary);
    if !alarms.is_empty() {
        lines.push(alarms);
    }
    lines.push(String::from("END:VTODO"));

    lines.join("\n")
}

/// Build the `VALARM` blocks of a task. Alarms without a description show the task summary
pub fn build_alarms(alarms: &[Alarm], summary: &str) -> String {
    let mut lines = Vec::new();
    for alarm in alarms {
        lines.push(String::from("BEGIN:VALARM"));
        lines.push(match &alarm.trigger {
            AlarmTrigger::Absolute(at) => format!("TRIGGER;VALUE=DATE-TIME:{}", format_date_time(at)),
            AlarmTrigger::Relative { duration, relative_to: AlarmRelation::Start } => {
                format!("TRIGGER;RELATED=START:{}", format_duration(*duration))
            },
            AlarmTrigger::Relative { duration, relative_to: AlarmRelation::Due }
            | AlarmTrigger::Relative { duration, relative_to: AlarmRelation::End } => {
                format!("TRIGGER;RELATED=END:{}", format_duration(*duration))
            },
        });
        lines.push(String::from("ACTION:DISPLAY"));
        let description = if alarm.description.is_empty() { summary } else { alarm.description.as_str() };
        lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        lines.push(String::from("END:VALARM"));
    }
    lines.join("\n")
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::task::RepeatMode;
    use crate::todo::{Relation, RelationType};

    fn config() -> Config {
        Config::new(String::from("test"), String::from("RandomProdID which is not random"))
    }

    #[test]
    fn test_empty_calendar() {
        assert_eq!(build_calendar(&config(), &[]), "BEGIN:VCALENDAR
VERSION:2.0
METHOD:PUBLISH
X-PUBLISHED-TTL:PT4H
X-WR-CALNAME:test
PRODID:-//RandomProdID which is not random//EN
END:VCALENDAR");
    }

    #[test]
    fn test_calendar_color() {
        let config = config().with_color(String::from("ffffff"));
        let ical = build_calendar(&config, &[]);
        assert!(ical.contains("PRODID:-//RandomProdID which is not random//EN
X-APPLE-CALENDAR-COLOR:#ffffffFF
X-OUTLOOK-COLOR:#ffffff
X-FUNAMBOL-COLOR:#ffffff
COLOR:#ffffff
END:VCALENDAR"));
    }

    #[test]
    fn test_full_todo() {
        let todo = Todo {
            uid: String::from("randomuid"),
            summary: String::from("Todo #1"),
            description: String::from("Lorem Ipsum"),
            priority: 3,
            start: Some(Utc.with_ymd_and_hms(2018, 12, 1, 1, 12, 1).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2018, 12, 1, 2, 12, 1).unwrap()),
            due: Some(Utc.with_ymd_and_hms(2018, 12, 3, 1, 12, 1).unwrap()),
            created: Some(Utc.with_ymd_and_hms(2018, 11, 30, 1, 12, 1).unwrap()),
            updated: Some(Utc.with_ymd_and_hms(2018, 12, 1, 1, 12, 4).unwrap()),
            completed: Some(Utc.with_ymd_and_hms(2018, 12, 2, 1, 12, 1).unwrap()),
            repeat_after: 86400,
            categories: vec![String::from("label1"), String::from("label2")],
            color: Some(String::from("affffe")),
            ..Default::default()
        };

        assert_eq!(build_todo(&todo), "BEGIN:VTODO
UID:randomuid
DTSTAMP:20181201T011204
SUMMARY:Todo #1
DTSTART:20181201T011201
DTEND:20181201T021201
X-APPLE-CALENDAR-COLOR:#affffeFF
X-OUTLOOK-COLOR:#affffe
X-FUNAMBOL-COLOR:#affffe
COLOR:#affffe
DESCRIPTION:Lorem Ipsum
COMPLETED:20181202T011201
STATUS:COMPLETED
DUE:20181203T011201
CREATED:20181130T011201
PRIORITY:3
RRULE:FREQ=DAILY;INTERVAL=1
CATEGORIES:label1,label2
LAST-MODIFIED:20181201T011204
END:VTODO");
    }

    #[test]
    fn test_start_without_end() {
        let mut todo = Todo::default();
        todo.uid = String::from("uid");
        todo.start = Some(Utc.with_ymd_and_hms(2018, 12, 1, 1, 12, 1).unwrap());
        assert!(!build_todo(&todo).contains("DTSTART"));

        todo.duration = 5400;
        assert!(build_todo(&todo).contains("\nDTSTART:20181201T011201\nDURATION:PT1H30M\n"));
    }

    #[test]
    fn test_monthly_todo() {
        let mut todo = Todo::default();
        todo.uid = String::from("uid");
        todo.due = Some(Utc.with_ymd_and_hms(2018, 12, 7, 1, 12, 1).unwrap());
        todo.repeat_after = 7200;
        todo.repeat_mode = RepeatMode::Monthly;
        assert!(build_todo(&todo).contains("\nRRULE:FREQ=MONTHLY;BYMONTHDAY=07\n"));
    }

    #[test]
    fn test_relations_and_alarms() {
        let todo = Todo {
            uid: String::from("uid-parent"),
            summary: String::from("Parent"),
            relations: vec![
                Relation { relation_type: RelationType::Child, uid: String::from("uid-child-1") },
                Relation { relation_type: RelationType::Child, uid: String::from("uid-child-2") },
            ],
            alarms: vec![
                Alarm::absolute(Utc.with_ymd_and_hms(2018, 12, 1, 1, 12, 10).unwrap()),
                Alarm {
                    trigger: AlarmTrigger::Relative { duration: -7200, relative_to: AlarmRelation::Due },
                    description: String::from("Almost due"),
                },
                Alarm::relative(0, AlarmRelation::Start),
            ],
            ..Default::default()
        };

        assert_eq!(build_todo(&todo), "BEGIN:VTODO
UID:uid-parent
SUMMARY:Parent
RELATED-TO;RELTYPE=CHILD:uid-child-1
RELATED-TO;RELTYPE=CHILD:uid-child-2
BEGIN:VALARM
TRIGGER;VALUE=DATE-TIME:20181201T011210
ACTION:DISPLAY
DESCRIPTION:Parent
END:VALARM
BEGIN:VALARM
TRIGGER;RELATED=END:-PT2H
ACTION:DISPLAY
DESCRIPTION:Almost due
END:VALARM
BEGIN:VALARM
TRIGGER;RELATED=START:PT0S
ACTION:DISPLAY
DESCRIPTION:Parent
END:VALARM
END:VTODO");
    }

    #[test]
    fn test_unanchored_repeating_todo() {
        let mut todo = Todo::default();
        todo.uid = String::from("u");
        todo.repeat_after = 3600;
        assert_eq!(build_todo(&todo), "BEGIN:VTODO
UID:u
SUMMARY:
RRULE:FREQ=HOURLY;INTERVAL=1
END:VTODO");
    }

    #[test]
    fn test_categories_escaping() {
        let mut todo = Todo::default();
        todo.uid = String::from("uid");
        todo.categories = vec![String::from("a,b"), String::from("c")];
        assert!(build_todo(&todo).contains("\nCATEGORIES:a\\,b,c\n"));
    }

    #[test]
    fn test_description_escaping() {
        let mut todo = Todo::default();
        todo.uid = String::from("uid");
        todo.description = String::from("Lorem, Ipsum\nDolor sit amet");
        assert!(build_todo(&todo).contains("\nDESCRIPTION:Lorem\\, Ipsum\\nDolor sit amet\n"));
    }

    #[test]
    fn test_priority_zero_is_omitted() {
        let mut todo = Todo::default();
        todo.uid = String::from("uid");
        assert!(!build_todo(&todo).contains("PRIORITY"));
        todo.priority = 1;
        assert!(build_todo(&todo).contains("\nPRIORITY:9\n"));
        todo.priority = 42;
        assert!(!build_todo(&todo).contains("PRIORITY"));
    }
}
