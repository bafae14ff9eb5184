// File: ./src/export/feed.rs
// Calendar feed: one VEVENT per lesson, pinned to the configured zone.

use crate::config::ScheduleConfig;
use crate::model::lesson::{LessonCategory, ProcessedLesson};
use crate::storage;
use anyhow::Result;
use icalendar::{Calendar, CalendarDateTime, Component, Event, EventLike};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stable event identifier so re-imports update events in place instead
/// of duplicating them.
fn event_uid(subgroup: &str, lesson: &ProcessedLesson) -> String {
    let key = format!(
        "{subgroup}/{}/{}/{}",
        lesson.date, lesson.slot, lesson.category
    );
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes()).to_string()
}

fn event_summary(lesson: &ProcessedLesson) -> String {
    format!(
        "№{} {} {}",
        lesson.slot + 1,
        lesson.category.letter(),
        lesson.subject
    )
}

fn event_description(lesson: &ProcessedLesson) -> String {
    let mut lines = Vec::new();
    if let Some(teacher) = &lesson.teacher {
        lines.push(format!("Teacher: {teacher}"));
    }
    if let Some(department) = &lesson.department {
        lines.push(format!("Department: {department}"));
    }
    lines.join("\n")
}

fn feed_category(category: LessonCategory) -> &'static str {
    match category {
        LessonCategory::Lecture => "Lecture",
        LessonCategory::Seminar => "Seminar",
        LessonCategory::Unknown => "Class",
    }
}

/// Build the calendar. Deterministic for a fixed input and config: UIDs
/// are namespaced hashes and DTSTAMP derives from the event itself
/// rather than the wall clock.
pub fn render(config: &ScheduleConfig, lessons: &[ProcessedLesson], subgroup: &str) -> Calendar {
    let mut calendar = Calendar::new();
    calendar.name(&format!("Timetable {subgroup}"));
    calendar.timezone(config.timezone.as_str());

    for lesson in lessons {
        let start = lesson.date.and_time(lesson.span.start);
        let end = lesson.date.and_time(lesson.span.end);

        let mut event = Event::new();
        event
            .uid(&event_uid(subgroup, lesson))
            .summary(&event_summary(lesson))
            .starts(CalendarDateTime::WithTimezone {
                date_time: start,
                tzid: config.timezone.clone(),
            })
            .ends(CalendarDateTime::WithTimezone {
                date_time: end,
                tzid: config.timezone.clone(),
            })
            .timestamp(start.and_utc());

        if let Some(location) = &lesson.location {
            event.location(location);
        }
        let description = event_description(lesson);
        if !description.is_empty() {
            event.description(&description);
        }
        event.add_property("CATEGORIES", feed_category(lesson.category));

        calendar.push(event.done());
    }
    calendar
}

/// Write `<subgroup>.ics` under `out_dir`. Returns `None` when there is
/// nothing to export.
pub fn write_feed(
    config: &ScheduleConfig,
    lessons: &[ProcessedLesson],
    subgroup: &str,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    if lessons.is_empty() {
        log::warn!("no lessons for subgroup '{subgroup}', skipping calendar feed");
        return Ok(None);
    }
    let calendar = render(config, lessons, subgroup);
    let path = out_dir.join(format!("{subgroup}.ics"));
    storage::atomic_write(&path, calendar.to_string().as_bytes())?;
    log::info!("wrote {} ({} events)", path.display(), lessons.len());
    Ok(Some(path))
}
