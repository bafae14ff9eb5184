// Calendar feed contents and determinism.
use chrono::{NaiveDate, NaiveTime};
use zvonok::config::ScheduleConfig;
use zvonok::export::feed;
use zvonok::model::{LessonCategory, ProcessedLesson, TimeSpan};

fn lesson() -> ProcessedLesson {
    ProcessedLesson {
        date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
        slot: 0,
        category: LessonCategory::Lecture,
        span: TimeSpan {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(10, 35, 0).unwrap(),
        },
        subject: "Anatomy".to_string(),
        teacher: Some("Ivanov".to_string()),
        location: Some("Main hall".to_string()),
        department: Some("Anatomy dept".to_string()),
        sequence: 1,
    }
}

#[test]
fn event_carries_zoned_ring_bounds() {
    let config = ScheduleConfig::default();
    let ics = feed::render(&config, &[lesson()], "101а").to_string();

    assert!(ics.contains("BEGIN:VEVENT"));
    assert!(ics.contains("DTSTART;TZID=Europe/Moscow:20240902T090000"));
    assert!(ics.contains("DTEND;TZID=Europe/Moscow:20240902T103500"));
}

#[test]
fn event_title_and_metadata_are_encoded() {
    let config = ScheduleConfig::default();
    let ics = feed::render(&config, &[lesson()], "101а").to_string();

    assert!(ics.contains("SUMMARY:№1 Л Anatomy"));
    assert!(ics.contains("LOCATION:Main hall"));
    assert!(ics.contains("Teacher: Ivanov"));
    assert!(ics.contains("CATEGORIES:Lecture"));
}

#[test]
fn missing_metadata_is_omitted() {
    let config = ScheduleConfig::default();
    let mut bare = lesson();
    bare.teacher = None;
    bare.location = None;
    bare.department = None;

    let ics = feed::render(&config, &[bare], "101а").to_string();
    assert!(!ics.contains("LOCATION"));
    assert!(!ics.contains("DESCRIPTION"));
}

#[test]
fn uids_are_stable_across_runs() {
    let config = ScheduleConfig::default();
    let first = feed::render(&config, &[lesson()], "101а").to_string();
    let second = feed::render(&config, &[lesson()], "101а").to_string();

    assert!(first.contains("UID:"));
    assert_eq!(first, second);
}

#[test]
fn uids_differ_between_subgroups() {
    let config = ScheduleConfig::default();
    let a = feed::render(&config, &[lesson()], "101а").to_string();
    let b = feed::render(&config, &[lesson()], "101б").to_string();

    let uid = |ics: &str| -> String {
        ics.lines()
            .find(|l| l.starts_with("UID:"))
            .unwrap()
            .to_string()
    };
    assert_ne!(uid(&a), uid(&b));
}

#[test]
fn empty_feed_has_no_events() {
    let config = ScheduleConfig::default();
    let calendar = feed::render(&config, &[], "101а");
    assert!(!calendar.to_string().contains("BEGIN:VEVENT"));
}
