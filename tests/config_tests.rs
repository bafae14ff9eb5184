// Configuration loading, defaults and validation.
use zvonok::config::ScheduleConfig;
use zvonok::model::{LessonCategory, RingSchedule};

#[test]
fn defaults_round_trip_through_toml() {
    let config = ScheduleConfig::default();
    let serialised = toml::to_string_pretty(&config).unwrap();
    let restored: ScheduleConfig = toml::from_str(&serialised).unwrap();
    assert_eq!(config, restored);
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let config: ScheduleConfig = toml::from_str(r#"timezone = "Europe/Berlin""#).unwrap();
    assert_eq!(config.timezone, "Europe/Berlin");
    // Everything else keeps the built-in tables.
    assert_eq!(config.rings.lecture.len(), 5);
    assert_eq!(config.rings.seminar.len(), 2);
    assert_eq!(config.day_offset("пн"), Some(0));
}

#[test]
fn custom_bell_table_replaces_the_default() {
    let config: ScheduleConfig = toml::from_str(
        r#"
        [[rings.lecture]]
        first = { start = "08:30", end = "09:15" }
        second = { start = "09:20", end = "10:05" }
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    assert_eq!(config.rings.lecture.len(), 1);
    let ring = &config.rings.lecture[0];
    assert_eq!(ring.span().to_string(), "08:30-10:05");
    // Seminar table defaults to empty when only lectures are supplied,
    // which simply means no seminar ever matches.
    assert!(config.rings.seminar.is_empty());
    assert!(config.rings.windows(LessonCategory::Seminar).is_empty());
}

#[test]
fn disordered_bell_table_fails_validation() {
    let config: ScheduleConfig = toml::from_str(
        r#"
        [[rings.lecture]]
        first = { start = "13:10", end = "13:55" }
        second = { start = "14:00", end = "14:45" }

        [[rings.lecture]]
        first = { start = "09:00", end = "09:45" }
        second = { start = "09:50", end = "10:35" }
        "#,
    )
    .unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn bad_time_literal_is_a_parse_error() {
    let result: Result<ScheduleConfig, _> = toml::from_str(
        r#"
        [[rings.seminar]]
        first = { start = "quarter past nine", end = "10:30" }
        second = { start = "10:45", end = "12:15" }
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn custom_semester_starts_shift_the_anchor() {
    let config: ScheduleConfig = toml::from_str(
        r#"
        [semester_starts]
        autumn = { month = 10, day = 1 }
        spring = { month = 3, day = 1 }
        "#,
    )
    .unwrap();
    config.validate().unwrap();
    assert_eq!(config.semester_starts.autumn.month, 10);
}

#[test]
fn empty_ring_schedule_is_valid() {
    let schedule = RingSchedule::default();
    schedule.validate().unwrap();
    assert!(schedule.windows(LessonCategory::Lecture).is_empty());
}
