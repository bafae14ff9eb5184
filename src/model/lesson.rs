// File: ./src/model/lesson.rs
use crate::model::rings::TimeSpan;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Half of the academic year a schedule belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Semester {
    Autumn,
    Spring,
}

impl Semester {
    /// Index into the "YYYY/YYYY" academic-year string: the autumn term
    /// runs in the first calendar year, the spring term in the second.
    pub fn year_component(self) -> usize {
        match self {
            Semester::Autumn => 0,
            Semester::Spring => 1,
        }
    }

    /// The upstream feed names semesters in Russian; accept English too.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "autumn" | "fall" | "осенний" | "осень" => Some(Semester::Autumn),
            "spring" | "весенний" | "весна" => Some(Semester::Spring),
            _ => None,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semester::Autumn => write!(f, "autumn"),
            Semester::Spring => write!(f, "spring"),
        }
    }
}

impl Serialize for Semester {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Semester::Autumn => "autumn",
            Semester::Spring => "spring",
        })
    }
}

impl<'de> Deserialize<'de> for Semester {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Semester::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised semester '{raw}'")))
    }
}

/// Lesson category, derived from the feed's free-text type label.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter)]
pub enum LessonCategory {
    Lecture,
    Seminar,
    Unknown,
}

impl LessonCategory {
    /// Classify a type label. Matching is substring based because the
    /// feed uses inflected forms ("занятия лекционного типа").
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("лекц") || label.contains("lecture") {
            LessonCategory::Lecture
        } else if label.contains("семин") || label.contains("seminar") {
            LessonCategory::Seminar
        } else {
            LessonCategory::Unknown
        }
    }

    /// Single-letter form used in the grid's type column and event titles.
    pub fn letter(self) -> &'static str {
        match self {
            LessonCategory::Lecture => "Л",
            LessonCategory::Seminar => "С",
            LessonCategory::Unknown => "?",
        }
    }
}

impl fmt::Display for LessonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonCategory::Lecture => write!(f, "lecture"),
            LessonCategory::Seminar => write!(f, "seminar"),
            LessonCategory::Unknown => write!(f, "unknown"),
        }
    }
}

fn deserialize_week_number<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<u32, D::Error> {
    // The feed is inconsistent: week numbers arrive as integers or as
    // digit strings depending on the schedule revision.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("unparseable week number '{s}'"))),
    }
}

/// One record as delivered by the upstream timetable feed. Field names
/// follow the feed's JSON; extra fields are ignored. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLesson {
    pub academic_year: String,
    pub semester: Semester,
    #[serde(deserialize_with = "deserialize_week_number")]
    pub week_number: u32,
    pub day_name: String,
    pub pair_time: String,
    pub lesson_type: String,
    pub subject_name: String,
    #[serde(default)]
    pub subgroup: Option<String>,
    #[serde(default, rename = "lectorName")]
    pub teacher: Option<String>,
    #[serde(default, rename = "locationAddress")]
    pub location: Option<String>,
    #[serde(default, rename = "departmentName")]
    pub department: Option<String>,
}

/// A lesson pinned to an absolute date and bell slot. Created once per
/// surviving raw record; the merger may discard instances but never
/// edits a kept one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedLesson {
    pub date: NaiveDate,
    pub slot: usize,
    pub category: LessonCategory,
    /// Full span of the matched ring, so exporters render normalised
    /// times without re-querying the bell tables.
    pub span: TimeSpan,
    pub subject: String,
    pub teacher: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    /// 1-based occurrence count of this (subject, category) pair across
    /// the semester, in processing order.
    pub sequence: u32,
}

impl ProcessedLesson {
    pub fn merge_key(&self) -> (NaiveDate, usize, LessonCategory) {
        (self.date, self.slot, self.category)
    }

    /// Grid label for the slot column, e.g. "2-5" for the fifth
    /// occurrence of a subject in the day's second period.
    pub fn slot_label(&self) -> String {
        format!("{}-{}", self.slot + 1, self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_inflected_labels() {
        assert_eq!(
            LessonCategory::classify("Занятия лекционного типа"),
            LessonCategory::Lecture
        );
        assert_eq!(
            LessonCategory::classify("занятия семинарского типа"),
            LessonCategory::Seminar
        );
        assert_eq!(LessonCategory::classify("Lecture"), LessonCategory::Lecture);
        assert_eq!(
            LessonCategory::classify("физическая культура"),
            LessonCategory::Unknown
        );
    }

    #[test]
    fn semester_parses_both_languages() {
        assert_eq!(Semester::parse("осенний"), Some(Semester::Autumn));
        assert_eq!(Semester::parse(" Spring "), Some(Semester::Spring));
        assert_eq!(Semester::parse("trimester"), None);
    }

    #[test]
    fn raw_lesson_accepts_feed_shape() {
        let json = r#"{
            "academicYear": "2024/2025",
            "semester": "весенний",
            "weekNumber": "3",
            "dayName": "чт",
            "pairTime": "09:00-10:35",
            "lessonType": "Занятия лекционного типа",
            "subjectName": "Анатомия",
            "subgroup": "202б",
            "lectorName": "Иванов И.И.",
            "locationAddress": "Пискаревский пр. 47",
            "departmentName": "Кафедра анатомии",
            "scheduleId": 576,
            "courseNumber": 2
        }"#;
        let lesson: RawLesson = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.semester, Semester::Spring);
        assert_eq!(lesson.week_number, 3);
        assert_eq!(lesson.teacher.as_deref(), Some("Иванов И.И."));
        assert_eq!(lesson.department.as_deref(), Some("Кафедра анатомии"));
    }
}
