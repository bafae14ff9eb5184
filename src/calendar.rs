// File: ./src/calendar.rs
// Week-relative to absolute date mapping.
//
// The feed addresses lessons as (semester, week number, day name). The
// zero point is the first Monday on or after an institution-defined
// semester start day; week 1 is the anchor week. The start days are an
// institutional convention, so they live in configuration.

use crate::model::lesson::Semester;
use crate::model::parser;
use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Month and day of a semester's nominal first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

/// Term-start convention, one entry per semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterStarts {
    pub autumn: MonthDay,
    pub spring: MonthDay,
}

impl Default for SemesterStarts {
    fn default() -> Self {
        Self {
            autumn: MonthDay { month: 9, day: 1 },
            spring: MonthDay { month: 2, day: 1 },
        }
    }
}

impl SemesterStarts {
    pub fn get(&self, semester: Semester) -> MonthDay {
        match semester {
            Semester::Autumn => self.autumn,
            Semester::Spring => self.spring,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, md) in [("autumn", self.autumn), ("spring", self.spring)] {
            if !(1..=12).contains(&md.month) || !(1..=31).contains(&md.day) {
                bail!("invalid {name} semester start {:02}-{:02}", md.month, md.day);
            }
        }
        Ok(())
    }
}

/// First Monday on or after the semester's nominal start day, resolved
/// against the matching component of the academic-year string.
pub fn anchor_monday(
    starts: &SemesterStarts,
    semester: Semester,
    academic_year: &str,
) -> Result<NaiveDate> {
    let year = parser::academic_year_component(academic_year, semester)
        .with_context(|| format!("malformed academic year '{academic_year}'"))?;
    let start = starts.get(semester);
    let nominal = NaiveDate::from_ymd_opt(year, start.month, start.day).with_context(|| {
        format!(
            "invalid semester start {:02}-{:02} in year {year}",
            start.month, start.day
        )
    })?;
    let days_past_monday = nominal.weekday().num_days_from_monday();
    let forward = (7 - days_past_monday) % 7;
    Ok(nominal + Duration::days(i64::from(forward)))
}

/// Absolute date of a 1-based week number and Monday-based day offset
/// relative to the anchor Monday.
pub fn lesson_date(anchor: NaiveDate, week_number: u32, day_offset: u32) -> NaiveDate {
    anchor + Duration::weeks(i64::from(week_number) - 1) + Duration::days(i64::from(day_offset))
}

/// Semester and academic-year string in effect on `today`.
///
/// September through December and January belong to the autumn term;
/// February through June to the spring term. July and August belong to
/// no term and report the upcoming autumn.
pub fn academic_context(today: NaiveDate) -> (Semester, String) {
    let year = today.year();
    match today.month() {
        9..=12 => (Semester::Autumn, format!("{}/{}", year, year + 1)),
        1 => (Semester::Autumn, format!("{}/{}", year - 1, year)),
        2..=6 => (Semester::Spring, format!("{}/{}", year - 1, year)),
        _ => (Semester::Autumn, format!("{}/{}", year, year + 1)),
    }
}
