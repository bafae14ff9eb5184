// File: ./src/model/rings.rs
// Bell-schedule registry and start-time matching.
//
// A "ring" is one teaching period of the institution's bell schedule:
// two taught halves separated by a short break. The upstream feed only
// carries free-form pair-time strings, so slot resolution works by
// matching the parsed start time against the configured tables.

use crate::model::lesson::LessonCategory;
use anyhow::{Result, bail};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;

/// Serde adapter for "HH:MM" wall-clock times as used in config files.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}

/// Wall-clock window within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// One bell period: two taught halves separated by a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    pub first: TimeSpan,
    pub second: TimeSpan,
}

impl Ring {
    /// Full span of the period, break included.
    pub fn span(&self) -> TimeSpan {
        TimeSpan {
            start: self.first.start,
            end: self.second.end,
        }
    }
}

/// Outcome of matching a parsed start time against a bell table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingMatch {
    /// Start of slot `index`.
    Slot { index: usize, ring: Ring },
    /// Start of the second taught half of slot `index`. The feed lists
    /// double periods as two records; only the first one carries the slot.
    SecondHalf { index: usize },
    NoMatch,
}

/// Per-category bell tables. A category with an empty table never matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingSchedule {
    #[serde(default)]
    pub lecture: Vec<Ring>,
    #[serde(default)]
    pub seminar: Vec<Ring>,
}

impl RingSchedule {
    pub fn windows(&self, category: LessonCategory) -> &[Ring] {
        match category {
            LessonCategory::Lecture => &self.lecture,
            LessonCategory::Seminar => &self.seminar,
            LessonCategory::Unknown => &[],
        }
    }

    /// Match `start` against one category's table.
    pub fn lookup(&self, category: LessonCategory, start: NaiveTime) -> RingMatch {
        for (index, ring) in self.windows(category).iter().enumerate() {
            if ring.first.start == start {
                return RingMatch::Slot { index, ring: *ring };
            }
            if ring.second.start == start {
                return RingMatch::SecondHalf { index };
            }
        }
        RingMatch::NoMatch
    }

    /// Match a record whose type label resolved to no known category.
    /// Scanning every table keeps the record visible downstream instead
    /// of silently vanishing with its slot unresolved.
    pub fn lookup_any(&self, start: NaiveTime) -> RingMatch {
        for category in [LessonCategory::Lecture, LessonCategory::Seminar] {
            match self.lookup(category, start) {
                RingMatch::NoMatch => continue,
                hit => return hit,
            }
        }
        RingMatch::NoMatch
    }

    /// Slot indices are positional, so a disordered table would silently
    /// mis-label every exported row. Rejected at load time instead.
    pub fn validate(&self) -> Result<()> {
        for category in LessonCategory::iter() {
            let windows = self.windows(category);
            for (index, ring) in windows.iter().enumerate() {
                if ring.first.end < ring.first.start
                    || ring.second.end < ring.second.start
                    || ring.second.start < ring.first.end
                {
                    bail!("{category} bell table: slot {} is non-monotonic", index + 1);
                }
            }
            for pair in windows.windows(2) {
                if pair[1].first.start <= pair[0].first.start {
                    bail!(
                        "{category} bell table is not sorted by start time ({} follows {})",
                        pair[1].first.start.format("%H:%M"),
                        pair[0].first.start.format("%H:%M"),
                    );
                }
            }
        }
        Ok(())
    }
}
