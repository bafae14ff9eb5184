// File: ./src/config.rs
// Pipeline configuration: bell tables, day-name maps, term anchors and
// export cosmetics. Everything an institution might want to swap lives
// here rather than in code; the defaults mirror the source
// institution's own tables.

use crate::calendar::SemesterStarts;
use crate::model::parser;
use crate::model::rings::{Ring, RingSchedule, TimeSpan};
use crate::storage;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Built-in day-token table: Cyrillic and English, short and full forms.
static DAY_NAMES: Lazy<HashMap<String, u32>> = Lazy::new(|| {
    let variants: [&[&str]; 7] = [
        &["пн", "понедельник", "mon", "monday"],
        &["вт", "вторник", "tue", "tuesday"],
        &["ср", "среда", "wed", "wednesday"],
        &["чт", "четверг", "thu", "thursday"],
        &["пт", "пятница", "fri", "friday"],
        &["сб", "суббота", "sat", "saturday"],
        &["вс", "воскресенье", "sun", "sunday"],
    ];
    let mut map = HashMap::new();
    for (offset, tokens) in variants.iter().enumerate() {
        for token in *tokens {
            map.insert((*token).to_string(), offset as u32);
        }
    }
    map
});

fn default_rings() -> RingSchedule {
    fn span(start: (u32, u32), end: (u32, u32)) -> TimeSpan {
        let t = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        TimeSpan {
            start: t(start),
            end: t(end),
        }
    }
    RingSchedule {
        lecture: vec![
            Ring {
                first: span((9, 0), (9, 45)),
                second: span((9, 50), (10, 35)),
            },
            Ring {
                first: span((10, 55), (11, 40)),
                second: span((11, 45), (12, 30)),
            },
            Ring {
                first: span((13, 10), (13, 55)),
                second: span((14, 0), (14, 45)),
            },
            Ring {
                first: span((15, 0), (15, 45)),
                second: span((15, 50), (16, 35)),
            },
            Ring {
                first: span((16, 45), (17, 30)),
                second: span((17, 35), (18, 20)),
            },
        ],
        seminar: vec![
            Ring {
                first: span((9, 0), (10, 30)),
                second: span((10, 45), (12, 15)),
            },
            Ring {
                first: span((13, 10), (14, 40)),
                second: span((14, 55), (16, 25)),
            },
        ],
    }
}

fn default_day_names() -> HashMap<String, u32> {
    DAY_NAMES.clone()
}

fn default_day_labels() -> [String; 7] {
    ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"].map(String::from)
}

fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

fn default_column_widths() -> [f64; 7] {
    [8.0, 12.0, 4.0, 4.0, 16.0, 4.0, 20.0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Bell tables keyed by lesson category.
    #[serde(default = "default_rings")]
    pub rings: RingSchedule,
    /// Nominal first day of each semester; the anchor Monday is the
    /// first Monday on or after it.
    #[serde(default)]
    pub semester_starts: SemesterStarts,
    /// Day-name token to Monday-based offset.
    #[serde(default = "default_day_names")]
    pub day_names: HashMap<String, u32>,
    /// Display labels for the grid's day column, Monday first.
    #[serde(default = "default_day_labels")]
    pub day_labels: [String; 7],
    /// IANA zone the calendar feed pins its events to.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Grid column widths: week, date, day, slot, time, type, subject.
    #[serde(default = "default_column_widths")]
    pub column_widths: [f64; 7],
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            rings: default_rings(),
            semester_starts: SemesterStarts::default(),
            day_names: default_day_names(),
            day_labels: default_day_labels(),
            timezone: default_timezone(),
            column_widths: default_column_widths(),
        }
    }
}

impl ScheduleConfig {
    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: ScheduleConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("failed to serialise config")?;
        storage::atomic_write(path, toml_str.as_bytes())
    }

    pub fn validate(&self) -> Result<()> {
        self.rings.validate()?;
        self.semester_starts.validate()?;
        for (token, offset) in &self.day_names {
            if *offset > 6 {
                anyhow::bail!("day token '{token}' maps to offset {offset}, expected 0..=6");
            }
        }
        Ok(())
    }

    /// Monday-based offset of a free-form day token, if known.
    pub fn day_offset(&self, raw: &str) -> Option<u32> {
        self.day_names
            .get(&parser::canonical_day_token(raw))
            .copied()
    }

    /// Display label for a date's weekday.
    pub fn day_label(&self, date: NaiveDate) -> &str {
        &self.day_labels[date.weekday().num_days_from_monday() as usize]
    }
}
