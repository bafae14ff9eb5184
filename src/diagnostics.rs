// File: ./src/diagnostics.rs
// Per-record problem reporting.
//
// Normalisation never aborts on a bad record: each failure is recorded
// here and the record is either kept under a fallback category or
// dropped, so the caller can show exactly what was skipped and why.

use crate::model::lesson::LessonCategory;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Pair-time string that could not be parsed at all; record dropped.
    UnparsableTime { subject: String, raw: String },
    /// Day token missing from the configured day-name map; record dropped.
    UnknownDay { subject: String, raw: String },
    /// Academic year not in "YYYY/YYYY" form; record dropped.
    UnparsableYear { subject: String, raw: String },
    /// Type label matched no known category; record kept as `Unknown`.
    UnknownLessonType { subject: String, label: String },
    /// Start time missing from every relevant bell table; record dropped.
    UnmatchedStart {
        subject: String,
        category: LessonCategory,
        start: NaiveTime,
    },
    /// Start time equals the second taught half of a slot. The first
    /// half already carries the lesson, so the record is skipped.
    SecondHalf { subject: String, slot: usize },
    /// Two records landed on the same (date, slot, category); the later
    /// one wins.
    Collision {
        date: NaiveDate,
        slot: usize,
        category: LessonCategory,
        dropped: String,
        kept: String,
    },
}

impl Diagnostic {
    /// Second-half skips happen for every double period in the feed and
    /// are only interesting when debugging the bell tables themselves.
    pub fn is_expected(&self) -> bool {
        matches!(self, Diagnostic::SecondHalf { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnparsableTime { subject, raw } => {
                write!(f, "'{subject}': cannot parse pair time '{raw}', dropped")
            }
            Diagnostic::UnknownDay { subject, raw } => {
                write!(f, "'{subject}': unknown day name '{raw}', dropped")
            }
            Diagnostic::UnparsableYear { subject, raw } => {
                write!(f, "'{subject}': cannot resolve academic year '{raw}', dropped")
            }
            Diagnostic::UnknownLessonType { subject, label } => {
                write!(f, "'{subject}': unrecognised lesson type '{label}', kept as unknown")
            }
            Diagnostic::UnmatchedStart {
                subject,
                category,
                start,
            } => write!(
                f,
                "'{subject}': start {} matches no {category} bell window, dropped",
                start.format("%H:%M")
            ),
            Diagnostic::SecondHalf { subject, slot } => {
                write!(f, "'{subject}': second half of period {}, skipped", slot + 1)
            }
            Diagnostic::Collision {
                date,
                slot,
                category,
                dropped,
                kept,
            } => write!(
                f,
                "{date} period {} ({category}): '{dropped}' overwritten by '{kept}'",
                slot + 1
            ),
        }
    }
}

/// Accumulates diagnostics over one pipeline run, mirroring each entry
/// to the log as it is recorded.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_expected() {
            log::debug!("{diagnostic}");
        } else {
            log::warn!("{diagnostic}");
        }
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries worth surfacing to the user (everything but expected skips).
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| !d.is_expected())
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
