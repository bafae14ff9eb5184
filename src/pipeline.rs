// File: ./src/pipeline.rs
// The normalisation pipeline: subgroup filter, time and date
// resolution, slot matching, dedup, chronological sort.

use crate::calendar;
use crate::config::ScheduleConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::lesson::{LessonCategory, ProcessedLesson, RawLesson};
use crate::model::merge;
use crate::model::parser;
use crate::model::rings::RingMatch;
use std::collections::HashMap;

/// Result of one pipeline run: the canonical lesson list in
/// chronological order plus the per-record problem trail.
#[derive(Debug)]
pub struct PipelineOutput {
    pub lessons: Vec<ProcessedLesson>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Pipeline<'a> {
    config: &'a ScheduleConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self { config }
    }

    /// Normalise `raw` down to the lessons of `subgroup`.
    ///
    /// An empty result is a valid outcome, not an error; every record
    /// that fails to normalise leaves a diagnostic behind.
    pub fn run(&self, raw: &[RawLesson], subgroup: &str) -> PipelineOutput {
        let mut sink = DiagnosticSink::new();
        let mut sequence: HashMap<(String, LessonCategory), u32> = HashMap::new();
        let mut lessons = Vec::new();

        let target = subgroup.to_lowercase();
        for record in raw.iter().filter(|r| subgroup_matches(r, &target)) {
            if let Some(lesson) = self.process_record(record, &mut sequence, &mut sink) {
                lessons.push(lesson);
            }
        }

        let mut lessons = merge::dedupe(lessons, &mut sink);
        lessons.sort_by_key(|l| (l.date, l.slot));

        log::info!(
            "normalised {} of {} raw records for subgroup '{}'",
            lessons.len(),
            raw.len(),
            subgroup
        );
        PipelineOutput {
            lessons,
            diagnostics: sink.into_entries(),
        }
    }

    fn process_record(
        &self,
        record: &RawLesson,
        sequence: &mut HashMap<(String, LessonCategory), u32>,
        sink: &mut DiagnosticSink,
    ) -> Option<ProcessedLesson> {
        let subject = &record.subject_name;

        // Unrecognised labels stay visible under an explicit Unknown
        // category instead of being swallowed.
        let category = LessonCategory::classify(&record.lesson_type);
        if category == LessonCategory::Unknown {
            sink.record(Diagnostic::UnknownLessonType {
                subject: subject.clone(),
                label: record.lesson_type.clone(),
            });
        }

        let Some(start) = parser::parse_pair_start(&record.pair_time) else {
            sink.record(Diagnostic::UnparsableTime {
                subject: subject.clone(),
                raw: record.pair_time.clone(),
            });
            return None;
        };

        let hit = if category == LessonCategory::Unknown {
            self.config.rings.lookup_any(start)
        } else {
            self.config.rings.lookup(category, start)
        };
        let (slot, ring) = match hit {
            RingMatch::Slot { index, ring } => (index, ring),
            RingMatch::SecondHalf { index } => {
                sink.record(Diagnostic::SecondHalf {
                    subject: subject.clone(),
                    slot: index,
                });
                return None;
            }
            RingMatch::NoMatch => {
                sink.record(Diagnostic::UnmatchedStart {
                    subject: subject.clone(),
                    category,
                    start,
                });
                return None;
            }
        };

        let Some(day_offset) = self.config.day_offset(&record.day_name) else {
            sink.record(Diagnostic::UnknownDay {
                subject: subject.clone(),
                raw: record.day_name.clone(),
            });
            return None;
        };

        let anchor = match calendar::anchor_monday(
            &self.config.semester_starts,
            record.semester,
            &record.academic_year,
        ) {
            Ok(anchor) => anchor,
            Err(_) => {
                sink.record(Diagnostic::UnparsableYear {
                    subject: subject.clone(),
                    raw: record.academic_year.clone(),
                });
                return None;
            }
        };
        let date = calendar::lesson_date(anchor, record.week_number, day_offset);

        let seq = sequence.entry((subject.clone(), category)).or_insert(0);
        *seq += 1;

        Some(ProcessedLesson {
            date,
            slot,
            category,
            span: ring.span(),
            subject: subject.clone(),
            teacher: record.teacher.clone(),
            location: record.location.clone(),
            department: record.department.clone(),
            sequence: *seq,
        })
    }
}

/// Case-insensitive exact subgroup match; upstream casing is unreliable,
/// the same subgroup appears as "101А" and "101а" in one feed.
fn subgroup_matches(record: &RawLesson, lowercase_target: &str) -> bool {
    record
        .subgroup
        .as_deref()
        .is_some_and(|s| s.to_lowercase() == lowercase_target)
}
