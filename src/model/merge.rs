// File: ./src/model/merge.rs
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::lesson::ProcessedLesson;
use std::collections::HashMap;

/// Collapse lessons sharing a (date, slot, category) key.
///
/// The last record encountered wins, replacing the earlier one in
/// place so survivors keep their original position; every overwrite is
/// reported. Upstream schedule revisions re-list lessons, so "last
/// wins" mirrors the feed's own overwrite order, but callers should
/// not treat it as a guaranteed contract.
pub fn dedupe(lessons: Vec<ProcessedLesson>, sink: &mut DiagnosticSink) -> Vec<ProcessedLesson> {
    let mut kept: Vec<ProcessedLesson> = Vec::with_capacity(lessons.len());
    let mut index: HashMap<_, usize> = HashMap::new();

    for lesson in lessons {
        let key = lesson.merge_key();
        match index.get(&key) {
            Some(&at) => {
                sink.record(Diagnostic::Collision {
                    date: lesson.date,
                    slot: lesson.slot,
                    category: lesson.category,
                    dropped: kept[at].subject.clone(),
                    kept: lesson.subject.clone(),
                });
                kept[at] = lesson;
            }
            None => {
                index.insert(key, kept.len());
                kept.push(lesson);
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lesson::LessonCategory;
    use crate::model::rings::TimeSpan;
    use chrono::{NaiveDate, NaiveTime};

    fn lesson(slot: usize, subject: &str) -> ProcessedLesson {
        ProcessedLesson {
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            slot,
            category: LessonCategory::Lecture,
            span: TimeSpan {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(10, 35, 0).unwrap(),
            },
            subject: subject.to_string(),
            teacher: None,
            location: None,
            department: None,
            sequence: 1,
        }
    }

    #[test]
    fn collision_keeps_last_and_reports_once() {
        let mut sink = DiagnosticSink::new();
        let merged = dedupe(vec![lesson(0, "Anatomy"), lesson(0, "Histology")], &mut sink);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].subject, "Histology");
        assert_eq!(sink.entries().len(), 1);
        assert!(matches!(
            &sink.entries()[0],
            Diagnostic::Collision { dropped, kept, .. }
                if dropped == "Anatomy" && kept == "Histology"
        ));
    }

    #[test]
    fn distinct_slots_pass_through() {
        let mut sink = DiagnosticSink::new();
        let merged = dedupe(vec![lesson(0, "Anatomy"), lesson(1, "Anatomy")], &mut sink);
        assert_eq!(merged.len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn dedupe_is_idempotent() {
        let mut sink = DiagnosticSink::new();
        let once = dedupe(vec![lesson(0, "Anatomy"), lesson(0, "Histology")], &mut sink);

        let mut second_sink = DiagnosticSink::new();
        let twice = dedupe(once.clone(), &mut second_sink);

        assert_eq!(once, twice);
        assert!(second_sink.is_empty());
    }
}
