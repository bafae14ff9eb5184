// Data model: raw feed records, canonical lessons, bell tables.
pub mod lesson;
pub mod merge;
pub mod parser;
pub mod rings;

pub use lesson::{LessonCategory, ProcessedLesson, RawLesson, Semester};
pub use rings::{Ring, RingMatch, RingSchedule, TimeSpan};
