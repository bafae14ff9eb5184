// File: ./src/export/grid.rs
// Merged-cell spreadsheet layout for the normalised timetable.
//
// Layout is computed first as plain data (rows plus merge spans), then
// rendered through rust_xlsxwriter. Keeping the two apart makes the
// span arithmetic testable without opening a workbook.

use crate::config::ScheduleConfig;
use crate::model::lesson::{LessonCategory, ProcessedLesson};
use crate::storage;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{
    Color, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook,
};
use std::path::{Path, PathBuf};

const SHEET_NAME: &str = "Timetable";
const HEADER: [&str; 7] = ["Week", "Date", "Day", "No.", "Time", "Type", "Subject"];

const LECTURE_FILL: Color = Color::RGB(0xFFF2CC);
const SEMINAR_FILL: Color = Color::RGB(0xD9EAD3);
const FONT: &str = "Roboto";

/// One printable row of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    /// Week number relative to the first lesson's week, 1-based.
    pub week: i64,
    pub date: NaiveDate,
    pub day: String,
    pub slot: String,
    pub time: String,
    pub category: LessonCategory,
    pub subject: String,
}

/// Rows `first..=last` share one merged cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub first: usize,
    pub last: usize,
}

impl Span {
    pub fn is_single(&self) -> bool {
        self.first == self.last
    }
}

/// Bottom-border weight of a row, decided by what ends there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEdge {
    None,
    /// Last lesson of a date.
    Date,
    /// Last lesson of a week; drawn thicker than a date boundary.
    Week,
}

#[derive(Debug, Default)]
pub struct GridLayout {
    pub rows: Vec<GridRow>,
    pub week_spans: Vec<Span>,
    pub date_spans: Vec<Span>,
    pub edges: Vec<RowEdge>,
}

/// Compute the printable layout. Lessons are re-sorted by (date, slot)
/// here so the layout never depends on caller ordering.
pub fn layout(config: &ScheduleConfig, lessons: &[ProcessedLesson]) -> GridLayout {
    let mut lessons: Vec<&ProcessedLesson> = lessons.iter().collect();
    lessons.sort_by_key(|l| (l.date, l.slot));

    let Some(first) = lessons.first() else {
        return GridLayout::default();
    };
    let first_date = first.date;

    let rows: Vec<GridRow> = lessons
        .iter()
        .map(|l| GridRow {
            week: (l.date - first_date).num_days() / 7 + 1,
            date: l.date,
            day: config.day_label(l.date).to_string(),
            slot: l.slot_label(),
            time: l.span.to_string(),
            category: l.category,
            subject: l.subject.clone(),
        })
        .collect();

    let week_spans = spans_by(&rows, |r| r.week);
    let date_spans = spans_by(&rows, |r| r.date);

    let mut edges = vec![RowEdge::None; rows.len()];
    for span in &date_spans {
        edges[span.last] = RowEdge::Date;
    }
    // A week boundary is always also a date boundary; the thicker edge wins.
    for span in &week_spans {
        edges[span.last] = RowEdge::Week;
    }

    GridLayout {
        rows,
        week_spans,
        date_spans,
        edges,
    }
}

fn spans_by<K: PartialEq>(rows: &[GridRow], key: impl Fn(&GridRow) -> K) -> Vec<Span> {
    let mut spans = Vec::new();
    if rows.is_empty() {
        return spans;
    }
    let mut start = 0usize;
    for i in 1..rows.len() {
        if key(&rows[i]) != key(&rows[start]) {
            spans.push(Span {
                first: start,
                last: i - 1,
            });
            start = i;
        }
    }
    spans.push(Span {
        first: start,
        last: rows.len() - 1,
    });
    spans
}

fn base(size: f64) -> Format {
    Format::new().set_font_name(FONT).set_font_size(size)
}

fn centered(format: Format) -> Format {
    format
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

fn with_edge(format: Format, edge: RowEdge) -> Format {
    match edge {
        RowEdge::None => format,
        RowEdge::Date => format.set_border_bottom(FormatBorder::Thin),
        RowEdge::Week => format.set_border_bottom(FormatBorder::Thick),
    }
}

fn category_fill(category: LessonCategory) -> Color {
    match category {
        LessonCategory::Lecture => LECTURE_FILL,
        // Unknown renders like a seminar so it stays visible in the grid.
        LessonCategory::Seminar | LessonCategory::Unknown => SEMINAR_FILL,
    }
}

/// Render the grid into a finished workbook buffer.
///
/// Output is byte-reproducible for a fixed input: the document creation
/// stamp is pinned rather than taken from the wall clock.
pub fn render(config: &ScheduleConfig, lessons: &[ProcessedLesson], subgroup: &str) -> Result<Vec<u8>> {
    let grid = layout(config, lessons);

    let mut workbook = Workbook::new();
    let properties = DocProperties::new()
        .set_title(&format!("Timetable {subgroup}"))
        .set_creation_datetime(&ExcelDateTime::from_ymd(2000, 1, 1)?);
    workbook.set_properties(&properties);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (column, width) in config.column_widths.iter().enumerate() {
        worksheet.set_column_width(column as u16, *width)?;
    }

    let title = base(14.0).set_align(FormatAlign::Center);
    worksheet.merge_range(0, 0, 0, 6, &format!("Timetable for {subgroup}"), &title)?;

    let header = base(14.0)
        .set_background_color(SEMINAR_FILL)
        .set_align(FormatAlign::Center)
        .set_border_top(FormatBorder::Thin)
        .set_border_left(FormatBorder::Thin)
        .set_border_right(FormatBorder::Thin)
        .set_border_bottom(FormatBorder::Thick);
    for (column, caption) in HEADER.iter().enumerate() {
        worksheet.write_string_with_format(1, column as u16, *caption, &header)?;
    }

    const FIRST_DATA_ROW: u32 = 2;

    // Week column: one merged cell per week group.
    for span in &grid.week_spans {
        let format = with_edge(centered(base(28.0).set_bold()), grid.edges[span.last]);
        let first_row = FIRST_DATA_ROW + span.first as u32;
        let last_row = FIRST_DATA_ROW + span.last as u32;
        let week = grid.rows[span.first].week as f64;
        if span.is_single() {
            worksheet.write_number_with_format(first_row, 0, week, &format)?;
        } else {
            worksheet.merge_range(first_row, 0, last_row, 0, "", &format)?;
            worksheet.write_number_with_format(first_row, 0, week, &format)?;
        }
    }

    // Date and day columns merge per date group.
    for span in &grid.date_spans {
        let edge = grid.edges[span.last];
        let date_format = with_edge(centered(base(12.0)), edge);
        let day_format = with_edge(centered(base(12.0).set_bold()), edge);
        let first_row = FIRST_DATA_ROW + span.first as u32;
        let last_row = FIRST_DATA_ROW + span.last as u32;
        let row = &grid.rows[span.first];
        let date_text = row.date.format("%d.%m.%Y").to_string();
        if span.is_single() {
            worksheet.write_string_with_format(first_row, 1, &date_text, &date_format)?;
            worksheet.write_string_with_format(first_row, 2, &row.day, &day_format)?;
        } else {
            worksheet.merge_range(first_row, 1, last_row, 1, &date_text, &date_format)?;
            worksheet.merge_range(first_row, 2, last_row, 2, &row.day, &day_format)?;
        }
    }

    // Per-lesson columns carry the category fill.
    for (i, row) in grid.rows.iter().enumerate() {
        let edge = grid.edges[i];
        let fill = category_fill(row.category);
        let cell = with_edge(
            centered(base(12.0)).set_text_wrap().set_background_color(fill),
            edge,
        );
        let subject = with_edge(
            base(12.0).set_text_wrap().set_background_color(fill),
            edge,
        );
        let r = FIRST_DATA_ROW + i as u32;
        worksheet.write_string_with_format(r, 3, &row.slot, &cell)?;
        worksheet.write_string_with_format(r, 4, &row.time, &cell)?;
        worksheet.write_string_with_format(r, 5, row.category.letter(), &cell)?;
        worksheet.write_string_with_format(r, 6, &row.subject, &subject)?;
    }

    workbook
        .save_to_buffer()
        .context("failed to serialise workbook")
}

/// Write `<subgroup>.xlsx` under `out_dir`. Returns `None` when there
/// is nothing to export.
pub fn write_grid(
    config: &ScheduleConfig,
    lessons: &[ProcessedLesson],
    subgroup: &str,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    if lessons.is_empty() {
        log::warn!("no lessons for subgroup '{subgroup}', skipping grid export");
        return Ok(None);
    }
    let buffer = render(config, lessons, subgroup)?;
    let path = out_dir.join(format!("{subgroup}.xlsx"));
    storage::atomic_write(&path, &buffer)?;
    log::info!("wrote {} ({} rows)", path.display(), lessons.len());
    Ok(Some(path))
}
