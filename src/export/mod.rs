// Export artifacts: merged-cell spreadsheet grid and calendar feed.
pub mod feed;
pub mod grid;
