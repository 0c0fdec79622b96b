//! Report sinks for crawl statistics
//!
//! This module handles durable output of crawl results:
//! - Flat per-category list files plus a summary counts file
//! - A queryable SQLite record of runs and inventories
//! - Optional archiving of fetched page bodies
//!
//! Sinks only ever receive read-only [`StatsSnapshot`]s; they never touch
//! live crawl state.

mod archive;
mod sqlite;
mod text;
mod traits;

pub use archive::PageArchive;
pub use sqlite::{load_statistics, print_statistics, SqliteReportSink, StoredStatistics};
pub use text::TextReportSink;
pub use traits::ReportSink;
