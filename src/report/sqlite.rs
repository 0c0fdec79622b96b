//! SQLite report sink
//!
//! Records each crawl run and its category inventories in a queryable
//! database. Every persist replaces the run's inventories with the
//! snapshot's content inside one transaction, so readers never observe a
//! half-written report.

use crate::report::traits::ReportSink;
use crate::state::StatsSnapshot;
use crate::ReportError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQL schema for the report database
const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    target_domain TEXT NOT NULL,
    config_hash TEXT,
    started_at TEXT NOT NULL,
    last_snapshot_at TEXT,
    total_links_found INTEGER NOT NULL DEFAULT 0,
    take_away_count INTEGER NOT NULL DEFAULT 0,
    visited_count INTEGER NOT NULL DEFAULT 0
);

-- Per-category URL inventories, replaced on every snapshot
CREATE TABLE IF NOT EXISTS entries (
    run_id INTEGER NOT NULL REFERENCES runs(id),
    category TEXT NOT NULL,
    value TEXT NOT NULL,
    attempts INTEGER,
    PRIMARY KEY (run_id, category, value)
);

CREATE INDEX IF NOT EXISTS idx_entries_category ON entries(run_id, category);
"#;

/// SQLite-backed report sink
pub struct SqliteReportSink {
    conn: Connection,
    run_id: i64,
}

impl SqliteReportSink {
    /// Opens (or creates) the report database and starts a new run row
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `target_domain` - The crawl's target domain
    /// * `config_hash` - Hash of the configuration that produced this run
    pub fn new(
        path: &Path,
        target_domain: &str,
        config_hash: Option<&str>,
    ) -> Result<Self, ReportError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO runs (target_domain, config_hash, started_at) VALUES (?1, ?2, ?3)",
            params![target_domain, config_hash, now],
        )?;
        let run_id = conn.last_insert_rowid();

        Ok(Self { conn, run_id })
    }

    /// Creates an in-memory sink (for testing)
    #[cfg(test)]
    pub fn new_in_memory(target_domain: &str) -> Result<Self, ReportError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO runs (target_domain, started_at) VALUES (?1, ?2)",
            params![target_domain, now],
        )?;
        let run_id = conn.last_insert_rowid();

        Ok(Self { conn, run_id })
    }

    #[cfg(test)]
    fn count_entries(&self, category: &str) -> Result<u64, ReportError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE run_id = ?1 AND category = ?2",
            params![self.run_id, category],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl ReportSink for SqliteReportSink {
    fn persist(&mut self, snapshot: &StatsSnapshot) -> Result<(), ReportError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "UPDATE runs
             SET last_snapshot_at = ?1, total_links_found = ?2,
                 take_away_count = ?3, visited_count = ?4
             WHERE id = ?5",
            params![
                snapshot.taken_at.to_rfc3339(),
                snapshot.total_links_found as i64,
                snapshot.take_away_count as i64,
                snapshot.visited.len() as i64,
                self.run_id
            ],
        )?;

        tx.execute(
            "DELETE FROM entries WHERE run_id = ?1",
            params![self.run_id],
        )?;

        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO entries (run_id, category, value, attempts)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            let plain_categories: [(&str, &[String]); 9] = [
                ("visited", &snapshot.visited),
                ("subdomain", &snapshot.subdomains),
                ("external_domain", &snapshot.external_domains),
                ("document", &snapshot.document_files),
                ("mail", &snapshot.mail_links),
                ("tel", &snapshot.tel_links),
                ("bad", &snapshot.bad_urls),
                ("malformed", &snapshot.malformed),
                ("unparseable", &snapshot.unparseable),
            ];

            for (category, values) in plain_categories {
                for value in values {
                    insert.execute(params![self.run_id, category, value, None::<i64>])?;
                }
            }

            for (domain, paths) in &snapshot.inner_pages {
                for path in paths {
                    insert.execute(params![
                        self.run_id,
                        "inner_page",
                        format!("{}{}", domain, path),
                        None::<i64>
                    ])?;
                }
            }

            for (url, attempts) in &snapshot.unresponsive {
                insert.execute(params![
                    self.run_id,
                    "unresponsive",
                    url,
                    *attempts as i64
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

/// Stored statistics of the most recent run in a report database
#[derive(Debug, Clone)]
pub struct StoredStatistics {
    pub target_domain: String,
    pub started_at: String,
    pub last_snapshot_at: Option<String>,
    pub total_links_found: u64,
    pub take_away_count: u64,
    pub visited_count: u64,
    /// category -> entry count, sorted by category name
    pub category_counts: Vec<(String, u64)>,
}

/// Loads the statistics of the latest run from a report database
pub fn load_statistics(path: &Path) -> Result<Option<StoredStatistics>, ReportError> {
    let conn = Connection::open(path)?;

    let run = conn
        .query_row(
            "SELECT id, target_domain, started_at, last_snapshot_at,
                    total_links_found, take_away_count, visited_count
             FROM runs ORDER BY id DESC LIMIT 1",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    StoredStatistics {
                        target_domain: row.get(1)?,
                        started_at: row.get(2)?,
                        last_snapshot_at: row.get(3)?,
                        total_links_found: row.get::<_, i64>(4)? as u64,
                        take_away_count: row.get::<_, i64>(5)? as u64,
                        visited_count: row.get::<_, i64>(6)? as u64,
                        category_counts: Vec::new(),
                    },
                ))
            },
        )
        .optional()?;

    let (run_id, mut stats) = match run {
        Some(pair) => pair,
        None => return Ok(None),
    };

    let mut stmt = conn.prepare(
        "SELECT category, COUNT(*) FROM entries
         WHERE run_id = ?1 GROUP BY category ORDER BY category",
    )?;
    let counts = stmt.query_map(params![run_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
    })?;

    for count in counts {
        stats.category_counts.push(count?);
    }

    Ok(Some(stats))
}

/// Prints stored statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoredStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Target domain: {}", stats.target_domain);
    println!("Run started: {}", stats.started_at);
    if let Some(at) = &stats.last_snapshot_at {
        println!("Last snapshot: {}", at);
    }
    println!();

    println!("Overview:");
    println!("  Links encountered: {}", stats.total_links_found);
    println!("  Pages visited: {}", stats.visited_count);
    println!("  External resource links: {}", stats.take_away_count);
    println!();

    if !stats.category_counts.is_empty() {
        println!("Inventories:");
        for (category, count) in &stats.category_counts {
            println!("  {}: {}", category, count);
        }
    }
}
