//! Optional page body archive
//!
//! When a pages directory is configured, every successfully fetched body
//! is written to disk under a stable content key: the hex SHA-256 of the
//! page's canonical key. Archiving is best effort - a write failure is the
//! caller's to log, never a reason to stop the crawl.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Writes fetched page bodies into an archive directory
#[derive(Debug)]
pub struct PageArchive {
    dir: PathBuf,
}

impl PageArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Stores one page body under its canonical key
    pub fn store(&self, canonical_key: &str, body: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let file_name = format!("{}.html", Self::content_key(canonical_key));
        fs::write(self.dir.join(file_name), body)
    }

    /// Hex SHA-256 of the canonical key; stable across runs
    fn content_key(canonical_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(canonical_key.as_bytes());
        hex::encode(hasher.finalize())
    }
}
