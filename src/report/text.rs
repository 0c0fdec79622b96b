//! Flat-file report sink
//!
//! Writes one summary counts file named after the target domain plus one
//! list file per category. Every persist rewrites the whole set, so the
//! files on disk always describe the most recent snapshot.

use crate::report::traits::ReportSink;
use crate::state::StatsSnapshot;
use crate::ReportError;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

/// Report sink writing plain-text lists into a stats directory
#[derive(Debug)]
pub struct TextReportSink {
    dir: PathBuf,
}

impl TextReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write_list(&self, name: &str, lines: &[String]) -> Result<(), ReportError> {
        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(self.dir.join(name), content)?;
        Ok(())
    }

    fn write_summary(&self, snapshot: &StatsSnapshot) -> Result<(), ReportError> {
        let mut out = String::new();
        let _ = writeln!(out, "Target domain: {}", snapshot.target_domain);
        let _ = writeln!(out, "Snapshot taken: {}", snapshot.taken_at.to_rfc3339());
        let _ = writeln!(out, "Links encountered: {}", snapshot.total_links_found);
        let _ = writeln!(out, "Unique pages visited: {}", snapshot.visited.len());
        let _ = writeln!(out, "Inner pages: {}", snapshot.inner_page_count());
        let _ = writeln!(out, "Subdomains encountered: {}", snapshot.subdomains.len());
        let _ = writeln!(
            out,
            "Links to external resources: {}",
            snapshot.take_away_count
        );
        let _ = writeln!(
            out,
            "Unique external domains: {}",
            snapshot.external_domains.len()
        );
        let _ = writeln!(
            out,
            "Links to pdf/doc/docx files: {}",
            snapshot.document_files.len()
        );
        let _ = writeln!(out, "Mail links: {}", snapshot.mail_links.len());
        let _ = writeln!(out, "Tel links: {}", snapshot.tel_links.len());
        let _ = writeln!(out, "Dead links: {}", snapshot.bad_urls.len());
        let _ = writeln!(out, "Unresponsive pages: {}", snapshot.unresponsive.len());
        let _ = writeln!(out, "Unparseable pages: {}", snapshot.unparseable.len());
        let _ = writeln!(out, "Malformed hrefs: {}", snapshot.malformed.len());

        let summary_name = format!("{}.txt", snapshot.target_domain);
        fs::write(self.dir.join(summary_name), out)?;
        Ok(())
    }

    fn inner_page_lines(snapshot: &StatsSnapshot) -> Vec<String> {
        let mut lines = Vec::new();
        for (domain, paths) in &snapshot.inner_pages {
            lines.push(domain.clone());
            for path in paths {
                lines.push(format!("\t{}", path));
            }
        }
        lines
    }
}

impl ReportSink for TextReportSink {
    fn persist(&mut self, snapshot: &StatsSnapshot) -> Result<(), ReportError> {
        fs::create_dir_all(&self.dir)?;

        self.write_summary(snapshot)?;
        self.write_list("inner_pages.txt", &Self::inner_page_lines(snapshot))?;
        self.write_list("subdomains.txt", &snapshot.subdomains)?;
        self.write_list("external_domains.txt", &snapshot.external_domains)?;
        self.write_list("documents.txt", &snapshot.document_files)?;
        self.write_list("mail_links.txt", &snapshot.mail_links)?;
        self.write_list("tel_links.txt", &snapshot.tel_links)?;
        self.write_list("bad_urls.txt", &snapshot.bad_urls)?;
        self.write_list("malformed.txt", &snapshot.malformed)?;
        self.write_list("unparseable.txt", &snapshot.unparseable)?;

        let unresponsive: Vec<String> = snapshot
            .unresponsive
            .iter()
            .map(|(url, attempts)| format!("{} (attempts: {})", url, attempts))
            .collect();
        self.write_list("unresponsive.txt", &unresponsive)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use crate::state::CrawlState;

    fn sample_snapshot() -> StatsSnapshot {
        let mut state = CrawlState::new("example.com");
        let home = resolve("https://example.com/", None).unwrap();
        let docs = resolve("https://docs.example.com/guide", None).unwrap();
        let ext = resolve("https://other.org/x", None).unwrap();

        state.count_link();
        state.count_link();
        state.record_visited(&home);
        state.record_inner_page(&home);
        state.record_subdomain(&docs);
        state.record_external(&ext);
        state.snapshot()
    }

    #[test]
    fn test_persist_writes_summary_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TextReportSink::new(dir.path());

        sink.persist(&sample_snapshot()).unwrap();

        let summary = fs::read_to_string(dir.path().join("example.com.txt")).unwrap();
        assert!(summary.contains("Target domain: example.com"));
        assert!(summary.contains("Links encountered: 2"));
        assert!(summary.contains("Unique pages visited: 1"));
        assert!(summary.contains("Links to external resources: 1"));

        let subdomains = fs::read_to_string(dir.path().join("subdomains.txt")).unwrap();
        assert_eq!(subdomains, "docs.example.com\n");

        let externals = fs::read_to_string(dir.path().join("external_domains.txt")).unwrap();
        assert_eq!(externals, "other.org\n");
    }

    #[test]
    fn test_inner_pages_grouped_by_domain() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TextReportSink::new(dir.path());

        sink.persist(&sample_snapshot()).unwrap();

        let inner = fs::read_to_string(dir.path().join("inner_pages.txt")).unwrap();
        assert_eq!(inner, "example.com\n\t/\n");
    }

    #[test]
    fn test_persist_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TextReportSink::new(dir.path());

        sink.persist(&sample_snapshot()).unwrap();

        let mut state = CrawlState::new("example.com");
        state.count_link();
        sink.persist(&state.snapshot()).unwrap();

        let summary = fs::read_to_string(dir.path().join("example.com.txt")).unwrap();
        assert!(summary.contains("Links encountered: 1"));
        assert!(summary.contains("Unique pages visited: 0"));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("nested");
        let mut sink = TextReportSink::new(&nested);

        sink.persist(&sample_snapshot()).unwrap();
        assert!(nested.join("example.com.txt").exists());
    }
}
