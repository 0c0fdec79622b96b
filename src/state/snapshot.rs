//! Read-only snapshots of crawl state
//!
//! A snapshot is taken atomically with respect to state mutation (the
//! coordinator owns both) and handed to report sinks, which never see the
//! live collections.

use super::CrawlState;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// An immutable, sorted copy of the crawl's inventories and counters
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub target_domain: String,
    pub taken_at: DateTime<Utc>,

    pub total_links_found: u64,
    pub take_away_count: u64,

    pub visited: Vec<String>,
    /// domain -> sorted paths
    pub inner_pages: BTreeMap<String, Vec<String>>,
    pub subdomains: Vec<String>,
    pub external_domains: Vec<String>,
    pub document_files: Vec<String>,
    pub mail_links: Vec<String>,
    pub tel_links: Vec<String>,
    pub bad_urls: Vec<String>,
    pub malformed: Vec<String>,
    /// full address -> attempts
    pub unresponsive: Vec<(String, u32)>,
    pub unparseable: Vec<String>,
}

impl StatsSnapshot {
    /// Total number of internal pages across all (sub)domains
    pub fn inner_page_count(&self) -> usize {
        self.inner_pages.values().map(Vec::len).sum()
    }
}

/// Builds a sorted snapshot from live state
pub(super) fn take(state: &CrawlState) -> StatsSnapshot {
    let mut unresponsive: Vec<(String, u32)> = state
        .unresponsive_map()
        .values()
        .map(|entry| (entry.url.full_address(), entry.attempts))
        .collect();
    unresponsive.sort();

    let inner_pages = state
        .inner_pages_map()
        .iter()
        .map(|(domain, paths)| (domain.clone(), sorted(paths)))
        .collect();

    StatsSnapshot {
        target_domain: state.target_domain().to_string(),
        taken_at: Utc::now(),
        total_links_found: state.total_links_found(),
        take_away_count: state.take_away_count(),
        visited: sorted(state.visited_set()),
        inner_pages,
        subdomains: sorted(state.subdomains_set()),
        external_domains: sorted(state.external_domains_set()),
        document_files: sorted(state.document_files_set()),
        mail_links: sorted(state.mail_links_set()),
        tel_links: sorted(state.tel_links_set()),
        bad_urls: sorted(state.bad_urls_set()),
        malformed: sorted(state.malformed_set()),
        unresponsive,
        unparseable: sorted(state.unparseable_set()),
    }
}

fn sorted(set: &std::collections::HashSet<String>) -> Vec<String> {
    let mut items: Vec<String> = set.iter().cloned().collect();
    items.sort();
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;

    #[test]
    fn test_snapshot_is_sorted() {
        let mut state = CrawlState::new("example.com");
        for path in ["/c", "/a", "/b"] {
            let u = resolve(&format!("https://example.com{}", path), None).unwrap();
            state.record_visited(&u);
            state.record_inner_page(&u);
        }

        let snap = state.snapshot();
        assert_eq!(
            snap.visited,
            vec!["example.com/a", "example.com/b", "example.com/c"]
        );
        assert_eq!(snap.inner_pages["example.com"], vec!["/a", "/b", "/c"]);
        assert_eq!(snap.inner_page_count(), 3);
    }
}
