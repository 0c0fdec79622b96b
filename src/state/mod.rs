//! Crawl run bookkeeping
//!
//! `CrawlState` holds every inventory and counter for one crawl run over
//! one target domain. It is owned by the coordinator and mutated only
//! through its methods - there are no ambient globals, and under
//! concurrency all mutation stays serialized in the owning task. Report
//! sinks only ever see read-only snapshots.

mod snapshot;

pub use snapshot::StatsSnapshot;

use crate::classify::ContactKind;
use crate::resolve::ResolvedUrl;
use std::collections::{HashMap, HashSet};

/// A URL that failed with a transport error, plus its attempt count
///
/// Held in the unresponsive inventory until the one-time retry pass; a
/// second failure is terminal.
#[derive(Debug, Clone)]
pub struct RetryEntry {
    pub url: ResolvedUrl,
    pub attempts: u32,
}

/// Process-wide mutable state for a single crawl run
#[derive(Debug)]
pub struct CrawlState {
    target_domain: String,

    /// Canonical keys successfully fetched (HTTP 200)
    visited: HashSet<String>,

    /// Internal pages grouped by (sub)domain: domain -> set of paths
    inner_pages: HashMap<String, HashSet<String>>,

    /// Subdomain hosts encountered
    subdomains: HashSet<String>,

    /// External hosts encountered
    external_domains: HashSet<String>,

    /// Canonical keys of pdf/doc/docx links
    document_files: HashSet<String>,

    /// Raw mailto: hrefs
    mail_links: HashSet<String>,

    /// Raw tel: hrefs
    tel_links: HashSet<String>,

    /// Full addresses that answered with a non-200 status
    bad_urls: HashSet<String>,

    /// Raw hrefs the resolver rejected
    malformed: HashSet<String>,

    /// Transport failures, keyed by canonical key
    unresponsive: HashMap<String, RetryEntry>,

    /// Full addresses whose HTML could not be parsed
    unparseable: HashSet<String>,

    /// Every href encountered, duplicates included
    total_links_found: u64,

    /// Unique external URLs encountered
    take_away_count: u64,
}

impl CrawlState {
    pub fn new(target_domain: impl Into<String>) -> Self {
        Self {
            target_domain: target_domain.into(),
            visited: HashSet::new(),
            inner_pages: HashMap::new(),
            subdomains: HashSet::new(),
            external_domains: HashSet::new(),
            document_files: HashSet::new(),
            mail_links: HashSet::new(),
            tel_links: HashSet::new(),
            bad_urls: HashSet::new(),
            malformed: HashSet::new(),
            unresponsive: HashMap::new(),
            unparseable: HashSet::new(),
            total_links_found: 0,
            take_away_count: 0,
        }
    }

    pub fn target_domain(&self) -> &str {
        &self.target_domain
    }

    /// Counts one encountered href; duplicates count too
    pub fn count_link(&mut self) {
        self.total_links_found += 1;
    }

    /// Records a successful fetch
    ///
    /// Also clears any unresponsive entry for the key: a URL that succeeds
    /// on its second chance is no longer a transport failure.
    pub fn record_visited(&mut self, url: &ResolvedUrl) {
        let key = url.canonical_key();
        self.unresponsive.remove(&key);
        self.visited.insert(key);
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, key: &str) -> bool {
        self.visited.contains(key)
    }

    /// Records an internal page path under its (sub)domain
    pub fn record_inner_page(&mut self, url: &ResolvedUrl) {
        self.inner_pages
            .entry(url.domain().to_string())
            .or_default()
            .insert(url.path().to_string());
    }

    /// Records a subdomain host
    pub fn record_subdomain(&mut self, url: &ResolvedUrl) {
        self.subdomains.insert(url.domain().to_string());
    }

    /// Records a unique external URL: host inventory plus take-away counter
    pub fn record_external(&mut self, url: &ResolvedUrl) {
        self.external_domains.insert(url.domain().to_string());
        self.take_away_count += 1;
    }

    /// Records a document-file link
    pub fn record_document(&mut self, url: &ResolvedUrl) {
        self.document_files.insert(url.canonical_key());
    }

    /// Records a mailto:/tel: href verbatim
    pub fn record_contact(&mut self, kind: ContactKind, raw: &str) {
        match kind {
            ContactKind::Mail => self.mail_links.insert(raw.to_string()),
            ContactKind::Tel => self.tel_links.insert(raw.to_string()),
        };
    }

    /// Records a raw href the resolver rejected
    pub fn record_malformed(&mut self, raw: &str) {
        self.malformed.insert(raw.to_string());
    }

    /// Records a non-200 response
    pub fn record_bad(&mut self, url: &ResolvedUrl) {
        self.bad_urls.insert(url.full_address());
    }

    /// Records a transport failure with its attempt number
    pub fn record_unresponsive(&mut self, url: &ResolvedUrl, attempts: u32) {
        self.unresponsive
            .insert(url.canonical_key(), RetryEntry { url: url.clone(), attempts });
    }

    /// Drains the entries eligible for the one-time retry pass
    ///
    /// Entries that already consumed their second chance stay terminal.
    pub fn drain_retryable(&mut self) -> Vec<RetryEntry> {
        let keys: Vec<String> = self
            .unresponsive
            .iter()
            .filter(|(_, entry)| entry.attempts < 2)
            .map(|(key, _)| key.clone())
            .collect();

        keys.iter()
            .filter_map(|key| self.unresponsive.remove(key))
            .collect()
    }

    pub fn unresponsive_count(&self) -> usize {
        self.unresponsive.len()
    }

    /// Records an HTML body the extractor could not process
    pub fn record_unparseable(&mut self, url: &ResolvedUrl) {
        self.unparseable.insert(url.full_address());
    }

    pub fn total_links_found(&self) -> u64 {
        self.total_links_found
    }

    pub fn take_away_count(&self) -> u64 {
        self.take_away_count
    }

    /// Takes a read-only snapshot for the report sinks
    ///
    /// Sets are sorted so persisted reports are deterministic.
    pub fn snapshot(&self) -> StatsSnapshot {
        snapshot::take(self)
    }

    // Snapshot internals need read access to the raw collections.
    pub(crate) fn visited_set(&self) -> &HashSet<String> {
        &self.visited
    }

    pub(crate) fn inner_pages_map(&self) -> &HashMap<String, HashSet<String>> {
        &self.inner_pages
    }

    pub(crate) fn subdomains_set(&self) -> &HashSet<String> {
        &self.subdomains
    }

    pub(crate) fn external_domains_set(&self) -> &HashSet<String> {
        &self.external_domains
    }

    pub(crate) fn document_files_set(&self) -> &HashSet<String> {
        &self.document_files
    }

    pub(crate) fn mail_links_set(&self) -> &HashSet<String> {
        &self.mail_links
    }

    pub(crate) fn tel_links_set(&self) -> &HashSet<String> {
        &self.tel_links
    }

    pub(crate) fn bad_urls_set(&self) -> &HashSet<String> {
        &self.bad_urls
    }

    pub(crate) fn malformed_set(&self) -> &HashSet<String> {
        &self.malformed
    }

    pub(crate) fn unresponsive_map(&self) -> &HashMap<String, RetryEntry> {
        &self.unresponsive
    }

    pub(crate) fn unparseable_set(&self) -> &HashSet<String> {
        &self.unparseable
    }
}
