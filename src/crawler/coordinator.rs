//! Crawl coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that drives the breadth-first
//! traversal, including:
//! - Seeding the frontier from the configured seed URL
//! - Dispatching bounded concurrent fetches with per-host politeness
//! - Classifying discovered hrefs into the crawl inventories
//! - Granting unresponsive URLs their single retry pass
//! - Periodic and final persistence through the report sinks
//!
//! The run moves through explicit phases (Seeding, Draining, RetryPass,
//! Done) rather than recursive self-calls, so the second chance for
//! transient failures is a bounded, observable transition. All mutation of
//! `CrawlState` and the frontier happens on the coordinator task; spawned
//! workers only fetch.

use crate::classify::{classify, contact_kind, Category};
use crate::config::Config;
use crate::crawler::extractor::extract_hrefs;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::frontier::Frontier;
use crate::report::{PageArchive, ReportSink, SqliteReportSink, TextReportSink};
use crate::resolve::{resolve, ResolvedUrl};
use crate::state::{CrawlState, StatsSnapshot};
use crate::CrawlError;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Phases of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Seeding,
    Draining,
    RetryPass,
    Done,
}

/// Main crawl coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    frontier: Frontier,
    state: CrawlState,
    sinks: Vec<Box<dyn ReportSink>>,
    archive: Option<PageArchive>,
    phase: Phase,
    /// Canonical keys currently on their second chance
    retried: HashSet<String>,
    deadline: Option<Instant>,
    started: Instant,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and the configured report sinks; the SQLite
    /// sink and the page archive are only attached when their paths are
    /// configured.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `config_hash` - Hash of the configuration file, recorded with the
    ///   run where the SQLite sink is in use
    pub fn new(config: Config, config_hash: Option<&str>) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent, &config.crawl)?;

        let mut sinks: Vec<Box<dyn ReportSink>> =
            vec![Box::new(TextReportSink::new(&config.output.stats_dir))];

        if let Some(db_path) = &config.output.database_path {
            let sink = SqliteReportSink::new(
                Path::new(db_path),
                &config.crawl.target_domain,
                config_hash,
            )?;
            sinks.push(Box::new(sink));
        }

        let archive = config
            .output
            .pages_dir
            .as_ref()
            .map(PageArchive::new);

        let state = CrawlState::new(config.crawl.target_domain.clone());

        Ok(Self {
            config,
            client,
            frontier: Frontier::new(),
            state,
            sinks,
            archive,
            phase: Phase::Idle,
            retried: HashSet::new(),
            deadline: None,
            started: Instant::now(),
        })
    }

    /// Runs the crawl to completion and returns the final snapshot
    ///
    /// The final snapshot is persisted through every sink before it is
    /// returned, so the reports on disk always reflect however far the
    /// crawl got.
    pub async fn run(&mut self) -> Result<StatsSnapshot, CrawlError> {
        self.started = Instant::now();
        self.deadline = self
            .config
            .crawl
            .max_runtime_secs
            .map(|secs| self.started + Duration::from_secs(secs));

        self.set_phase(Phase::Seeding);
        self.seed()?;

        self.set_phase(Phase::Draining);
        self.drain().await;

        if self.should_run_retry_pass() {
            self.set_phase(Phase::RetryPass);
            let entries = self.state.drain_retryable();
            tracing::info!("Retry pass: re-queueing {} unresponsive URLs", entries.len());
            for entry in entries {
                self.retried.insert(entry.url.canonical_key());
                self.frontier.requeue(entry.url);
            }
            self.drain().await;
        }

        // Anything still queued was never fetched. Re-queued retry entries
        // among them go back to the unresponsive inventory so the report
        // does not lose them.
        while let Some(url) = self.frontier.take() {
            if self.retried.contains(&url.canonical_key()) {
                self.state.record_unresponsive(&url, 1);
            }
        }

        self.set_phase(Phase::Done);
        let snapshot = self.persist_snapshot()?;

        tracing::info!(
            "Crawl completed: {} pages visited, {} links found in {:?}",
            snapshot.visited.len(),
            snapshot.total_links_found,
            self.started.elapsed()
        );

        Ok(snapshot)
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!("Phase transition: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Resolves, classifies, and offers the seed URL
    ///
    /// A seed that fails to resolve is fatal; there is nothing to crawl.
    /// The seed itself does not count as an encountered link.
    fn seed(&mut self) -> Result<(), CrawlError> {
        let url = resolve(&self.config.crawl.seed, None)?;
        let category = classify(&url, &self.config.crawl.target_domain);

        if !matches!(category, Category::Internal | Category::Subdomain) {
            tracing::warn!(
                "Seed {} is not on target domain {}; nothing will be fetched",
                url,
                self.config.crawl.target_domain
            );
        }

        self.record_discovery(&url, category);
        Ok(())
    }

    /// The retry pass runs at most once and only if there is budget left
    fn should_run_retry_pass(&self) -> bool {
        self.phase == Phase::Draining
            && self.state.unresponsive_count() > 0
            && !self.budget_exhausted(0)
            && !self.deadline_passed()
    }

    /// Drains the frontier with a bounded pool of concurrent fetches
    ///
    /// At most `workers` fetches run at once and at most one per host.
    /// The page budget (`visited + in-flight < page-limit`) and the global
    /// deadline are checked between dispatches; fetches already in flight
    /// are allowed to finish.
    async fn drain(&mut self) {
        let mut in_flight: JoinSet<(ResolvedUrl, FetchOutcome)> = JoinSet::new();
        let mut busy_hosts: HashSet<String> = HashSet::new();
        let mut deferred: VecDeque<ResolvedUrl> = VecDeque::new();

        loop {
            if !self.deadline_passed() {
                self.dispatch(&mut in_flight, &mut busy_hosts, &mut deferred);
            }

            match in_flight.join_next().await {
                Some(Ok((url, outcome))) => {
                    busy_hosts.remove(url.domain());
                    self.process_outcome(url, outcome);
                }
                Some(Err(e)) => {
                    // A worker panic loses its URL; the crawl itself goes on.
                    tracing::error!("Fetch task failed: {}", e);
                }
                None => {
                    // Nothing in flight, so no host can be busy.
                    busy_hosts.clear();
                    let nothing_pending = deferred.is_empty() && self.frontier.is_empty();
                    if nothing_pending || self.budget_exhausted(0) || self.deadline_passed() {
                        break;
                    }
                }
            }
        }

        // Politeness-deferred URLs were only parked here; hand them back.
        for url in deferred {
            self.frontier.requeue(url);
        }
    }

    /// Spawns fetches until the pool, the budget, or the frontier runs out
    fn dispatch(
        &mut self,
        in_flight: &mut JoinSet<(ResolvedUrl, FetchOutcome)>,
        busy_hosts: &mut HashSet<String>,
        deferred: &mut VecDeque<ResolvedUrl>,
    ) {
        while in_flight.len() < self.config.crawl.workers
            && !self.budget_exhausted(in_flight.len())
        {
            let url = match Self::next_ready(&mut self.frontier, deferred, busy_hosts) {
                Some(url) => url,
                None => break,
            };

            busy_hosts.insert(url.domain().to_string());
            let client = self.client.clone();
            let address = url.full_address();
            tracing::debug!("Fetching {}", address);

            in_flight.spawn(async move {
                let outcome = fetch_url(&client, &address).await;
                (url, outcome)
            });
        }
    }

    /// Picks the next URL whose host has no request in flight
    ///
    /// Previously deferred URLs are preferred to keep the order close to
    /// FIFO; fresh frontier URLs whose host is busy are parked in the
    /// deferred queue.
    fn next_ready(
        frontier: &mut Frontier,
        deferred: &mut VecDeque<ResolvedUrl>,
        busy_hosts: &HashSet<String>,
    ) -> Option<ResolvedUrl> {
        if let Some(pos) = deferred
            .iter()
            .position(|url| !busy_hosts.contains(url.domain()))
        {
            return deferred.remove(pos);
        }

        while let Some(url) = frontier.take() {
            if busy_hosts.contains(url.domain()) {
                deferred.push_back(url);
            } else {
                return Some(url);
            }
        }

        None
    }

    /// True when dispatching another fetch could exceed the page limit
    fn budget_exhausted(&self, in_flight: usize) -> bool {
        self.state.visited_count() + in_flight >= self.config.crawl.page_limit
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Applies one fetch outcome to the crawl state
    fn process_outcome(&mut self, url: ResolvedUrl, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Success { status, body } => {
                tracing::debug!("HTTP {} for {}", status, url);
                self.state.record_visited(&url);

                if let Some(archive) = &self.archive {
                    if let Err(e) = archive.store(&url.canonical_key(), &body) {
                        tracing::warn!("Failed to archive {}: {}", url, e);
                    }
                }

                match extract_hrefs(&body) {
                    Ok(hrefs) => {
                        for href in &hrefs {
                            self.handle_href(href, &url);
                        }
                    }
                    Err(e) => {
                        // The fetch succeeded, so the page stays visited.
                        tracing::warn!("Failed to parse HTML for {}: {}", url, e);
                        self.state.record_unparseable(&url);
                    }
                }

                self.after_visit();
            }

            FetchOutcome::HttpError { status } => {
                tracing::debug!("HTTP {} for {}", status, url);
                self.state.record_bad(&url);
            }

            FetchOutcome::Transport { error } => {
                let attempts = if self.retried.contains(&url.canonical_key()) {
                    2
                } else {
                    1
                };
                tracing::debug!(
                    "Transport failure for {} (attempt {}): {}",
                    url,
                    attempts,
                    error
                );
                self.state.record_unresponsive(&url, attempts);
            }
        }
    }

    /// Handles a single raw href found on a page
    fn handle_href(&mut self, raw: &str, parent: &ResolvedUrl) {
        // Every encountered href counts, duplicates included.
        self.state.count_link();

        if let Some(kind) = contact_kind(raw) {
            self.state.record_contact(kind, raw.trim());
            return;
        }

        let url = match resolve(raw, Some(parent)) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Unresolvable href {:?} on {}: {}", raw, parent, e);
                self.state.record_malformed(raw);
                return;
            }
        };

        let category = classify(&url, &self.config.crawl.target_domain);
        self.record_discovery(&url, category);
    }

    /// Offers a classified URL to the frontier and does the bookkeeping
    ///
    /// Only the first sighting of a canonical key updates the category
    /// inventories.
    fn record_discovery(&mut self, url: &ResolvedUrl, category: Category) {
        let enqueue = category.is_crawlable(self.config.crawl.crawl_subdomains);
        if !self.frontier.offer(url, enqueue) {
            return;
        }

        match category {
            Category::Internal => self.state.record_inner_page(url),
            Category::Subdomain => {
                self.state.record_subdomain(url);
                if self.config.crawl.crawl_subdomains {
                    self.state.record_inner_page(url);
                }
            }
            Category::External => self.state.record_external(url),
            Category::Document => self.state.record_document(url),
        }
    }

    /// Progress reporting and periodic persistence, keyed to visit counts
    fn after_visit(&mut self) {
        let visited = self.state.visited_count();

        if visited % self.config.crawl.progress_every == 0 {
            let rate = visited as f64 / self.started.elapsed().as_secs_f64();
            tracing::info!(
                "Progress: {} pages visited, {} links found, {} in frontier, {:.2} pages/sec",
                visited,
                self.state.total_links_found(),
                self.frontier.len(),
                rate
            );
        }

        if visited % self.config.crawl.snapshot_every == 0 {
            if let Err(e) = self.persist_snapshot() {
                tracing::warn!("Periodic snapshot failed: {}", e);
            }
        }
    }

    /// Takes a snapshot and pushes it through every sink
    fn persist_snapshot(&mut self) -> Result<StatsSnapshot, CrawlError> {
        let snapshot = self.state.snapshot();
        for sink in &mut self.sinks {
            sink.persist(&snapshot)?;
        }
        Ok(snapshot)
    }
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire crawl:
///
/// 1. Build the HTTP client and report sinks
/// 2. Seed the frontier from the configured seed URL
/// 3. Drain the frontier breadth-first with bounded concurrency
/// 4. Grant unresponsive URLs their single retry pass
/// 5. Persist the final statistics snapshot
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(StatsSnapshot)` - The final statistics of the completed crawl
/// * `Err(CrawlError)` - Setup or final persistence failed
///
/// # Example
///
/// ```no_run
/// use perimeter::config::load_config;
/// use perimeter::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let snapshot = run_crawl(config).await?;
/// println!("Visited {} pages", snapshot.visited.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<StatsSnapshot, CrawlError> {
    let mut coordinator = Coordinator::new(config, None)?;
    coordinator.run().await
}
