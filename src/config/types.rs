use serde::Deserialize;

/// Main configuration structure for Perimeter
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// The URL the traversal starts from
    pub seed: String,

    /// The domain the crawl is scoped to
    #[serde(rename = "target-domain")]
    pub target_domain: String,

    /// Maximum number of pages to fetch; 0 classifies the seed but fetches
    /// nothing
    #[serde(rename = "page-limit")]
    pub page_limit: usize,

    /// Whether discovered subdomains are crawled or only recorded
    #[serde(rename = "crawl-subdomains", default)]
    pub crawl_subdomains: bool,

    /// Number of concurrent fetch workers; 1 gives strict breadth-first
    /// order
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// TCP connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds, independent of the connect timeout
    #[serde(rename = "total-timeout-secs", default = "default_total_timeout")]
    pub total_timeout_secs: u64,

    /// Persist a stats snapshot every N visited pages
    #[serde(rename = "snapshot-every", default = "default_snapshot_every")]
    pub snapshot_every: usize,

    /// Emit a progress log line every N visited pages
    #[serde(rename = "progress-every", default = "default_progress_every")]
    pub progress_every: usize,

    /// Optional wall-clock budget for the whole run, in seconds; in-flight
    /// fetches are allowed to finish once it passes
    #[serde(rename = "max-runtime-secs", default)]
    pub max_runtime_secs: Option<u64>,
}

fn default_workers() -> usize {
    8
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_total_timeout() -> u64 {
    30
}

fn default_snapshot_every() -> usize {
    1000
}

fn default_progress_every() -> usize {
    100
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value:
    /// `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the per-category report files are written to
    #[serde(rename = "stats-dir")]
    pub stats_dir: String,

    /// Optional SQLite database path for the queryable sink
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Optional directory for archiving fetched page bodies
    #[serde(rename = "pages-dir", default)]
    pub pages_dir: Option<String>,
}
