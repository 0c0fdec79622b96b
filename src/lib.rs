//! Perimeter: a domain-scoped web crawler
//!
//! This crate implements a breadth-first crawler that walks every link
//! reachable from a seed URL, classifies each discovered URL by its
//! relationship to a target domain, and produces de-duplicated link
//! inventories plus aggregate statistics.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod frontier;
pub mod report;
pub mod resolve;
pub mod state;

use thiserror::Error;

/// Main error type for Perimeter operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("Invalid target domain: {0}")]
    InvalidDomain(String),
}

/// URL resolution errors
///
/// `EmptyHref` and `MissingContext` are input errors and fail fast at the
/// resolver boundary; the crawl loop converts them into inventory entries
/// rather than letting them abort the traversal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Empty href with no parent to resolve against")]
    EmptyHref,

    #[error("Relative href {0:?} requires a parent URL")]
    MissingContext(String),

    #[error("Unsupported scheme in href: {0}")]
    UnsupportedScheme(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Link extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTML could not be parsed: {0}")]
    Parse(String),
}

/// Report sink errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for Perimeter operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL resolution
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

// Re-export commonly used types
pub use classify::{classify, contact_kind, Category, ContactKind};
pub use config::Config;
pub use frontier::Frontier;
pub use resolve::{resolve, ResolvedUrl};
pub use state::{CrawlState, StatsSnapshot};
