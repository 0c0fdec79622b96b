//! Configuration module for Perimeter
//!
//! Loads and validates the TOML configuration that drives a crawl run:
//! the seed URL, the target domain, the page limit, and the ambient knobs
//! (timeouts, worker count, snapshot cadence, output locations).

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlConfig, OutputConfig, UserAgentConfig};
pub use validation::validate;
