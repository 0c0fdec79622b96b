//! HTTP fetch adapter
//!
//! The transport boundary of the crawl: builds the HTTP client with a
//! realistic User-Agent and independent connect/total timeouts, performs
//! GET requests, and classifies every outcome into an explicit enum. No
//! error escapes as an exception-style failure; the crawl loop pattern
//! matches the outcome into its inventories.

use crate::config::{CrawlConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// HTTP 200 with a body
    Success {
        /// HTTP status code
        status: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-200 status
    HttpError {
        /// The HTTP status code
        status: u16,
    },

    /// The request never produced a response (timeout, DNS failure,
    /// connection reset)
    Transport {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client used for every fetch in a run
///
/// The User-Agent is assembled from the configuration
/// (`Name/Version (+ContactURL; ContactEmail)`); connect and total
/// timeouts are configured independently.
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawl` - The crawl configuration carrying the timeouts
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawl: &CrawlConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawl.total_timeout_secs))
        .connect_timeout(Duration::from_secs(crawl.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// Statuses other than 200 are reported as `HttpError` - per the crawl's
/// bookkeeping contract, only a 200 with a readable body counts as a
/// visit. A body that fails to download after a 200 status is reported as
/// a transport failure, since the page content never arrived.
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();

            if status != 200 {
                return FetchOutcome::HttpError { status };
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Success { status, body },
                Err(e) => FetchOutcome::Transport {
                    error: format!("body read failed: {}", e),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                e.to_string()
            };
            FetchOutcome::Transport { error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user_agent() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    fn create_test_crawl_config() -> CrawlConfig {
        CrawlConfig {
            seed: "https://example.com/".to_string(),
            target_domain: "example.com".to_string(),
            page_limit: 10,
            crawl_subdomains: false,
            workers: 2,
            connect_timeout_secs: 5,
            total_timeout_secs: 30,
            snapshot_every: 1000,
            progress_every: 100,
            max_runtime_secs: None,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_user_agent(), &create_test_crawl_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_header_value() {
        let ua = create_test_user_agent();
        assert_eq!(
            ua.header_value(),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    // Fetch outcomes are exercised against wiremock servers in the
    // integration tests.
}
