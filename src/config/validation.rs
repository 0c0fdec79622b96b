use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
///
/// Checks, in order:
/// - the seed parses as an absolute http(s) URL
/// - the target domain is a bare host (no scheme, no path)
/// - worker count, timeouts, and report intervals are non-zero
/// - user agent fields are non-empty
///
/// The page limit may be zero: that is a legitimate "classify the seed,
/// fetch nothing" run.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seed(&config.crawl.seed)?;
    validate_target_domain(&config.crawl.target_domain)?;

    if config.crawl.workers == 0 {
        return Err(ConfigError::Validation(
            "workers must be at least 1".to_string(),
        ));
    }

    if config.crawl.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.crawl.total_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "total-timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.crawl.snapshot_every == 0 {
        return Err(ConfigError::Validation(
            "snapshot-every must be at least 1".to_string(),
        ));
    }

    if config.crawl.progress_every == 0 {
        return Err(ConfigError::Validation(
            "progress-every must be at least 1".to_string(),
        ));
    }

    if config.crawl.max_runtime_secs == Some(0) {
        return Err(ConfigError::Validation(
            "max-runtime-secs must be at least 1 when set".to_string(),
        ));
    }

    validate_user_agent(config)?;

    if config.output.stats_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "stats-dir must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed URL: absolute, http or https, with a host
fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    let url =
        Url::parse(seed).map_err(|e| ConfigError::InvalidSeed(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidSeed(format!(
            "{}: only http and https seeds are supported",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidSeed(format!("{}: missing host", seed)));
    }

    Ok(())
}

/// Validates the target domain: a bare host name, nothing more
fn validate_target_domain(domain: &str) -> Result<(), ConfigError> {
    if domain.trim().is_empty() {
        return Err(ConfigError::InvalidDomain(
            "target-domain must not be empty".to_string(),
        ));
    }

    if domain.contains("://") {
        return Err(ConfigError::InvalidDomain(format!(
            "{}: must not carry a scheme",
            domain
        )));
    }

    if domain.contains('/') {
        return Err(ConfigError::InvalidDomain(format!(
            "{}: must not contain a path",
            domain
        )));
    }

    Ok(())
}

fn validate_user_agent(config: &Config) -> Result<(), ConfigError> {
    let ua = &config.user_agent;
    for (field, value) in [
        ("crawler-name", &ua.crawler_name),
        ("crawler-version", &ua.crawler_version),
        ("contact-url", &ua.contact_url),
        ("contact-email", &ua.contact_email),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "user-agent {} must not be empty",
                field
            )));
        }
    }
    Ok(())
}
