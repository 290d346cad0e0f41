use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tat_core::{Config, RetryPolicy, RunContext, Site};

/// Retry budget short enough that failing scenarios return quickly.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_millis(200),
        interval: Duration::from_millis(5),
    }
}

/// Default context with a short assertion retry budget.
pub fn fast_context() -> Result<RunContext> {
    let mut config = Config::default();
    config.retry.timeout_ms = 200;
    config.retry.interval_ms = 5;
    RunContext::new(config).context("failed to build run context")
}

/// `tests/fixtures` of this crate.
pub fn test_fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// The two-page newsletter site.
pub fn newsletter_site() -> Result<Site> {
    let path = test_fixtures_dir().join("newsletter.toml");
    Site::load(&path).with_context(|| format!("failed to load {}", path.display()))
}
