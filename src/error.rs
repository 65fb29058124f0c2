//! Fatal errors of a crawl run
//!
//! Only these cross component boundaries. Missing elements, failed clicks and
//! teardown problems are logged where they happen and never show up here.

use thiserror::Error;

use crate::browser::BrowserError;
use crate::config::ConfigError;
use crate::sink::SinkError;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser session could not be started: {0}")]
    SessionInit(#[source] BrowserError),

    #[error("Page did not become ready within {timeout_ms}ms (readyState: {last_state}): {url}")]
    ReadinessTimeout {
        url: String,
        timeout_ms: u128,
        last_state: String,
    },

    #[error("Could not navigate to {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("Failed to write catalog: {0}")]
    Sink(#[from] SinkError),

    #[error("Crawl interrupted")]
    Interrupted,
}

pub type CrawlResult<T> = Result<T, CrawlError>;
