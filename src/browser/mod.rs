//! Browser infrastructure for launching Chrome and driving a single page
//!
//! The crawl logic only sees [`BrowserPage`]; [`ChromePage`] is the production
//! implementation over a chromiumoxide page.

mod page;
mod wrapper;

pub use crate::browser_setup::{download_managed_browser, find_browser_executable};
pub use page::ChromePage;
pub use wrapper::{BrowserWrapper, create_blank_page, launch_browser};

use async_trait::async_trait;
use thiserror::Error;

use crate::locator::{ExtractMode, Locator};

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Element query failed for {locator}: {reason}")]
    QueryFailed { locator: String, reason: String },

    #[error("Click failed for {locator}: {reason}")]
    ClickFailed { locator: String, reason: String },

    #[error("Shutdown failed: {0}")]
    CloseFailed(String),
}

pub type BrowserResult<T> = Result<T, BrowserError>;

/// The operations the crawler needs from one live browser tab
///
/// Every call is a suspend point; callers never issue two at once.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Start loading `url` in this tab
    async fn goto(&self, url: &str) -> BrowserResult<()>;

    /// URL of the currently loaded document, after redirects
    async fn current_url(&self) -> BrowserResult<Option<String>>;

    /// Current `document.readyState` value
    async fn ready_state(&self) -> BrowserResult<String>;

    /// Number of elements currently matching `locator`, without waiting
    async fn count(&self, locator: &Locator) -> BrowserResult<usize>;

    /// Click the first element matching `locator`
    async fn click_first(&self, locator: &Locator) -> BrowserResult<()>;

    /// Read `mode` from every element matching `locator`, in document order
    async fn read_all(&self, locator: &Locator, mode: &ExtractMode) -> BrowserResult<Vec<String>>;
}
