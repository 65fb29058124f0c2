//! Browser session lifecycle
//!
//! A run owns exactly one [`Session`]. Opening launches Chrome and a blank
//! tab; [`Session::close`] consumes the session, so it can only be closed once,
//! and never fails: teardown problems are logged and swallowed so they cannot
//! hide the error that ended the crawl.
//!
//! If a session is dropped without `close` (panic, aborted task), the
//! `BrowserWrapper` drop aborts the CDP handler and chromiumoxide kills the
//! child process, leaving only the profile directory behind.

use tracing::{info, warn};

use crate::browser::{self, BrowserWrapper, ChromePage};
use crate::config::BrowserConfig;
use crate::error::CrawlError;

/// Launches browser sessions with a fixed configuration
#[derive(Debug, Clone)]
pub struct SessionManager {
    config: BrowserConfig,
}

impl SessionManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// Launch the browser and open the tab the crawl will drive
    ///
    /// # Errors
    /// [`CrawlError::SessionInit`] if no browser can be found, downloaded or
    /// started, or if the initial tab cannot be created.
    pub async fn open(&self) -> Result<Session, CrawlError> {
        let mut wrapper = browser::launch_browser(&self.config)
            .await
            .map_err(CrawlError::SessionInit)?;

        let page = match browser::create_blank_page(&wrapper).await {
            Ok(page) => page,
            Err(e) => {
                shutdown_browser(&mut wrapper).await;
                return Err(CrawlError::SessionInit(e));
            }
        };

        info!(
            "Browser initialized ({} mode)",
            if self.config.headless { "headless" } else { "headed" }
        );

        Ok(Session {
            wrapper,
            page: ChromePage::new(page),
        })
    }
}

/// One live browser instance and its single tab
pub struct Session {
    wrapper: BrowserWrapper,
    page: ChromePage,
}

impl Session {
    /// The tab to crawl with; borrowed, so it cannot outlive the session
    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    /// Terminate the browser and release its resources
    pub async fn close(self) {
        let Session { mut wrapper, page } = self;

        if let Err(e) = page.close().await {
            warn!("Failed to close page cleanly: {}", e);
        }
        shutdown_browser(&mut wrapper).await;
        drop(wrapper);

        info!("Browser closed");
    }
}

/// close → wait → remove profile
///
/// `close()` alone leaves a zombie process; `wait()` must complete before the
/// profile directory can be deleted.
async fn shutdown_browser(wrapper: &mut BrowserWrapper) {
    if let Err(e) = wrapper.browser_mut().close().await {
        warn!("Failed to close browser cleanly: {}", e);
    }
    if let Err(e) = wrapper.browser_mut().wait().await {
        warn!("Failed to wait for browser exit: {}", e);
    }
    wrapper.cleanup_temp_dir();
}
