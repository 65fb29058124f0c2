//! Browser process ownership
//!
//! Pairs the chromiumoxide `Browser` with its CDP handler task and the
//! temporary profile directory it was launched with.

use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{BrowserError, BrowserResult};
use crate::config::BrowserConfig;

/// Wrapper for Browser and its event handler task
///
/// The handler must be aborted once the browser is gone, otherwise it keeps
/// polling a dead websocket. `Drop` takes care of that; closing the process
/// itself is the session's job.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub(crate) fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Remove the profile directory
    ///
    /// Call only after `browser.wait()` returned; Chrome holds file locks on
    /// the profile until the process is gone.
    pub fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up browser profile: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to remove browser profile {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();

        if let Some(path) = &self.user_data_dir {
            warn!(
                "BrowserWrapper dropped without an explicit close; profile left at {}",
                path.display()
            );
        }
    }
}

/// Launch the crawl browser with a per-process profile directory
pub async fn launch_browser(config: &BrowserConfig) -> BrowserResult<BrowserWrapper> {
    let user_data_dir =
        std::env::temp_dir().join(format!("catalog_crawler_{}", std::process::id()));

    let (browser, handler) =
        crate::browser_setup::launch_browser(config, Some(user_data_dir.clone()))
            .await
            .map_err(|e| BrowserError::LaunchFailed(format!("{e:#}")))?;

    Ok(BrowserWrapper::new(browser, handler, user_data_dir))
}

/// Open the blank tab the crawl navigates in
pub async fn create_blank_page(wrapper: &BrowserWrapper) -> BrowserResult<Page> {
    wrapper
        .browser()
        .new_page("about:blank")
        .await
        .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))
}
