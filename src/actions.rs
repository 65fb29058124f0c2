//! Interactive action layer
//!
//! Clicks are best effort. A missing "pick up" button or an unclickable
//! overlay must not abort a crawl, so failures come back as
//! [`ClickOutcome::Skipped`] after being logged.

use tracing::{error, info};

use crate::browser::BrowserPage;
use crate::locator::Locator;
use crate::utils::constants::ELEMENT_WAIT_TIMEOUT;
use crate::utils::wait_for_elements;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Clicked,
    Skipped(String),
}

impl ClickOutcome {
    pub fn is_clicked(&self) -> bool {
        matches!(self, ClickOutcome::Clicked)
    }
}

/// Wait up to 10s for `locator`, then click the first match
///
/// `label` names the control in log lines.
pub async fn click<P>(page: &P, locator: &Locator, label: &str) -> ClickOutcome
where
    P: BrowserPage + ?Sized,
{
    if let Err(e) = wait_for_elements(page, locator, ELEMENT_WAIT_TIMEOUT).await {
        error!("Failed to click {}: {}", label, e);
        return ClickOutcome::Skipped(e.to_string());
    }

    match page.click_first(locator).await {
        Ok(()) => {
            info!("Clicked element: {}", label);
            ClickOutcome::Clicked
        }
        Err(e) => {
            error!("Failed to click {}: {}", label, e);
            ClickOutcome::Skipped(e.to_string())
        }
    }
}
