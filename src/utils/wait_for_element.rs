//! Element polling for pages that render after the load event
//!
//! Storefronts typically fill their menus from JavaScript, so a locator that
//! matches nothing right after `readyState == "complete"` may still match a
//! moment later.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::browser::BrowserPage;
use crate::locator::Locator;
use crate::utils::constants::{INITIAL_POLL_INTERVAL, MAX_POLL_INTERVAL};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no element matched {locator} within {waited_ms}ms")]
pub struct ElementWaitError {
    pub locator: String,
    pub waited_ms: u128,
    pub last_error: Option<String>,
}

/// Poll until `locator` matches at least one element
///
/// Returns the number of matches seen on the successful poll. Query errors
/// are treated as "not there yet" because the DOM may be mid-update. A query
/// still pending at the deadline is abandoned.
///
/// Polling starts at 100ms and doubles up to a 1s ceiling.
pub async fn wait_for_elements<P>(
    page: &P,
    locator: &Locator,
    timeout: Duration,
) -> Result<usize, ElementWaitError>
where
    P: BrowserPage + ?Sized,
{
    let start = Instant::now();
    let mut poll_interval = INITIAL_POLL_INTERVAL;
    let mut last_error = None;

    loop {
        let remaining = timeout.saturating_sub(start.elapsed());
        match tokio::time::timeout(remaining, page.count(locator)).await {
            Ok(Ok(n)) if n > 0 => return Ok(n),
            Ok(Ok(_)) => {}
            Ok(Err(e)) => last_error = Some(e.to_string()),
            Err(_) => {
                last_error = Some(format!("query did not answer within {}ms", remaining.as_millis()))
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(ElementWaitError {
                locator: locator.to_string(),
                waited_ms: elapsed.as_millis(),
                last_error,
            });
        }

        tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
        poll_interval = (poll_interval * 2).min(MAX_POLL_INTERVAL);
    }
}
