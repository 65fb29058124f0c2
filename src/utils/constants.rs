//! Fixed timing and identity constants for browser operations
//!
//! Timeouts are per operation kind and are not configurable per call.

use std::time::Duration;

/// Chrome user agent string sent by the headless browser
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// How long a click or extraction waits for its locator to resolve
pub const ELEMENT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a page may take to report `document.readyState == "complete"`
pub const PAGE_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// CDP request timeout, which also bounds `Page::goto`
pub const NAVIGATION_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// First polling interval for element and readiness waits
pub const INITIAL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polling interval ceiling; backoff doubles up to this
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(1);
