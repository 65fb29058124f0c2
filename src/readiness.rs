//! Page readiness gate
//!
//! Blocks until `document.readyState` reports `complete`. A page that never
//! settles is fatal for the run; extraction against a half-loaded DOM would
//! produce garbage.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::browser::BrowserPage;
use crate::error::CrawlError;
use crate::utils::constants::{INITIAL_POLL_INTERVAL, MAX_POLL_INTERVAL};

const READY_STATE_COMPLETE: &str = "complete";

/// Poll the page's readiness signal until it is `complete` or `timeout` elapses
///
/// Evaluation errors count as "not ready": while a navigation commits, the
/// old execution context is torn down and `evaluate` can fail transiently.
/// A poll that hangs is cut off at the deadline, so `timeout` is a hard
/// ceiling.
pub async fn await_ready<P>(page: &P, timeout: Duration) -> Result<(), CrawlError>
where
    P: BrowserPage + ?Sized,
{
    let start = Instant::now();
    let mut poll_interval = INITIAL_POLL_INTERVAL;
    let mut last_state = String::from("unknown");

    loop {
        let remaining = timeout.saturating_sub(start.elapsed());
        match tokio::time::timeout(remaining, page.ready_state()).await {
            Ok(Ok(state)) if state == READY_STATE_COMPLETE => {
                debug!("Page ready after {}ms", start.elapsed().as_millis());
                return Ok(());
            }
            Ok(Ok(state)) => last_state = state,
            Ok(Err(e)) => {
                debug!("readyState unavailable: {}", e);
                last_state = String::from("unavailable");
            }
            Err(_) => {
                debug!("readyState did not answer within {}ms", remaining.as_millis());
                last_state = String::from("unresponsive");
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            let url = page.current_url().await.ok().flatten().unwrap_or_default();
            return Err(CrawlError::ReadinessTimeout {
                url,
                timeout_ms: timeout.as_millis(),
                last_state,
            });
        }

        tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
        poll_interval = (poll_interval * 2).min(MAX_POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDom, FakeSite};

    const URL: &str = "https://shop.test/";

    #[tokio::test(start_paused = true)]
    async fn complete_page_passes_on_first_poll() {
        let site = FakeSite::new().page(URL, FakeDom::new());
        site.open(URL);

        await_ready(&site, Duration::from_secs(30)).await.unwrap();
        assert_eq!(site.ready_polls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_polling_while_loading() {
        let site = FakeSite::new().page(URL, FakeDom::new().loading_for(3));
        site.open(URL);

        let started = Instant::now();
        await_ready(&site, Duration::from_secs(30)).await.unwrap();

        assert_eq!(site.ready_polls(), 4);
        assert_eq!(started.elapsed(), Duration::from_millis(100 + 200 + 400));
    }

    #[tokio::test(start_paused = true)]
    async fn never_ready_page_times_out() {
        let site = FakeSite::new().page(URL, FakeDom::new().never_ready());
        site.open(URL);

        let err = await_ready(&site, Duration::from_secs(30)).await.unwrap_err();
        match err {
            CrawlError::ReadinessTimeout {
                url,
                timeout_ms,
                last_state,
            } => {
                assert_eq!(url, URL);
                assert_eq!(timeout_ms, 30_000);
                assert_eq!(last_state, "loading");
            }
            other => panic!("expected readiness timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn evaluation_errors_count_as_not_ready() {
        let site = FakeSite::new().page(URL, FakeDom::new().unavailable_for(2));
        site.open(URL);

        let started = Instant::now();
        await_ready(&site, Duration::from_secs(30)).await.unwrap();

        assert_eq!(site.ready_polls(), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(100 + 200));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_poll_cannot_stretch_the_deadline() {
        let site = FakeSite::new().page(
            URL,
            FakeDom::new()
                .never_ready()
                .responds_after(Duration::from_secs(29)),
        );
        site.open(URL);

        let started = Instant::now();
        let err = await_ready(&site, Duration::from_secs(30)).await.unwrap_err();

        assert_eq!(started.elapsed(), Duration::from_secs(30));
        assert!(matches!(
            err,
            CrawlError::ReadinessTimeout { ref last_state, .. } if last_state == "unresponsive"
        ));
    }
}
