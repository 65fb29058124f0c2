//! Headless-browser catalog crawler
//!
//! Opens a storefront in Chrome, dismisses its popups, follows every category
//! link and collects product names and prices, all driven by locators from a
//! config file. See [`run`] for the end-to-end entry point.

pub mod actions;
pub mod browser;
pub mod browser_setup;
pub mod catalog;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod locator;
pub mod logger;
mod manager;
pub mod readiness;
pub mod sink;
mod utils;

#[cfg(test)]
mod testing;

use std::path::PathBuf;

use tracing::{Instrument, info, info_span, warn};

pub use actions::{ClickOutcome, click};
pub use browser::{BrowserError, BrowserPage, ChromePage};
pub use catalog::{Catalog, CatalogItem, normalize_price};
pub use config::{BrowserConfig, ConfigError, LocatorConfig, WindowConfig, load_config};
pub use crawler::{CrawlReport, CrawlState, Crawler, crawl};
pub use error::{CrawlError, CrawlResult};
pub use extract::{Extraction, extract_all};
pub use locator::{ExtractMode, Locator, LocatorStrategy};
pub use manager::{Session, SessionManager};
pub use readiness::await_ready;
pub use sink::{CatalogSink, FileSink, OutputFormat, SinkError};

/// Where a run reads its locators and writes its catalog
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub output_path: PathBuf,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub categories: usize,
    pub items: usize,
    pub output_path: PathBuf,
}

/// Load config, crawl in a fresh browser session and write the catalog
///
/// The session is closed on every path once it has been opened, including
/// crawl failures, Ctrl-C and SIGTERM. The output file is only touched after
/// a successful crawl.
pub async fn run(options: &RunOptions) -> CrawlResult<RunSummary> {
    run_with_shutdown(options, shutdown_signal()).await
}

/// [`run`], interrupted when `shutdown` completes instead of on OS signals
pub async fn run_with_shutdown<F>(options: &RunOptions, shutdown: F) -> CrawlResult<RunSummary>
where
    F: Future<Output = ()>,
{
    let config = load_config(&options.config_path)?;
    let sink = FileSink::new(&options.output_path);

    let span = info_span!("crawl", site = %config.entry_url);
    async move {
        let session = SessionManager::new(config.browser.clone()).open().await?;

        let outcome = crawl_until(session.page(), &config, &sink, shutdown).await;

        session.close().await;

        let report = outcome?;
        Ok(RunSummary {
            categories: report.categories_visited,
            items: report.catalog.len(),
            output_path: sink.path().to_path_buf(),
        })
    }
    .instrument(span)
    .await
}

/// Completes on Ctrl-C, or SIGTERM on Unix
///
/// A signal that cannot be listened for never fires; the crawl then runs to
/// completion instead of being aborted.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                if sigterm.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Received shutdown signal");
}

/// [`crawl_and_save`] unless `shutdown` completes first
///
/// An interrupted crawl writes nothing.
pub async fn crawl_until<P, S, F>(
    page: &P,
    config: &LocatorConfig,
    sink: &S,
    shutdown: F,
) -> CrawlResult<CrawlReport>
where
    P: BrowserPage + ?Sized,
    S: CatalogSink + ?Sized,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = crawl_and_save(page, config, sink) => result,
        () = shutdown => {
            warn!("Interrupted, shutting down browser");
            Err(CrawlError::Interrupted)
        }
    }
}

/// Crawl with `page` and hand the catalog to `sink`
pub async fn crawl_and_save<P, S>(page: &P, config: &LocatorConfig, sink: &S) -> CrawlResult<CrawlReport>
where
    P: BrowserPage + ?Sized,
    S: CatalogSink + ?Sized,
{
    let report = crawl(page, config).await?;
    sink.write(&report.catalog)?;
    info!(
        "Crawl finished: {} items from {} categories",
        report.catalog.len(),
        report.categories_visited
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDom, FakeSite, el, link};
    use std::cell::RefCell;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Default)]
    struct MemorySink {
        written: RefCell<Vec<Catalog>>,
    }

    impl CatalogSink for MemorySink {
        fn write(&self, catalog: &Catalog) -> Result<(), SinkError> {
            self.written.borrow_mut().push(catalog.clone());
            Ok(())
        }
    }

    fn config() -> LocatorConfig {
        config::parse_config(
            std::path::Path::new("config.json"),
            r#"{
                "url": "https://shop.test/",
                "pick_up_xpath": "//button[@id='pickup']",
                "ok_xpath": "//button[text()='OK']",
                "categories": "//nav//a",
                "titles": "//h3",
                "prices": "//span"
            }"#,
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn successful_crawl_is_written_once() {
        let site = FakeSite::new()
            .page(
                "https://shop.test/",
                FakeDom::new().with("//nav//a", vec![link("/burgers")]),
            )
            .page(
                "https://shop.test/burgers",
                FakeDom::new()
                    .with("//h3", vec![el("Burger")])
                    .with("//span", vec![el("990 ₸")]),
            );
        let sink = MemorySink::default();

        let report = crawl_and_save(&site, &config(), &sink).await.unwrap();

        let written = sink.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0], report.catalog);
        assert_eq!(written[0].items()[0].price, 990);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_crawl_writes_nothing() {
        let site = FakeSite::new().page("https://shop.test/", FakeDom::new().never_ready());
        let sink = MemorySink::default();

        let err = crawl_and_save(&site, &config(), &sink).await.unwrap_err();

        assert!(matches!(err, CrawlError::ReadinessTimeout { .. }));
        assert!(sink.written.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_crawl_without_writing() {
        let site = FakeSite::new().page("https://shop.test/", FakeDom::new().never_ready());
        let sink = MemorySink::default();

        let started = Instant::now();
        let err = crawl_until(
            &site,
            &config(),
            &sink,
            tokio::time::sleep(Duration::from_secs(5)),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CrawlError::Interrupted));
        assert_eq!(started.elapsed(), Duration::from_secs(5));
        assert!(sink.written.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn silent_shutdown_lets_the_crawl_finish() {
        let site = FakeSite::new()
            .page(
                "https://shop.test/",
                FakeDom::new().with("//nav//a", vec![link("/burgers")]),
            )
            .page(
                "https://shop.test/burgers",
                FakeDom::new()
                    .with("//h3", vec![el("Burger")])
                    .with("//span", vec![el("990")]),
            );
        let sink = MemorySink::default();

        let report = crawl_until(&site, &config(), &sink, std::future::pending())
            .await
            .unwrap();

        assert_eq!(report.catalog.len(), 1);
        assert_eq!(sink.written.borrow().len(), 1);
    }
}
