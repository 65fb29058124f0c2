//! Catalog crawler
//!
//! Drives one page through the crawl:
//!
//! ```text
//! Init → EntryLoaded → PopupChecked → CategoriesDiscovered
//!      → { Navigated → PopupChecked → ItemsExtracted } per category
//!      → Finalized
//! ```
//!
//! Navigation and readiness failures end the run, including on a category
//! page. Missing elements never do.

use tracing::{debug, info, warn};
use url::Url;

use crate::actions::click;
use crate::browser::BrowserPage;
use crate::catalog::{Catalog, pair_items};
use crate::config::LocatorConfig;
use crate::error::{CrawlError, CrawlResult};
use crate::extract::extract_all;
use crate::locator::ExtractMode;
use crate::readiness::await_ready;
use crate::utils::constants::PAGE_READY_TIMEOUT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Init,
    EntryLoaded,
    PopupChecked,
    CategoriesDiscovered,
    Navigated,
    ItemsExtracted,
    Finalized,
}

/// What a finished crawl produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub catalog: Catalog,
    pub categories_visited: usize,
}

pub struct Crawler<'a, P: BrowserPage + ?Sized> {
    page: &'a P,
    config: &'a LocatorConfig,
    state: CrawlState,
    catalog: Catalog,
}

impl<'a, P: BrowserPage + ?Sized> Crawler<'a, P> {
    pub fn new(page: &'a P, config: &'a LocatorConfig) -> Self {
        Self {
            page,
            config,
            state: CrawlState::Init,
            catalog: Catalog::new(),
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    fn advance(&mut self, next: CrawlState) {
        debug!("crawl state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the whole crawl and hand back the catalog
    pub async fn run(mut self) -> CrawlResult<CrawlReport> {
        let entry_url = self.config.entry_url.clone();
        self.navigate(&entry_url).await?;
        info!("Opened page: {}", entry_url);
        self.advance(CrawlState::EntryLoaded);

        click(self.page, &self.config.initial_action(), "pickup").await;
        await_ready(self.page, PAGE_READY_TIMEOUT).await?;
        self.dismiss_popup().await?;
        self.advance(CrawlState::PopupChecked);

        let categories = self.discover_categories().await;
        info!("Found {} categories", categories.len());
        self.advance(CrawlState::CategoriesDiscovered);

        for category in &categories {
            self.crawl_category(category).await?;
        }

        self.advance(CrawlState::Finalized);
        info!("Total items: {}", self.catalog.len());

        Ok(CrawlReport {
            catalog: self.catalog,
            categories_visited: categories.len(),
        })
    }

    async fn navigate(&self, url: &str) -> CrawlResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|source| CrawlError::Navigation {
                url: url.to_string(),
                source,
            })?;
        await_ready(self.page, PAGE_READY_TIMEOUT).await
    }

    /// Click the popup's dismiss button if, and only if, it is on the page
    ///
    /// The presence probe does not wait: most pages have no popup.
    async fn dismiss_popup(&self) -> CrawlResult<()> {
        let locator = self.config.popup_dismiss();
        let present = match self.page.count(&locator).await {
            Ok(n) => n > 0,
            Err(e) => {
                debug!("Popup probe failed, treating as absent: {}", e);
                false
            }
        };

        if present {
            click(self.page, &locator, "ok_button").await;
            await_ready(self.page, PAGE_READY_TIMEOUT).await?;
        }
        Ok(())
    }

    /// Category links as absolute URLs
    ///
    /// `href` values are resolved against the page they were found on; empty
    /// or unresolvable ones are skipped.
    async fn discover_categories(&self) -> Vec<String> {
        let hrefs = extract_all(
            self.page,
            &self.config.category_links(),
            &ExtractMode::attribute("href"),
        )
        .await
        .into_items();

        let base = self
            .page
            .current_url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| self.config.entry_url.clone());
        let base = match Url::parse(&base) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot resolve category links against {}: {}", base, e);
                return Vec::new();
            }
        };

        hrefs
            .into_iter()
            .filter_map(|href| {
                let href = href.trim();
                if href.is_empty() {
                    warn!("Skipping category link without href");
                    return None;
                }
                match base.join(href) {
                    Ok(url) => Some(url.to_string()),
                    Err(e) => {
                        warn!("Skipping unresolvable category link {}: {}", href, e);
                        None
                    }
                }
            })
            .collect()
    }

    async fn crawl_category(&mut self, url: &str) -> CrawlResult<()> {
        self.navigate(url).await?;
        info!("Opened category: {}", url);
        self.advance(CrawlState::Navigated);

        self.dismiss_popup().await?;
        self.advance(CrawlState::PopupChecked);

        let titles = extract_all(self.page, &self.config.item_titles(), &ExtractMode::Text)
            .await
            .into_items();
        let prices = extract_all(self.page, &self.config.item_prices(), &ExtractMode::Text)
            .await
            .into_items();

        if prices.len() < titles.len() {
            warn!(
                "{} titles but only {} prices on {}; unmatched items get price 0",
                titles.len(),
                prices.len(),
                url
            );
        }

        let items = pair_items(titles, &prices);
        info!("Added {} items from {}", items.len(), category_slug(url));
        self.catalog.extend(items);
        self.advance(CrawlState::ItemsExtracted);

        Ok(())
    }
}

/// Last non-empty path segment, for log lines
fn category_slug(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
}

/// Crawl with `page` and return the catalog
pub async fn crawl<P>(page: &P, config: &LocatorConfig) -> CrawlResult<CrawlReport>
where
    P: BrowserPage + ?Sized,
{
    Crawler::new(page, config).run().await
}
