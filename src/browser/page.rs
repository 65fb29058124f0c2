//! chromiumoxide-backed implementation of [`BrowserPage`]

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;

use super::{BrowserError, BrowserPage, BrowserResult};
use crate::locator::{ExtractMode, Locator, LocatorStrategy};

/// The single tab a crawl session drives
#[derive(Clone)]
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn find(&self, locator: &Locator) -> BrowserResult<Vec<Element>> {
        let found = match locator.strategy() {
            LocatorStrategy::XPath => self.page.find_xpaths(locator.query()).await,
            LocatorStrategy::Css => self.page.find_elements(locator.query()).await,
        };

        found.map_err(|e| BrowserError::QueryFailed {
            locator: locator.to_string(),
            reason: e.to_string(),
        })
    }

    /// Close the tab. Errors are returned so the session can log them.
    pub(crate) async fn close(self) -> BrowserResult<()> {
        self.page
            .close()
            .await
            .map_err(|e| BrowserError::CloseFailed(format!("closing page: {e}")))
    }
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn goto(&self, url: &str) -> BrowserResult<()> {
        self.page
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::NavigationFailed(format!("{url}: {e}")))
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        self.page
            .url()
            .await
            .map_err(|e| BrowserError::EvaluationFailed(format!("reading page URL: {e}")))
    }

    async fn ready_state(&self) -> BrowserResult<String> {
        let value: serde_json::Value = self
            .page
            .evaluate("document.readyState")
            .await
            .map_err(|e| BrowserError::EvaluationFailed(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::EvaluationFailed(format!("readyState result: {e}")))?;

        match value {
            serde_json::Value::String(state) => Ok(state),
            other => Err(BrowserError::EvaluationFailed(format!(
                "readyState returned non-string value: {other}"
            ))),
        }
    }

    async fn count(&self, locator: &Locator) -> BrowserResult<usize> {
        Ok(self.find(locator).await?.len())
    }

    async fn click_first(&self, locator: &Locator) -> BrowserResult<()> {
        let click_err = |reason: String| BrowserError::ClickFailed {
            locator: locator.to_string(),
            reason,
        };

        let element = self
            .find(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| click_err("no matching element".to_string()))?;

        // Clicking at the element's point avoids chromiumoxide's
        // IntersectionObserver-based click hanging on overlays.
        element
            .scroll_into_view()
            .await
            .map_err(|e| click_err(format!("scroll into view: {e}")))?;
        let point = element
            .clickable_point()
            .await
            .map_err(|e| click_err(format!("element not visible: {e}")))?;
        self.page
            .click(point)
            .await
            .map_err(|e| click_err(e.to_string()))?;

        Ok(())
    }

    async fn read_all(&self, locator: &Locator, mode: &ExtractMode) -> BrowserResult<Vec<String>> {
        let elements = self.find(locator).await?;
        let mut values = Vec::with_capacity(elements.len());

        for element in &elements {
            let value = match mode {
                ExtractMode::Text => element.inner_text().await,
                ExtractMode::Attribute(name) => element.attribute(name.as_str()).await,
            }
            .map_err(|e| BrowserError::QueryFailed {
                locator: locator.to_string(),
                reason: format!("reading {mode}: {e}"),
            })?;

            values.push(value.unwrap_or_default());
        }

        Ok(values)
    }
}
