//! Collection extractor
//!
//! Reads text or an attribute from every element a locator matches. Absence
//! is an expected outcome, reported as [`Extraction::Empty`] rather than an
//! error so callers can tell "nothing here" apart from real data.

use tracing::{info, warn};

use crate::browser::BrowserPage;
use crate::locator::{ExtractMode, Locator};
use crate::utils::constants::ELEMENT_WAIT_TIMEOUT;
use crate::utils::wait_for_elements;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Values in document order
    Items(Vec<String>),
    /// Nothing could be read; the reason has already been logged
    Empty(String),
}

impl Extraction {
    pub fn len(&self) -> usize {
        match self {
            Extraction::Items(items) => items.len(),
            Extraction::Empty(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_items(self) -> Vec<String> {
        match self {
            Extraction::Items(items) => items,
            Extraction::Empty(_) => Vec::new(),
        }
    }
}

/// Wait up to 10s for `locator`, then read `mode` from each match
pub async fn extract_all<P>(page: &P, locator: &Locator, mode: &ExtractMode) -> Extraction
where
    P: BrowserPage + ?Sized,
{
    if let Err(e) = wait_for_elements(page, locator, ELEMENT_WAIT_TIMEOUT).await {
        warn!("Elements not found: {}", e);
        return Extraction::Empty(e.to_string());
    }

    match page.read_all(locator, mode).await {
        Ok(values) => {
            info!("Found {} elements for {}", values.len(), locator);
            Extraction::Items(values)
        }
        Err(e) => {
            warn!("Elements not readable: {}", e);
            Extraction::Empty(e.to_string())
        }
    }
}
