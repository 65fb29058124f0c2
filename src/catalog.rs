//! Catalog records and price normalization

use serde::{Deserialize, Serialize};

/// One product as it appears in the output artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub price: u64,
}

impl CatalogItem {
    /// Build an item from raw page text, normalizing the price
    ///
    /// A missing price source yields price 0.
    pub fn from_source(name: impl Into<String>, price_source: Option<&str>) -> Self {
        Self {
            name: name.into(),
            price: price_source.map_or(0, normalize_price),
        }
    }
}

/// Products in category discovery order, then page order within a category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: CatalogItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = CatalogItem>) {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CatalogItem> {
        self.items
    }
}

impl FromIterator<CatalogItem> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Turn storefront price text into a whole number
///
/// Every non-digit is dropped ("1 234 ₸" → 1234). Text with no digits, or a
/// digit run too long for `u64`, becomes 0.
pub fn normalize_price(source: &str) -> u64 {
    let digits: String = source.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Pair titles with prices by position
///
/// Titles drive the length. Prices beyond the title count are ignored; titles
/// without a price get 0. Both lists must come from the same page state:
/// there is no key tying a price to its title, only document order.
pub fn pair_items(titles: Vec<String>, prices: &[String]) -> Vec<CatalogItem> {
    titles
        .into_iter()
        .enumerate()
        .map(|(i, name)| CatalogItem::from_source(name, prices.get(i).map(String::as_str)))
        .collect()
}
