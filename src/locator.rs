//! Element locators and extraction modes
//!
//! A locator is an opaque query string handed to the browser as-is. The crawler
//! never inspects its syntax; the strategy only decides which query engine the
//! page evaluates it with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query engine used to resolve locator strings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorStrategy {
    /// XPath expressions (the config keys are named `*_xpath` for this reason)
    #[default]
    XPath,
    /// CSS selectors
    Css,
}

/// A query identifying zero or more elements on the loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    strategy: LocatorStrategy,
    query: String,
}

impl Locator {
    pub fn new(strategy: LocatorStrategy, query: impl Into<String>) -> Self {
        Self {
            strategy,
            query: query.into(),
        }
    }

    pub fn xpath(query: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::XPath, query)
    }

    pub fn css(query: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Css, query)
    }

    pub fn strategy(&self) -> LocatorStrategy {
        self.strategy
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            LocatorStrategy::XPath => write!(f, "xpath:{}", self.query),
            LocatorStrategy::Css => write!(f, "css:{}", self.query),
        }
    }
}

/// What to read from each matched element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractMode {
    /// Rendered text content
    Text,
    /// Value of the named attribute; absent attributes read as an empty string
    Attribute(String),
}

impl ExtractMode {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractMode::Text => f.write_str("text"),
            ExtractMode::Attribute(name) => write!(f, "@{name}"),
        }
    }
}
