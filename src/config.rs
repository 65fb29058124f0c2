//! Crawl configuration
//!
//! The locator document names where things live on the target storefront.
//! Keys keep the names the site operators already use (`pick_up_xpath`,
//! `ok_xpath`, ...), the Rust side uses what they mean.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::locator::{Locator, LocatorStrategy};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Where to find things on the target site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Page the crawl starts from
    #[serde(rename = "url")]
    pub entry_url: String,

    /// Control clicked once on the entry page (e.g. "pick up" delivery mode)
    #[serde(rename = "pick_up_xpath")]
    pub initial_action: String,

    /// Button that dismisses a modal popup, probed on every page
    #[serde(rename = "ok_xpath")]
    pub popup_dismiss: String,

    /// Links to the category pages; their `href` is followed
    #[serde(rename = "categories")]
    pub category_links: String,

    #[serde(rename = "titles")]
    pub item_titles: String,

    #[serde(rename = "prices")]
    pub item_prices: String,

    #[serde(default)]
    pub locator_strategy: LocatorStrategy,

    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Browser launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Disable web security features (Same-Origin Policy, certificate checks)
    #[serde(default)]
    pub disable_security: bool,

    #[serde(default)]
    pub window: WindowConfig,

    /// Chrome/Chromium binary to launch instead of searching for one
    #[serde(default)]
    pub executable: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            disable_security: false,
            window: WindowConfig::default(),
            executable: None,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl LocatorConfig {
    fn locator(&self, query: &str) -> Locator {
        Locator::new(self.locator_strategy, query)
    }

    pub fn initial_action(&self) -> Locator {
        self.locator(&self.initial_action)
    }

    pub fn popup_dismiss(&self) -> Locator {
        self.locator(&self.popup_dismiss)
    }

    pub fn category_links(&self) -> Locator {
        self.locator(&self.category_links)
    }

    pub fn item_titles(&self) -> Locator {
        self.locator(&self.item_titles)
    }

    pub fn item_prices(&self) -> Locator {
        self.locator(&self.item_prices)
    }

    /// Check the invariants the crawler relies on
    ///
    /// Locator syntax is not checked; the browser is the judge of that.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.entry_url).map_err(|e| ConfigError::Invalid {
            key: "url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "url",
                reason: format!("scheme must be http or https, got {}", url.scheme()),
            });
        }

        let locators = [
            ("pick_up_xpath", &self.initial_action),
            ("ok_xpath", &self.popup_dismiss),
            ("categories", &self.category_links),
            ("titles", &self.item_titles),
            ("prices", &self.item_prices),
        ];
        for (key, value) in locators {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "locator must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Parse a config document; YAML for `.yaml`/`.yml`, JSON otherwise
pub fn parse_config(path: &Path, contents: &str) -> Result<LocatorConfig, ConfigError> {
    let parsed = if is_yaml(path) {
        serde_yaml::from_str::<LocatorConfig>(contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<LocatorConfig>(contents).map_err(|e| e.to_string())
    };

    let config = parsed.map_err(|reason| ConfigError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;
    config.validate()?;
    Ok(config)
}

/// Read and validate the config file at `path`
pub fn load_config(path: &Path) -> Result<LocatorConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &contents)
}
