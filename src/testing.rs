//! Scripted in-memory site for exercising the crawl without a browser
//!
//! Each page is a map from locator query to the elements it matches. Every
//! call the crawler makes is recorded so tests can assert on what was (and
//! was not) done.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{BrowserError, BrowserPage, BrowserResult};
use crate::locator::{ExtractMode, Locator};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    text: String,
    attrs: HashMap<String, String>,
}

/// Element with rendered text
pub fn el(text: &str) -> FakeElement {
    FakeElement {
        text: text.to_string(),
        attrs: HashMap::new(),
    }
}

/// Anchor with an `href` attribute
pub fn link(href: &str) -> FakeElement {
    FakeElement {
        text: String::new(),
        attrs: HashMap::from([("href".to_string(), href.to_string())]),
    }
}

/// Element without any attributes or text
pub fn bare() -> FakeElement {
    FakeElement::default()
}

#[derive(Debug, Clone, Default)]
pub struct FakeDom {
    elements: HashMap<String, Vec<FakeElement>>,
    /// count() calls that return zero before the query starts matching
    late: HashMap<String, usize>,
    /// ready_state() calls answered with "loading" before "complete"
    loading_polls: usize,
    never_ready: bool,
    /// ready_state() calls that fail before the page can be evaluated
    unavailable_polls: usize,
    /// How long ready_state() and count() take to answer
    latency: Duration,
    broken_clicks: HashSet<String>,
    dismissed_by_click: HashSet<String>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(query.to_string(), elements);
        self
    }

    pub fn with_late(mut self, query: &str, elements: Vec<FakeElement>, misses: usize) -> Self {
        self.late.insert(query.to_string(), misses);
        self.with(query, elements)
    }

    /// Clicking `query` removes its elements, like a modal's OK button
    pub fn dismissable(mut self, query: &str, elements: Vec<FakeElement>) -> Self {
        self.dismissed_by_click.insert(query.to_string());
        self.with(query, elements)
    }

    pub fn loading_for(mut self, polls: usize) -> Self {
        self.loading_polls = polls;
        self
    }

    pub fn never_ready(mut self) -> Self {
        self.never_ready = true;
        self
    }

    /// Fail the next `polls` readiness checks, as a destroyed execution
    /// context does mid-navigation
    pub fn unavailable_for(mut self, polls: usize) -> Self {
        self.unavailable_polls = polls;
        self
    }

    pub fn responds_after(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn click_fails(mut self, query: &str) -> Self {
        self.broken_clicks.insert(query.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Goto(String),
    ReadyState(String),
    Count(String),
    Click(String),
    Read(String),
}

#[derive(Default)]
struct SiteState {
    current: Option<String>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeSite {
    pages: Mutex<HashMap<String, FakeDom>>,
    state: Mutex<SiteState>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, dom: FakeDom) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), dom);
        self
    }

    /// Load `url` without recording a navigation
    pub fn open(&self, url: &str) {
        self.state.lock().unwrap().current = Some(url.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Click(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    pub fn visited(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Goto(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn count_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Count(_)))
            .count()
    }

    pub fn ready_polls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ReadyState(_)))
            .count()
    }

    fn record(&self, call: Call) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.current.clone()
    }

    fn current_dom<T>(&self, current: Option<String>, f: impl FnOnce(&mut FakeDom) -> T) -> BrowserResult<T> {
        let url = current.ok_or_else(|| BrowserError::EvaluationFailed("no page loaded".into()))?;
        let mut pages = self.pages.lock().unwrap();
        let dom = pages
            .get_mut(&url)
            .ok_or_else(|| BrowserError::EvaluationFailed(format!("no fake page for {url}")))?;
        Ok(f(dom))
    }

    /// Sleep for the current page's configured latency
    async fn lag(&self, current: Option<&str>) {
        let latency = current
            .and_then(|url| self.pages.lock().unwrap().get(url).map(|dom| dom.latency))
            .unwrap_or_default();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl BrowserPage for FakeSite {
    async fn goto(&self, url: &str) -> BrowserResult<()> {
        self.record(Call::Goto(url.to_string()));
        if !self.pages.lock().unwrap().contains_key(url) {
            return Err(BrowserError::NavigationFailed(format!("{url}: net::ERR_NAME_NOT_RESOLVED")));
        }
        self.open(url);
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        Ok(self.state.lock().unwrap().current.clone())
    }

    async fn ready_state(&self) -> BrowserResult<String> {
        let current = self.record(Call::ReadyState(String::new()));
        self.lag(current.as_deref()).await;
        self.current_dom(current, |dom| {
            if dom.unavailable_polls > 0 {
                dom.unavailable_polls -= 1;
                Err(BrowserError::EvaluationFailed(
                    "Execution context was destroyed".into(),
                ))
            } else if dom.never_ready {
                Ok("loading".to_string())
            } else if dom.loading_polls > 0 {
                dom.loading_polls -= 1;
                Ok("interactive".to_string())
            } else {
                Ok("complete".to_string())
            }
        })?
    }

    async fn count(&self, locator: &Locator) -> BrowserResult<usize> {
        let current = self.record(Call::Count(locator.query().to_string()));
        self.lag(current.as_deref()).await;
        self.current_dom(current, |dom| {
            if let Some(misses) = dom.late.get_mut(locator.query())
                && *misses > 0
            {
                *misses -= 1;
                return 0;
            }
            dom.elements.get(locator.query()).map_or(0, Vec::len)
        })
    }

    async fn click_first(&self, locator: &Locator) -> BrowserResult<()> {
        let query = locator.query().to_string();
        let current = self.record(Call::Click(query.clone()));
        self.current_dom(current, |dom| {
            let present = dom.elements.get(&query).is_some_and(|e| !e.is_empty());
            if !present || dom.broken_clicks.contains(&query) {
                return Err(BrowserError::ClickFailed {
                    locator: locator.to_string(),
                    reason: "element is not clickable".into(),
                });
            }
            if dom.dismissed_by_click.contains(&query) {
                dom.elements.remove(&query);
            }
            Ok(())
        })?
    }

    async fn read_all(&self, locator: &Locator, mode: &ExtractMode) -> BrowserResult<Vec<String>> {
        let current = self.record(Call::Read(locator.query().to_string()));
        self.current_dom(current, |dom| {
            dom.elements
                .get(locator.query())
                .map(|elements| {
                    elements
                        .iter()
                        .map(|e| match mode {
                            ExtractMode::Text => e.text.clone(),
                            ExtractMode::Attribute(name) => {
                                e.attrs.get(name).cloned().unwrap_or_default()
                            }
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
    }
}
