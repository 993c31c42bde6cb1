use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// CSS selectors used to pull article records out of a results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// One node per article result
    #[serde(default = "default_article_selector")]
    pub article: String,

    /// Title anchor, relative to the article node
    #[serde(default = "default_title_selector")]
    pub title: String,

    /// Citation count text, relative to the article node
    #[serde(default = "default_citations_selector")]
    pub citations: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            article: default_article_selector(),
            title: default_title_selector(),
            citations: default_citations_selector(),
        }
    }
}

/// Configuration for fetching and ranking a search-results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Origin of the search site; relative article links resolve against it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the search endpoint
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Query-string parameter carrying the topic
    #[serde(default = "default_query_param")]
    pub query_param: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Outbound proxy, e.g. "proxy.local:3128"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Upper bound on a single render, in seconds
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,

    /// How long to wait for result nodes to show up, in seconds
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,

    /// Number of GETs the HTTP renderer makes before giving up on results appearing
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            query_param: default_query_param(),
            webdriver_url: default_webdriver_url(),
            proxy: None,
            user_agent: default_user_agent(),
            headless: default_headless(),
            render_timeout_secs: default_render_timeout_secs(),
            ready_timeout_secs: default_ready_timeout_secs(),
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply `WEBDRIVER_URL` and `PROXY` from the process environment.
    ///
    /// Only the binary calls this; library code takes the struct as given.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `WEBDRIVER_URL` and `PROXY` from `lookup`; empty values are ignored
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(webdriver_url) = lookup("WEBDRIVER_URL")
            && !webdriver_url.is_empty()
        {
            self.webdriver_url = webdriver_url;
        }
        if let Some(proxy) = lookup("PROXY")
            && !proxy.is_empty()
        {
            self.proxy = Some(proxy);
        }
        self
    }

    /// Proxy URL with a scheme, if a proxy is configured
    pub fn proxy_url(&self) -> Option<String> {
        self.proxy.as_deref().map(normalize_proxy)
    }

    /// Proxy as `host:port`, the form WebDriver capabilities expect
    pub fn proxy_host(&self) -> Option<String> {
        self.proxy_url().map(|proxy| {
            proxy
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/')
                .to_string()
        })
    }

    /// Build the results-page URL for a query. The empty query is allowed.
    pub fn search_url(&self, query: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.base_url)?.join(&self.search_path)?;
        url.query_pairs_mut().append_pair(&self.query_param, query);
        Ok(url)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Prefix `http://` onto a proxy that has no scheme
fn normalize_proxy(proxy: &str) -> String {
    if proxy.starts_with("http") {
        proxy.to_string()
    } else {
        format!("http://{proxy}")
    }
}

fn default_base_url() -> String {
    "https://www.sciencedirect.com".to_string()
}

fn default_search_path() -> String {
    "/search".to_string()
}

fn default_query_param() -> String {
    "qs".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_render_timeout_secs() -> u64 {
    45
}

fn default_ready_timeout_secs() -> u64 {
    10
}

fn default_poll_attempts() -> u32 {
    3
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_article_selector() -> String {
    "article.result-item-content".to_string()
}

fn default_title_selector() -> String {
    "h2 a".to_string()
}

fn default_citations_selector() -> String {
    "span.CitationCount".to_string()
}
