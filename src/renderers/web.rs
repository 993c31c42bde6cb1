use crate::config::ScraperConfig;
use crate::error::FetchError;
use crate::renderers::Renderer;
use crate::results::RawPage;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

/// Common WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Upper bound on ending a session once a render is over
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Renders pages in a real browser over WebDriver.
///
/// Every call opens its own session and closes it before returning, so one
/// renderer can serve concurrent calls. The ceiling on parallel sessions is
/// whatever the WebDriver server allows.
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    webdriver_url: String,
    capabilities: Capabilities,
    ready_selector: String,
    ready_timeout: Duration,
    render_timeout: Duration,
}

impl WebDriverRenderer {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            capabilities: build_capabilities(config),
            ready_selector: config.selectors.article.clone(),
            ready_timeout: config.ready_timeout(),
            render_timeout: config.render_timeout(),
        }
    }

    /// Capabilities sent when opening a session
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Connects to the configured WebDriver, then to the common fallbacks
    async fn connect(&self) -> Result<Client, FetchError> {
        let first_error = match self.connect_to(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                e
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS {
            if url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            // Fallback failures are not logged to avoid log spam
            if let Ok(client) = self.connect_to(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(FetchError::Connect {
            url: self.webdriver_url.clone(),
            message: first_error.to_string(),
        })
    }

    async fn connect_to(&self, url: &str) -> Result<Client, fantoccini::error::NewSessionError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities.clone());
        builder.connect(url).await
    }

    /// Navigates, waits for result nodes and reads back the rendered source
    async fn load_source(&self, client: &Client, url: &Url) -> Result<RawPage, FetchError> {
        let started = Instant::now();

        client
            .goto(url.as_str())
            .await
            .map_err(|e| navigation_error(e, "accessing", url))?;

        match client
            .wait()
            .at_most(self.ready_timeout)
            .for_element(Locator::Css(&self.ready_selector))
            .await
        {
            Ok(_) => ::log::debug!("Results rendered at {}", url),
            // A query with no hits never renders a result node
            Err(CmdError::WaitTimeout) => ::log::warn!(
                "No {:?} nodes at {} after {:?}, using page as is",
                self.ready_selector,
                url,
                self.ready_timeout
            ),
            Err(e) => return Err(navigation_error(e, "waiting for results on", url)),
        }

        let html = client
            .source()
            .await
            .map_err(|e| navigation_error(e, "getting source for", url))?;

        ::log::debug!(
            "Rendered {} ({} bytes) in {:.2} seconds",
            url,
            html.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(RawPage::from(html))
    }
}

impl Renderer for WebDriverRenderer {
    async fn render(&self, url: &Url) -> Result<RawPage, FetchError> {
        let started = Instant::now();
        let mut session = None;

        // Connecting counts against the render timeout as well
        let outcome = timeout(self.render_timeout, async {
            let client: &Client = session.insert(self.connect().await?);
            Ok::<_, FetchError>(self.load_source(client, url).await?)
        })
        .await;

        // Closed on every path; a dropped future leaves this to fantoccini's session task
        if let Some(client) = session {
            close_session(client).await;
        }

        match outcome {
            Ok(result) => result,
            Err(_) => {
                ::log::error!("Timeout rendering: {}", url);
                Err(FetchError::Timeout {
                    url: url.to_string(),
                    elapsed: started.elapsed(),
                })
            }
        }
    }
}

/// Ends a session, giving up after [`CLOSE_TIMEOUT`]
async fn close_session(client: Client) {
    match timeout(CLOSE_TIMEOUT, client.close()).await {
        Ok(Ok(())) => ::log::debug!("Closed WebDriver session"),
        Ok(Err(e)) => ::log::warn!("Failed to close WebDriver session: {}", e),
        Err(_) => ::log::warn!(
            "WebDriver did not close the session within {:?}",
            CLOSE_TIMEOUT
        ),
    }
}

/// Builds Chrome capabilities from the configured browser options and proxy
fn build_capabilities(config: &ScraperConfig) -> Capabilities {
    let mut args = Vec::new();
    if config.headless {
        args.push("--headless".to_string());
    }
    args.push("--no-sandbox".to_string());
    args.push("--disable-dev-shm-usage".to_string());
    args.push(format!("--user-agent={}", config.user_agent));

    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

    if let Some(proxy) = config.proxy_host() {
        caps.insert(
            "proxy".to_string(),
            json!({
                "proxyType": "manual",
                "httpProxy": proxy,
                "sslProxy": proxy,
            }),
        );
    }

    caps
}

/// Maps a WebDriver command failure, noting lost sessions separately
fn navigation_error(error: CmdError, context: &'static str, url: &Url) -> FetchError {
    let message = error.to_string();
    if message.contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, message);
    }
    FetchError::Navigation {
        context,
        url: url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_headless_with_user_agent() {
        let renderer = WebDriverRenderer::new(&ScraperConfig::default());
        let caps = renderer.capabilities();

        assert_eq!(caps["browserName"], "chrome");
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless")));
        assert!(args.contains(&json!("--user-agent=Mozilla/5.0")));
        assert!(!caps.contains_key("proxy"));
    }

    #[test]
    fn test_capabilities_with_proxy_and_window() {
        let config = ScraperConfig {
            headless: false,
            proxy: Some("10.0.0.2:3128".to_string()),
            ..ScraperConfig::default()
        };
        let renderer = WebDriverRenderer::new(&config);
        let caps = renderer.capabilities();

        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.contains(&json!("--headless")));
        assert_eq!(caps["proxy"]["proxyType"], "manual");
        assert_eq!(caps["proxy"]["httpProxy"], "10.0.0.2:3128");
        assert_eq!(caps["proxy"]["sslProxy"], "10.0.0.2:3128");
    }

    #[tokio::test]
    async fn test_render_timeout_covers_connect() {
        use wiremock::matchers::any;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        // A WebDriver endpoint that never answers the new-session request in time
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let config = ScraperConfig {
            webdriver_url: server.uri(),
            render_timeout_secs: 1,
            ..ScraperConfig::default()
        };
        let renderer = WebDriverRenderer::new(&config);
        let url = config.search_url("bipolar disorder").unwrap();

        let started = Instant::now();
        let result = renderer.render(&url).await;
        let elapsed = started.elapsed();

        assert!(
            matches!(result, Err(FetchError::Timeout { .. })),
            "expected timeout, got {result:?}"
        );
        assert!(elapsed < Duration::from_secs(3), "render took {elapsed:?}");
    }

    #[test]
    fn test_navigation_error_keeps_context() {
        let url = Url::parse("https://www.sciencedirect.com/search?qs=x").unwrap();
        let error = navigation_error(CmdError::WaitTimeout, "accessing", &url);
        match error {
            FetchError::Navigation { context, url, .. } => {
                assert_eq!(context, "accessing");
                assert_eq!(url, "https://www.sciencedirect.com/search?qs=x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
