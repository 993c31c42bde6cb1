use crate::config::ScraperConfig;
use crate::error::FetchError;
use crate::renderers::Renderer;
use crate::results::RawPage;
use scraper::{Html, Selector};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

/// Fetches pages with a plain HTTP client.
///
/// Only useful when the results are present in the server response. Pages
/// that fill in results with scripts are re-fetched up to `poll_attempts`
/// times; after that the last body is returned as is. `render_timeout`
/// bounds the whole sequence, not each request.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: reqwest::Client,
    ready_selector: String,
    poll_attempts: u32,
    poll_interval: Duration,
    render_timeout: Duration,
}

impl HttpRenderer {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.render_timeout());

        if let Some(proxy) = config.proxy_url() {
            ::log::debug!("Routing HTTP renderer through proxy {}", proxy);
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        } else {
            // Only the configured proxy applies, never ambient *_PROXY variables
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            ready_selector: config.selectors.article.clone(),
            poll_attempts: config.poll_attempts.max(1),
            poll_interval: config.poll_interval(),
            render_timeout: config.render_timeout(),
        })
    }

    async fn get(&self, url: &Url, started: Instant) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    elapsed: started.elapsed(),
                }
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            ::log::error!("HTTP {} from {}", status, url);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Re-fetches `url` until result nodes show up or attempts run out
    async fn poll(&self, url: &Url, started: Instant) -> Result<RawPage, FetchError> {
        let mut body = Vec::new();

        for attempt in 1..=self.poll_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.poll_interval).await;
            }

            body = self.get(url, started).await?;
            if has_results(&body, &self.ready_selector) {
                ::log::debug!(
                    "Results present at {} after {} attempt(s), {:.2} seconds",
                    url,
                    attempt,
                    started.elapsed().as_secs_f64()
                );
                return Ok(RawPage::from_bytes(body));
            }
            ::log::debug!(
                "Attempt {}/{}: no results yet at {}",
                attempt,
                self.poll_attempts,
                url
            );
        }

        ::log::warn!(
            "No {:?} nodes at {} after {} attempts, using last response",
            self.ready_selector,
            url,
            self.poll_attempts
        );
        Ok(RawPage::from_bytes(body))
    }
}

impl Renderer for HttpRenderer {
    async fn render(&self, url: &Url) -> Result<RawPage, FetchError> {
        let started = Instant::now();

        match timeout(self.render_timeout, self.poll(url, started)).await {
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

/// Whether the body already contains result nodes. Non-text bodies are
/// passed on so parsing can report them.
fn has_results(body: &[u8], selector: &str) -> bool {
    let Ok(html) = std::str::from_utf8(body) else {
        return true;
    };
    let Ok(selector) = Selector::parse(selector) else {
        return true;
    };
    Html::parse_document(html).select(&selector).next().is_some()
}
