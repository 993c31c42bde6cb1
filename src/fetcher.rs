use crate::config::ScraperConfig;
use crate::error::{FetchError, Result};
use crate::parsers;
use crate::renderers::Renderer;
use crate::results::{RankedResult, RawPage};
use url::Url;

/// Runs one query through a renderer and ranks the resulting page.
///
/// Holds no per-query state; concurrent calls on one `Fetcher` are fine as
/// long as the renderer allows them.
#[derive(Debug, Clone)]
pub struct Fetcher<R> {
    config: ScraperConfig,
    renderer: R,
}

impl<R: Renderer> Fetcher<R> {
    pub fn new(config: ScraperConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Renders the results page for `query`. One render call, no retries.
    pub async fn fetch(&self, query: &str) -> std::result::Result<RawPage, FetchError> {
        let url = self.config.search_url(query)?;
        ::log::info!("Fetching results page: {}", url);

        let page = self.renderer.render(&url).await?;
        ::log::debug!("Received {} bytes from {}", page.len(), url);
        Ok(page)
    }

    /// Fetches the results page for `query` and picks its most-cited article
    pub async fn find_most_cited(&self, query: &str) -> Result<RankedResult> {
        let page = self.fetch(query).await?;
        let base_url = Url::parse(&self.config.base_url).map_err(FetchError::from)?;
        parsers::extract_best(&page, &self.config.selectors, &base_url)
    }
}
