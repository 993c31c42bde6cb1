//! Find the most-cited article for a topic on a scholarly search site.
//!
//! A query is rendered into a results page by a [`Renderer`], the page is
//! parsed into at most ten candidate records, and the record with the most
//! citations wins (earliest on ties).

pub mod config;
pub mod error;
pub mod fetcher;
pub mod parsers;
pub mod renderers;
pub mod results;
pub mod tool;

// Re-export commonly used types for convenience
pub use config::{ScraperConfig, SelectorConfig};
pub use error::{FetchError, ScrapeError};
pub use fetcher::Fetcher;
pub use renderers::{HttpRenderer, Renderer, WebDriverRenderer};
pub use results::{CandidateRecord, RankedResult, RawPage};
pub use tool::{MostCitedTool, ToolDefinition};

/// Looks up the most-cited article for `query` in a WebDriver-rendered
/// browser, returning the tool's text result.
pub async fn find_most_cited(config: ScraperConfig, query: &str) -> String {
    let renderer = WebDriverRenderer::new(&config);
    MostCitedTool::new(Fetcher::new(config, renderer))
        .call(query)
        .await
}
