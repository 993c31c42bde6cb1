use std::time::Duration;
use thiserror::Error;

/// Failures of the network/rendering layer. No page was produced.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No WebDriver session could be opened
    #[error("could not connect to WebDriver at {url}: {message}")]
    Connect { url: String, message: String },

    /// The renderer reached the server but navigation or source retrieval failed
    #[error("failed {context} {url}: {message}")]
    Navigation {
        context: &'static str,
        url: String,
        message: String,
    },

    /// The render did not finish in time
    #[error("timed out after {elapsed:?} rendering {url}")]
    Timeout { url: String, elapsed: Duration },

    /// Non-2xx response from the search endpoint
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Anything that keeps a query from producing a ranked result.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The markup could not be turned into a document at all
    #[error("could not parse results page: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
