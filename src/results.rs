use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Markup of a rendered search-results page, as handed over by a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    bytes: Vec<u8>,
}

impl RawPage {
    /// Wrap raw response bytes (may not be valid text)
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// View the page as text, failing if it is not UTF-8
    pub fn as_text(&self) -> Result<&str> {
        std::str::from_utf8(&self.bytes)
            .map_err(|e| ScrapeError::Parse(format!("page is not valid UTF-8 text: {e}")))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<String> for RawPage {
    fn from(markup: String) -> Self {
        Self {
            bytes: markup.into_bytes(),
        }
    }
}

impl From<&str> for RawPage {
    fn from(markup: &str) -> Self {
        Self::from(markup.to_string())
    }
}

/// One article summary extracted from a results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Article title, or "No Title"
    pub title: String,

    /// Absolute article URL, or empty when the page had no href
    pub link: String,

    /// Normalized citation count
    pub citation_count: u64,
}

impl CandidateRecord {
    pub fn new(title: String, link: String, citation_count: u64) -> Self {
        Self {
            title,
            link,
            citation_count,
        }
    }
}

/// Outcome of ranking one results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankedResult {
    /// The record with the highest citation count (earliest on ties)
    MostCited(CandidateRecord),

    /// The page held no article results
    NoArticles,
}

impl RankedResult {
    pub fn record(&self) -> Option<&CandidateRecord> {
        match self {
            RankedResult::MostCited(record) => Some(record),
            RankedResult::NoArticles => None,
        }
    }
}

impl fmt::Display for RankedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankedResult::MostCited(record) => write!(
                f,
                "{} ({} citations): {}",
                record.title, record.citation_count, record.link
            ),
            RankedResult::NoArticles => f.write_str("No articles found."),
        }
    }
}
