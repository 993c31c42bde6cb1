use crate::config::SelectorConfig;
use crate::error::{Result, ScrapeError};
use crate::results::{CandidateRecord, RankedResult, RawPage};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Most article nodes considered per page, in document order
pub const MAX_CANDIDATES: usize = 10;

/// Title used when an article has no title anchor
pub const NO_TITLE: &str = "No Title";

/// Citation text used when an article has no citation node
const NO_CITATIONS: &str = "0";

/// Compiled form of a [`SelectorConfig`]
struct ArticleSelectors {
    article: Selector,
    title: Selector,
    citations: Selector,
}

impl ArticleSelectors {
    fn compile(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            article: compile_selector(&config.article)?,
            title: compile_selector(&config.title)?,
            citations: compile_selector(&config.citations)?,
        })
    }
}

fn compile_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Parse(format!("invalid selector {css:?}: {e}")))
}

/// Parse a results page and pick its most-cited article
pub fn extract_best(
    page: &RawPage,
    selectors: &SelectorConfig,
    base_url: &Url,
) -> Result<RankedResult> {
    let html = page.as_text()?;
    let candidates = extract_candidates(html, selectors, base_url)?;

    match select_most_cited(&candidates) {
        Some(best) => {
            ::log::debug!(
                "Most cited of {} candidates: {:?} ({} citations)",
                candidates.len(),
                best.title,
                best.citation_count
            );
            Ok(RankedResult::MostCited(best.clone()))
        }
        None => {
            ::log::info!("No article results found on page");
            Ok(RankedResult::NoArticles)
        }
    }
}

/// Extracts up to [`MAX_CANDIDATES`] article records from HTML.
///
/// Missing fields fall back to sentinels; only an invalid selector is an error.
pub fn extract_candidates(
    html: &str,
    selectors: &SelectorConfig,
    base_url: &Url,
) -> Result<Vec<CandidateRecord>> {
    let selectors = ArticleSelectors::compile(selectors)?;
    let doc = Html::parse_document(html);

    let candidates = doc
        .select(&selectors.article)
        .take(MAX_CANDIDATES)
        .map(|article| extract_record(article, &selectors, base_url))
        .collect::<Vec<_>>();

    ::log::debug!("Extracted {} candidate articles", candidates.len());
    Ok(candidates)
}

fn extract_record(
    article: ElementRef<'_>,
    selectors: &ArticleSelectors,
    base_url: &Url,
) -> CandidateRecord {
    let anchor = article.select(&selectors.title).next();

    let title = anchor
        .map(|a| collapse_whitespace(&a.text().collect::<String>()))
        .unwrap_or_else(|| NO_TITLE.to_string());

    let link = anchor
        .and_then(|a| a.value().attr("href"))
        .map(|href| resolve_link(base_url, href))
        .unwrap_or_default();

    let citation_text = article
        .select(&selectors.citations)
        .next()
        .map(|n| n.text().collect::<String>())
        .unwrap_or_else(|| NO_CITATIONS.to_string());

    CandidateRecord::new(title, link, normalize_citations(&citation_text))
}

/// Coerce citation text into a count. Anything that is not a plain
/// non-negative integer (after trimming) becomes 0.
pub fn normalize_citations(text: &str) -> u64 {
    text.trim().parse::<u64>().unwrap_or(0)
}

/// First record with the highest citation count. Later records only win
/// with a strictly greater count.
pub fn select_most_cited(candidates: &[CandidateRecord]) -> Option<&CandidateRecord> {
    let mut best: Option<&CandidateRecord> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.citation_count <= current.citation_count => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Make an href absolute against the site origin
fn resolve_link(base_url: &Url, href: &str) -> String {
    match base_url.join(href) {
        Ok(url) => url.to_string(),
        Err(e) => {
            ::log::debug!("Could not resolve link {:?}: {}", href, e);
            format!("{}{}", base_url.as_str().trim_end_matches('/'), href)
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
