use crate::config::SelectorConfig;
use crate::error::ScrapeError;
use crate::parsers::articles::{MAX_CANDIDATES, NO_TITLE, extract_candidates};
use url::Url;

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://www.sciencedirect.com").unwrap()
    }

    fn article(title: &str, href: &str, citations: &str) -> String {
        format!(
            r#"<article class="result-item-content">
                <h2><a href="{href}">{title}</a></h2>
                <span class="CitationCount">{citations}</span>
            </article>"#
        )
    }

    #[test]
    fn test_extract_fields() {
        let html = format!(
            "<html><body><ol>{}</ol></body></html>",
            article("Lithium and mood", "/science/article/pii/S0165", "120")
        );
        let records = extract_candidates(&html, &SelectorConfig::default(), &base_url()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Lithium and mood");
        assert_eq!(
            records[0].link,
            "https://www.sciencedirect.com/science/article/pii/S0165"
        );
        assert_eq!(records[0].citation_count, 120);
    }

    #[test]
    fn test_extract_missing_fields_use_sentinels() {
        let html = r#"
            <article class="result-item-content"><p>no anchor, no count</p></article>
            <article class="result-item-content"><h2><a>Anchor without href</a></h2></article>
            <article class="result-item-content">
                <h2><a href="/x">Bad count</a></h2><span class="CitationCount">n/a</span>
            </article>
        "#;
        let records = extract_candidates(html, &SelectorConfig::default(), &base_url()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title, NO_TITLE);
        assert_eq!(records[0].link, "");
        assert_eq!(records[0].citation_count, 0);

        assert_eq!(records[1].title, "Anchor without href");
        assert_eq!(records[1].link, "");

        assert_eq!(records[2].link, "https://www.sciencedirect.com/x");
        assert_eq!(records[2].citation_count, 0);
    }

    #[test]
    fn test_extract_caps_at_ten_in_document_order() {
        let html = (0..15)
            .map(|i| article(&format!("Article {i}"), &format!("/a/{i}"), &i.to_string()))
            .collect::<String>();
        let records = extract_candidates(&html, &SelectorConfig::default(), &base_url()).unwrap();

        assert_eq!(records.len(), MAX_CANDIDATES);
        assert_eq!(records[0].title, "Article 0");
        assert_eq!(records[9].title, "Article 9");
        assert!(records.iter().all(|r| r.citation_count < 10));
    }

    #[test]
    fn test_extract_collapses_title_whitespace() {
        let html = r#"<article class="result-item-content">
            <h2><a href="/t">
                Bipolar <em>disorder</em>
                in adolescents
            </a></h2>
        </article>"#;
        let records = extract_candidates(html, &SelectorConfig::default(), &base_url()).unwrap();
        assert_eq!(records[0].title, "Bipolar disorder in adolescents");
    }

    #[test]
    fn test_extract_keeps_absolute_links() {
        let html = article("Elsewhere", "https://doi.org/10.1016/j.jad.2020.01.001", "3");
        let records = extract_candidates(&html, &SelectorConfig::default(), &base_url()).unwrap();
        assert_eq!(records[0].link, "https://doi.org/10.1016/j.jad.2020.01.001");
    }

    #[test]
    fn test_extract_tolerates_malformed_html() {
        let html = r#"<div><article class="result-item-content"><h2><a href="/m">Unclosed
            <span class="CitationCount"> 8 "#;
        let records = extract_candidates(html, &SelectorConfig::default(), &base_url()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link, "https://www.sciencedirect.com/m");
        assert_eq!(records[0].citation_count, 8);
    }

    #[test]
    fn test_extract_ignores_non_matching_nodes() {
        let html = r#"<article class="sponsored"><h2><a href="/ad">Ad</a></h2></article>
            <div class="result-item-content">Not an article element</div>"#;
        let records = extract_candidates(html, &SelectorConfig::default(), &base_url()).unwrap();
        assert!(records.is_empty());

        let records = extract_candidates("", &SelectorConfig::default(), &base_url()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_extract_custom_selectors() {
        let selectors = SelectorConfig {
            article: "div.gs_r".to_string(),
            title: "h3 > a".to_string(),
            citations: "span.cites".to_string(),
        };
        let html = r#"<div class="gs_r"><h3><a href="/p1">Paper</a></h3><span class="cites">17</span></div>"#;
        let records = extract_candidates(html, &selectors, &base_url()).unwrap();
        assert_eq!(records[0].title, "Paper");
        assert_eq!(records[0].citation_count, 17);
    }

    #[test]
    fn test_extract_invalid_selector() {
        let selectors = SelectorConfig {
            article: "article[".to_string(),
            ..SelectorConfig::default()
        };
        let result = extract_candidates("<html></html>", &selectors, &base_url());
        assert!(matches!(result, Err(ScrapeError::Parse(_))));
    }
}
