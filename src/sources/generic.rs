//! Fallback extractor for hosts without a dedicated layout.

use scraper::Html;

use super::{selector, Listing};
use crate::{Candidate, Result};

/// Anchors whose `title` attribute, or text, mentions the code.
pub(super) fn parse(html: &str, listing: &Listing<'_>) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let link_selector = selector("a[href]")?;

    let mut results = Vec::new();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let title = element
            .value()
            .attr("title")
            .map(str::to_string)
            .filter(|t| listing.mentions_code(t))
            .or_else(|| {
                let text = element.text().collect::<String>();
                listing.mentions_code(&text).then_some(text)
            });

        let Some(title) = title else {
            continue;
        };
        if let Some(url) = listing.resolve(href) {
            results.push(listing.candidate(&title, url.as_str()));
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::source;
    use crate::Pool;

    #[test]
    fn test_parse_title_or_text() {
        let html = r#"
          <a href="/a" title="ABC-123 by title">thumb</a>
          <a href="/b">ABC-123 by text</a>
          <a href="/c" title="nothing">nothing</a>
        "#;
        let src = source("https://catalog.example/?q=%s", Pool::B);
        let listing = Listing::new(&src, "ABC-123", "https://catalog.example/?q=ABC-123").unwrap();
        let results = parse(html, &listing).unwrap();

        let titles: Vec<_> = results.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["ABC-123 by title", "ABC-123 by text"]);
        assert_eq!(results[1].link, "https://catalog.example/b");
    }

    #[test]
    fn test_parse_skips_unjoinable_match() {
        let html = r#"
          <a href="http://[abc-123" title="ABC-123 broken">x</a>
          <a href="/ok" title="ABC-123 fine">x</a>
        "#;
        let src = source("https://catalog.example/?q=%s", Pool::B);
        let listing = Listing::new(&src, "ABC-123", "https://catalog.example/?q=ABC-123").unwrap();
        let results = parse(html, &listing).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].link, "https://catalog.example/ok");
    }
}
