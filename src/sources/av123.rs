//! 123av listing extractor.
//!
//! Links in `div.detail` are relative to the site's `/zh/` section.

use scraper::Html;

use super::{selector, Listing};
use crate::{Candidate, Result};

pub(super) fn parse(html: &str, listing: &Listing<'_>) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let link_selector = selector("div.detail > a[href]")?;

    let mut results = Vec::new();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !listing.mentions_code(href) {
            continue;
        }

        let url = if href.starts_with("http") {
            listing.resolve(href)
        } else {
            listing.resolve(&format!("/zh/{}", href.trim_start_matches('/')))
        };
        let Some(url) = url else {
            continue;
        };
        let title = element.text().collect::<String>();
        results.push(listing.candidate(&title, url.as_str()));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::source;
    use crate::Pool;

    #[test]
    fn test_parse_relative_links_under_section() {
        let html = r#"
        <div class="box-item">
          <div class="detail"><a href="v/abc-123">ABC-123 - title</a></div>
          <div class="detail"><a href="v/xyz-999">XYZ-999 - other</a></div>
          <div class="detail"><a href="http://[abc-123">ABC-123 - broken</a></div>
        </div>
        "#;
        let src = source("https://123av.com/zh/search?keyword=%s", Pool::B);
        let listing = Listing::new(&src, "abc-123", "https://123av.com/zh/search?keyword=abc-123").unwrap();
        let results = parse(html, &listing).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "ABC-123 - title");
        assert_eq!(results[0].link, "https://123av.com/zh/v/abc-123");
    }
}
