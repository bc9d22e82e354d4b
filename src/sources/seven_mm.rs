//! 7mmtv listing extractor.

use regex::Regex;
use scraper::Html;

use super::{selector, Listing};
use crate::{Candidate, CandidateTag, Result};

/// Detail pages live under `/<lang>/<category>_content/<id>/<slug>.html`.
const DETAIL_PATH: &str = r"^/zh/[^/]+_content/[^/]*/.*\.html$";

pub(super) fn parse(html: &str, listing: &Listing<'_>) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let link_selector = selector("a[href]")?;
    let detail_path = Regex::new(DETAIL_PATH)?;

    let mut results = Vec::new();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = listing.resolve(href) else {
            continue;
        };
        if !detail_path.is_match(url.path()) || !listing.mentions_code(url.as_str()) {
            continue;
        }

        let title = element.text().collect::<String>();
        let mut candidate = listing.candidate(&title, url.as_str());
        if listing.tags_apply() {
            if url.as_str().contains("chinese") {
                candidate = candidate.with_tag(CandidateTag::ChineseSubtitles);
            }
            if url.as_str().contains("reducing") {
                candidate = candidate.with_tag(CandidateTag::Decensored);
            }
        }
        results.push(candidate);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::source;
    use crate::Pool;

    const PAGE: &str = r#"
    <html><body>
      <a href="https://">share</a>
      <a href="https://7mmtv.sx/zh/chinese_content/51234/ABC-123.html">ABC-123 subtitled</a>
      <a href="https://7mmtv.sx/zh/reducing_content/51235/ABC-123.html"> ABC-123 leaked </a>
      <a href="https://7mmtv.sx/zh/censored_content/51236/XYZ-999.html">XYZ-999</a>
      <a href="https://7mmtv.sx/zh/searchform_search/all/index.html">search</a>
    </body></html>
    "#;

    fn run(pool: Pool) -> Vec<Candidate> {
        let src = source("https://7mmtv.sx/zh/searchform_search/all/index.html?search_keyword=%s", pool);
        let listing = Listing::new(&src, "abc-123", "https://7mmtv.sx/zh/searchform_search/all/index.html").unwrap();
        parse(PAGE, &listing).unwrap()
    }

    #[test]
    fn test_parse_matches_detail_links_with_code() {
        let results = run(Pool::A);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "ABC-123 subtitled");
        assert_eq!(results[1].title, "ABC-123 leaked");
        assert_eq!(
            results[1].link,
            "https://7mmtv.sx/zh/reducing_content/51235/ABC-123.html"
        );
    }

    #[test]
    fn test_parse_tags_pool_a() {
        let results = run(Pool::A);
        assert_eq!(results[0].tags, vec![CandidateTag::ChineseSubtitles]);
        assert_eq!(results[1].tags, vec![CandidateTag::Decensored]);
    }

    #[test]
    fn test_parse_no_tags_pool_b() {
        assert!(run(Pool::B).iter().all(|c| c.tags.is_empty()));
    }
}
