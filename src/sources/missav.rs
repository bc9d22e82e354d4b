//! MissAV listing extractor.
//!
//! Every hit sits in a `div.thumbnail.group` card: the first anchor is the
//! detail link, the `div.my-2` anchor carries the title.

use scraper::Html;

use super::{selector, Listing};
use crate::{Candidate, CandidateTag, Result};

pub(super) fn parse(html: &str, listing: &Listing<'_>) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let card_selector = selector("div.thumbnail.group")?;
    let link_selector = selector("a[href]")?;
    let title_selector = selector("div.my-2 a")?;

    let mut results = Vec::new();
    for card in document.select(&card_selector) {
        let Some(href) = card
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let Some(title) = card
            .select(&title_selector)
            .map(|a| a.text().collect::<String>())
            .find(|t| listing.mentions_code(t))
        else {
            continue;
        };

        let Some(url) = listing.resolve(href) else {
            continue;
        };
        let mut candidate = listing.candidate(&title, url.as_str());
        if listing.tags_apply() {
            let markup = card.html();
            if markup.contains("中文字幕") {
                candidate = candidate.with_tag(CandidateTag::ChineseSubtitles);
            }
            if markup.contains("无码影片") {
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
    <div class="grid">
      <div class="thumbnail group">
        <a href="https://missav.ai/cn/abc-123-chinese-subtitle"><img alt="x"></a>
        <span>中文字幕</span>
        <div class="my-2 text-sm"><a href="https://missav.ai/cn/abc-123-chinese-subtitle">ABC-123 字幕版</a></div>
      </div>
      <div class="thumbnail group">
        <a href="/cn/abc-123"><img alt="y"></a>
        <div class="my-2 text-sm"><a href="/cn/abc-123"> ABC-123 原版 </a></div>
      </div>
      <div class="thumbnail group">
        <a href="/cn/xyz-999"><img alt="z"></a>
        <div class="my-2 text-sm"><a href="/cn/xyz-999">XYZ-999</a></div>
      </div>
    </div>
    "#;

    #[test]
    fn test_parse_cards() {
        let src = source("https://missav.ai/cn/search/%s", Pool::A);
        let listing = Listing::new(&src, "abc-123", "https://missav.ai/cn/search/abc-123").unwrap();
        let results = parse(PAGE, &listing).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "ABC-123 字幕版");
        assert_eq!(results[0].tags, vec![CandidateTag::ChineseSubtitles]);
        assert_eq!(results[1].title, "ABC-123 原版");
        assert_eq!(results[1].link, "https://missav.ai/cn/abc-123");
        assert!(results[1].tags.is_empty());
    }

    #[test]
    fn test_parse_no_cards() {
        let src = source("https://missav.ai/cn/search/%s", Pool::B);
        let listing = Listing::new(&src, "abc-123", "https://missav.ai/cn/search/abc-123").unwrap();
        assert!(parse("<div>empty</div>", &listing).unwrap().is_empty());
    }
}
