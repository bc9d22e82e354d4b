//! Supjav listing extractor.

use regex::Regex;
use scraper::Html;

use super::{selector, Listing};
use crate::{Candidate, CandidateTag, Result};

const DETAIL_PATH: &str = r"^/zh/[0-9]+\.html$";

const DECENSORED_MARKERS: [&str; 3] = ["无码破解", "无码流出", "無修正"];

pub(super) fn parse(html: &str, listing: &Listing<'_>) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let link_selector = selector("a[href][title]")?;
    let detail_path = Regex::new(DETAIL_PATH)?;

    let mut results = Vec::new();
    for element in document.select(&link_selector) {
        let (Some(href), Some(title)) = (element.value().attr("href"), element.value().attr("title"))
        else {
            continue;
        };
        let Some(url) = listing.resolve(href) else {
            continue;
        };
        if !detail_path.is_match(url.path()) || !listing.mentions_code(title) {
            continue;
        }

        let mut candidate = listing.candidate(title, url.as_str());
        if listing.tags_apply() {
            if DECENSORED_MARKERS.iter().any(|m| title.contains(m)) {
                candidate = candidate.with_tag(CandidateTag::Decensored);
            }
            if title.contains("中文字幕") {
                candidate = candidate.with_tag(CandidateTag::ChineseSubtitles);
            }
        }
        results.push(candidate);
    }

    Ok(results)
}
