//! jav777: two-step source. The search page only yields a post link; the
//! post is accepted when its catalog line names the code.

use scraper::Html;

use super::{selector, Listing};
use crate::{Candidate, CandidateTag, Result};

/// First post link on the search page, if any.
pub(super) fn first_post_link(html: &str, listing: &Listing<'_>) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let link_selector = selector(".post-title a[href]")?;

    Ok(document
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| listing.resolve(href))
        .map(|url| url.to_string()))
}

/// Whether the post page declares `code` as its catalog number, ignoring
/// case.
pub(super) fn confirms_code(detail_html: &str, code: &str) -> bool {
    detail_html
        .to_lowercase()
        .contains(&format!("【番號】︰{}", code.to_lowercase()))
}

/// Every jav777 post is a subtitled release.
pub(super) fn candidate(listing: &Listing<'_>, detail_url: String) -> Candidate {
    listing
        .candidate(&format!("{} (jav777)", listing.code()), detail_url)
        .with_tag(CandidateTag::ChineseSubtitles)
}
