//! Jable listing extractor.

use scraper::Html;

use super::{selector, Listing};
use crate::{Candidate, Result};

pub(super) fn parse(html: &str, listing: &Listing<'_>) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let link_selector = selector("a[href][title]")?;

    let mut results = Vec::new();
    for element in document.select(&link_selector) {
        let (Some(href), Some(title)) = (element.value().attr("href"), element.value().attr("title"))
        else {
            continue;
        };
        if !listing.mentions_code(title) {
            continue;
        }
        if let Some(url) = listing.resolve(href) {
            results.push(listing.candidate(title, url.as_str()));
        }
    }

    Ok(results)
}
