//! jav.guru listing extractor: thumbnails whose link mentions the code.

use scraper::Html;

use super::{selector, Listing};
use crate::{Candidate, Result};

pub(super) fn parse(html: &str, listing: &Listing<'_>) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);
    let link_selector = selector("a[href]")?;
    let image_selector = selector("img[alt]")?;

    let mut results = Vec::new();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !listing.mentions_code(href) {
            continue;
        }
        let Some(alt) = element
            .select(&image_selector)
            .next()
            .and_then(|img| img.value().attr("alt"))
        else {
            continue;
        };

        let Some(url) = listing.resolve(href) else {
            continue;
        };
        results.push(listing.candidate(alt, url.as_str()));
    }

    Ok(results)
}
