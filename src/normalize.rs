//! Turns an accepted raw listing into a normalized result record.

use scraper::Html;

use crate::types::{NewsResult, RawListing};

/// Strip markup from a feed description: parse as HTML, keep the visible
/// text, and collapse non-breaking spaces into regular spaces.
pub fn clean_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.replace('\u{a0}', " ")
}

/// Build the result record for a listing that survived resolution. Title,
/// published date and publisher pass through unchanged; a listing without a
/// source gets the empty publisher descriptor.
pub fn to_result(listing: RawListing, url: String) -> NewsResult {
    NewsResult {
        title: listing.title,
        description: clean_html(&listing.description),
        published_date: listing.published,
        url,
        publisher: listing.source.unwrap_or_default(),
    }
}
