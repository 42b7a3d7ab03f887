//! Catalog listing parser
//!
//! Parses search result and paginated listing pages into movie
//! summaries. Both page types render one `<article>` per movie.

use scraper::{ElementRef, Html, Selector};

use super::collapsed_text;
use crate::types::MovieSummary;

/// Parses a catalog page and returns all complete movie entries
///
/// Articles missing a title or a detail-page link are skipped, never
/// emitted as partial records. Order follows the document.
pub fn parse_movie_catalog(html: &str) -> Vec<MovieSummary> {
    let document = Html::parse_document(html);

    let Ok(article_selector) = Selector::parse("article") else {
        return Vec::new();
    };

    document
        .select(&article_selector)
        .filter_map(|article| parse_article(&article))
        .collect()
}

/// Parses a single `<article>` element into a movie summary
///
/// The title anchor lives inside a `div.title` container on most
/// mirrors; older markup puts a bare anchor directly in the article.
/// The image `alt` text stands in for a missing anchor title.
fn parse_article(article: &ElementRef) -> Option<MovieSummary> {
    let title_div_selector = Selector::parse("div.title").ok()?;
    let any_anchor_selector = Selector::parse("a").ok()?;
    let href_anchor_selector = Selector::parse("a[href]").ok()?;
    let image_selector = Selector::parse("img[src]").ok()?;

    let anchor = match article.select(&title_div_selector).next() {
        Some(title_div) => title_div.select(&any_anchor_selector).next(),
        None => article.select(&href_anchor_selector).next(),
    };
    let image = article.select(&image_selector).next();

    let title = match anchor {
        Some(a) => collapsed_text(&a),
        None => image
            .and_then(|img| img.value().attr("alt"))
            .unwrap_or("")
            .trim()
            .to_string(),
    };
    let link = anchor
        .and_then(|a| a.value().attr("href"))
        .unwrap_or("")
        .to_string();
    let image = image
        .and_then(|img| img.value().attr("src"))
        .unwrap_or("")
        .to_string();

    if title.is_empty() || link.is_empty() {
        return None;
    }

    Some(MovieSummary { title, image, link })
}
