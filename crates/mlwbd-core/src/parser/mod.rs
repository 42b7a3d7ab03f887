//! HTML parsers for the mlwbd resolver
//!
//! Contains modules for parsing catalog pages, landing pages and the
//! token-bearing redirector responses.

pub mod catalog;
pub mod links;
pub mod tokens;

pub use catalog::parse_movie_catalog;
pub use links::{ExtractedLinks, extract_download_links};
pub use tokens::{ApiTokens, ScriptPatterns, hidden_field, parse_array_literal};

use scraper::ElementRef;

/// Concatenates an element's text nodes with surrounding whitespace removed
pub(crate) fn collapsed_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

/// Joins an element's text nodes with single spaces
pub(crate) fn spaced_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
