//! Link-group extractor for final landing pages
//!
//! Landing pages come in two layouts. The common one clusters download
//! links under episode/part/batch headings, each heading followed by
//! `<ul><li>` blocks of anchors. Older pages instead render flat
//! center-aligned paragraphs carrying a size/quality phrase and one or
//! more anchors. The primary strategy handles the first layout; the
//! fallback only runs when the primary finds nothing.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{collapsed_text, spaced_text};
use crate::types::{DownloadGroup, DownloadLink};

/// Substrings that mark an element as the start of a link group
const GROUP_KEYWORDS: &[&str] = &["epi", "batch", "part"];

/// Quality markers a fallback paragraph must mention
const FALLBACK_QUALITIES: &[&str] = &["480p", "720p", "1080p"];

/// Raw extraction result before filtering and normalization
///
/// `Groups` comes from the heading-based primary strategy, `Flat` from
/// the quality-paragraph fallback. The orchestrator applies the domain
/// blocklist and folds flat records into a synthetic group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedLinks {
    Groups(Vec<DownloadGroup>),
    Flat(Vec<DownloadLink>),
}

/// Extracts download links from a parsed landing page
///
/// The fallback strategy is consulted only when the primary strategy
/// yields zero groups.
pub fn extract_download_links(document: &Html) -> ExtractedLinks {
    let groups = extract_grouped_links(document);
    if !groups.is_empty() {
        return ExtractedLinks::Groups(groups);
    }

    ExtractedLinks::Flat(extract_quality_blocks(document))
}

fn contains_group_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    GROUP_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Primary strategy: heading/keyword elements start groups, following
/// sibling `<ul>` lists supply the links
fn extract_grouped_links(document: &Html) -> Vec<DownloadGroup> {
    let Ok(start_selector) = Selector::parse("h2, p, strong, em, span") else {
        return Vec::new();
    };
    let Ok(item_selector) = Selector::parse("li") else {
        return Vec::new();
    };
    let Ok(anchor_selector) = Selector::parse("a") else {
        return Vec::new();
    };

    let mut groups = Vec::new();

    for start in document.select(&start_selector) {
        let title = collapsed_text(&start);
        if !contains_group_keyword(&title) && start.value().name() != "h2" {
            continue;
        }

        let links = collect_sibling_links(&start, &item_selector, &anchor_selector);
        if !links.is_empty() {
            groups.push(DownloadGroup { title, links });
        }
    }

    groups
}

/// Walks the start element's following siblings, harvesting list links
/// until the next keyword heading/paragraph begins another group
fn collect_sibling_links(
    start: &ElementRef,
    item_selector: &Selector,
    anchor_selector: &Selector,
) -> Vec<DownloadLink> {
    let mut links = Vec::new();

    for node in start.next_siblings() {
        let Some(sibling) = ElementRef::wrap(node) else {
            continue;
        };
        let name = sibling.value().name();

        if (name == "h2" || name == "p") && contains_group_keyword(&collapsed_text(&sibling)) {
            break;
        }
        if name != "ul" {
            continue;
        }

        for item in sibling.select(item_selector) {
            let item_text = collapsed_text(&item);
            let label = match item_text.split(':').next() {
                Some(prefix) if !prefix.is_empty() => prefix.to_string(),
                _ => "Unknown".to_string(),
            };

            for anchor in item.select(anchor_selector) {
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                if href.is_empty() {
                    continue;
                }
                links.push(DownloadLink {
                    label: label.clone(),
                    url: href.to_string(),
                    info: collapsed_text(&anchor),
                });
            }
        }
    }

    links
}

/// Fallback strategy: center-aligned paragraphs labelled with a
/// size/quality phrase, one flat link per anchor
fn extract_quality_blocks(document: &Html) -> Vec<DownloadLink> {
    let Ok(block_selector) = Selector::parse(r#"p[style*="text-align: center;"]"#) else {
        return Vec::new();
    };
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let Ok(quality_pattern) = Regex::new(r"(?i)([\d.]+(?:MB|GB).*?(480p|720p|1080p))") else {
        return Vec::new();
    };

    let mut links = Vec::new();

    for block in document.select(&block_selector) {
        let text = spaced_text(&block);

        let anchors: Vec<(String, String)> = block
            .select(&anchor_selector)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                if href.is_empty() {
                    return None;
                }
                Some((collapsed_text(&anchor), href.to_string()))
            })
            .collect();

        if anchors.is_empty() || !FALLBACK_QUALITIES.iter().any(|q| text.contains(q)) {
            continue;
        }

        let quality = quality_pattern
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        for (label, url) in anchors {
            links.push(DownloadLink {
                label,
                url,
                info: quality.clone(),
            });
        }
    }

    links
}
