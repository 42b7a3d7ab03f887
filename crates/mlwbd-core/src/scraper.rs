//! Main resolver API
//!
//! Combines the HTTP client, the token extractors and the landing-page
//! parsers into the two resolution pipelines plus the catalog
//! operations the presentation layer calls.

use scraper::Html;
use serde_json::json;
use tracing::{error, info, warn};

use crate::client::{ClientConfig, MlwbdClient};
use crate::error::{MlwbdError, Result};
use crate::parser::links::ExtractedLinks;
use crate::parser::tokens::ScriptPatterns;
use crate::parser::{extract_download_links, hidden_field, parse_movie_catalog};
use crate::profile::SiteProfile;
use crate::types::{DownloadGroup, DownloadLink, MovieSummary};
use crate::url::{build_page_url, build_search_url};

/// Group title given to flat fallback links after normalization
const FLAT_GROUP_TITLE: &str = "Download Options";

/// High-level resolver for mlwbd mirrors
///
/// Every method takes `&self` and builds its own HTTP client, so one
/// scraper can serve concurrent callers without coordination. Hops
/// inside a single pipeline run strictly in sequence; each depends on
/// tokens pulled out of the previous response. There is no cross-hop
/// deadline; callers wanting an end-to-end bound wrap the future in
/// their own timeout.
pub struct MlwbdScraper {
    profile: SiteProfile,
    config: ClientConfig,
    download_patterns: ScriptPatterns,
    direct_patterns: ScriptPatterns,
}

impl MlwbdScraper {
    /// Create a scraper against the default site profile
    pub fn new() -> Self {
        Self::with_profile(SiteProfile::default())
    }

    /// Create a scraper against a custom site profile
    pub fn with_profile(profile: SiteProfile) -> Self {
        Self::with_config(profile, ClientConfig::default())
    }

    /// Create a scraper with custom profile and client configuration
    pub fn with_config(profile: SiteProfile, config: ClientConfig) -> Self {
        Self {
            profile,
            config,
            download_patterns: ScriptPatterns::download_chain(),
            direct_patterns: ScriptPatterns::direct_chain(),
        }
    }

    /// Search the catalog for movies matching a query
    ///
    /// Never propagates a failure: problems are logged and an empty
    /// vector is returned so catalog browsing cannot crash the caller.
    pub async fn search(&self, query: &str) -> Vec<MovieSummary> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            warn!("empty search query, skipping catalog request");
            return Vec::new();
        }

        let url = build_search_url(&self.profile.catalog_root, trimmed);
        match self.fetch_catalog(&url).await {
            Ok(movies) => {
                info!("search {:?} returned {} movies", trimmed, movies.len());
                movies
            }
            Err(err) => {
                error!("catalog search failed for {:?}: {}", trimmed, err);
                Vec::new()
            }
        }
    }

    /// Fetch one page of the latest-movies listing
    ///
    /// Same failure contract as [`search`](Self::search): logged, empty
    /// vector, never an error.
    pub async fn latest_movies(&self, page: u32) -> Vec<MovieSummary> {
        let url = build_page_url(&self.profile.catalog_root, page);
        match self.fetch_catalog(&url).await {
            Ok(movies) => {
                info!("listing page {} returned {} movies", page, movies.len());
                movies
            }
            Err(err) => {
                error!("listing page {} failed: {}", page, err);
                Vec::new()
            }
        }
    }

    /// Resolve a movie page URL into grouped download links
    ///
    /// Walks the five-hop redirector chain; any hop failure
    /// short-circuits the rest and yields an empty vector with a logged
    /// diagnostic. Links pointing at blocked domains are dropped, and
    /// groups emptied by that filter disappear with them.
    pub async fn download_links(&self, page_url: &str) -> Vec<DownloadGroup> {
        match self.resolve_download_links(page_url).await {
            Ok(groups) => {
                info!("resolved {} link groups for {}", groups.len(), page_url);
                groups
            }
            Err(err) => {
                error!("download link resolution failed for {}: {}", page_url, err);
                Vec::new()
            }
        }
    }

    async fn resolve_download_links(&self, page_url: &str) -> Result<Vec<DownloadGroup>> {
        let client = MlwbdClient::with_config(self.config.clone())?;

        // Hop 1: the movie page hides the first token pair
        let body = client.get(page_url).await?;
        let fu = required_hidden_field(&body, "FU")?;
        let fn_token = required_hidden_field(&body, "FN")?;
        info!("hop 1: found FU and FN on {}", page_url);

        // Hop 2: blog redirector swaps them for FU2
        let body = client
            .post_form(
                &self.profile.blog_endpoint,
                &[("FU", fu.as_str()), ("FN", fn_token.as_str())],
                &[("Referer", page_url)],
            )
            .await?;
        let fu2 = required_hidden_field(&body, "FU2")?;
        info!("hop 2: found FU2");

        // Hop 3: dld redirector answers with obfuscated script tokens
        let body = client
            .post_form(
                &self.profile.dld_endpoint,
                &[("FU2", fu2.as_str())],
                &[("Referer", self.profile.blog_referer.as_str())],
            )
            .await?;
        let tokens = self.download_patterns.api_tokens(&body)?;
        info!("hop 3: extracted session tokens");

        // Hop 4: the token API answers with the landing page URL
        let body = client
            .post_form(
                &self.profile.link_api_endpoint,
                &[("s", tokens.s.as_str()), ("v", tokens.v.as_str())],
                &[
                    ("Referer", self.profile.dld_endpoint.as_str()),
                    ("Origin", self.profile.link_api_origin.as_str()),
                    ("X-Requested-With", "XMLHttpRequest"),
                ],
            )
            .await?;
        let landing = body.trim();
        if !landing.starts_with("http") {
            return Err(MlwbdError::UnexpectedReply(snippet(landing, 100)));
        }
        info!("hop 4: landing page {}", landing);

        // Hop 5: scrape the landing page itself
        let body = client.get(landing).await?;
        Ok(self.normalize_links(extract_links(&body)))
    }

    /// Resolve an intermediary link into the final downloadable URL
    ///
    /// Walks the four-hop direct chain and returns the API reply
    /// verbatim; validate it with [`is_usable_direct_link`] before
    /// handing it to a user.
    pub async fn direct_link(&self, url: &str) -> Result<String> {
        let result = self.resolve_direct_link(url).await;
        if let Err(err) = &result {
            error!("direct link resolution failed for {}: {}", url, err);
        }
        result
    }

    async fn resolve_direct_link(&self, url: &str) -> Result<String> {
        let client = MlwbdClient::with_config(self.config.clone())?;

        let body = client.get(url).await?;
        let fu5 = required_hidden_field(&body, "FU5")?;
        info!("direct hop 1: found FU5 on {}", url);

        let body = client
            .post_form(
                &self.profile.direct_dld_endpoint,
                &[("FU5", fu5.as_str())],
                &[("Referer", url)],
            )
            .await?;
        let fu7 = required_hidden_field(&body, "FU7")?;
        info!("direct hop 2: found FU7");

        let body = client
            .post_form(
                &self.profile.direct_blog_endpoint,
                &[("FU7", fu7.as_str())],
                &[("Referer", self.profile.direct_dld_endpoint.as_str())],
            )
            .await?;
        let tokens = self.direct_patterns.api_tokens(&body)?;
        info!("direct hop 3: extracted session tokens");

        let payload = json!({ "s": tokens.s, "v": tokens.v });
        client
            .post_json(
                &self.profile.direct_api_endpoint,
                &payload,
                &[
                    ("Accept", "application/json"),
                    ("X-Requested-With", "XMLHttpRequest"),
                    ("Referer", self.profile.direct_blog_endpoint.as_str()),
                ],
            )
            .await
    }

    async fn fetch_catalog(&self, url: &str) -> Result<Vec<MovieSummary>> {
        let client = MlwbdClient::with_config(self.config.clone())?;
        let body = client.get(url).await?;
        Ok(parse_movie_catalog(&body))
    }

    /// Applies the domain blocklist and folds flat fallback records
    /// into a single synthetic group
    fn normalize_links(&self, extracted: ExtractedLinks) -> Vec<DownloadGroup> {
        match extracted {
            ExtractedLinks::Groups(groups) => groups
                .into_iter()
                .filter_map(|mut group| {
                    group
                        .links
                        .retain(|link| !self.profile.is_blocked(&link.url));
                    if group.links.is_empty() {
                        None
                    } else {
                        Some(group)
                    }
                })
                .collect(),
            ExtractedLinks::Flat(links) => {
                let kept: Vec<DownloadLink> = links
                    .into_iter()
                    .filter(|link| !self.profile.is_blocked(&link.url))
                    .collect();
                if kept.is_empty() {
                    Vec::new()
                } else {
                    vec![DownloadGroup {
                        title: FLAT_GROUP_TITLE.to_string(),
                        links: kept,
                    }]
                }
            }
        }
    }
}

impl Default for MlwbdScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a direct-link API reply is a usable URL
///
/// The API answers with either a URL or an explanatory error text;
/// a usable reply starts with `http` and carries no error marker.
pub fn is_usable_direct_link(reply: &str) -> bool {
    reply.starts_with("http") && !reply.contains("Error")
}

fn required_hidden_field(html: &str, name: &'static str) -> Result<String> {
    let document = Html::parse_document(html);
    hidden_field(&document, name).ok_or(MlwbdError::FieldNotFound(name))
}

fn extract_links(html: &str) -> ExtractedLinks {
    let document = Html::parse_document(html);
    extract_download_links(&document)
}

fn snippet(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
