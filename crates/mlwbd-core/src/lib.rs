//! mlwbd Resolver Core Library
//!
//! Async API for browsing mlwbd movie catalogs and resolving their
//! multi-hop download chains into directly usable file URLs.
//!
//! # Overview
//!
//! The interesting part of an mlwbd mirror is not the catalog but the
//! chain of redirector sites between a movie page and the real file.
//! Each hop hides a continuation token in a hidden form field or
//! an obfuscated inline script, and each token unlocks exactly one
//! further hop. This crate provides:
//! - a browser-emulating HTTP client with retries and backoff
//! - extractors for hidden-field and inline-script tokens
//! - a landing-page parser producing grouped download links
//! - the orchestrated pipelines tying the hops together
//!
//! # Example
//!
//! ```no_run
//! use mlwbd_core::{MlwbdScraper, is_usable_direct_link};
//!
//! #[tokio::main]
//! async fn main() {
//!     let scraper = MlwbdScraper::new();
//!
//!     // Browse the catalog
//!     let movies = scraper.search("avatar").await;
//!
//!     // Resolve a movie page into grouped download links
//!     if let Some(movie) = movies.first() {
//!         let groups = scraper.download_links(&movie.link).await;
//!
//!         // Resolve one of those links into the final file URL
//!         if let Some(link) = groups.first().and_then(|g| g.links.first()) {
//!             match scraper.direct_link(&link.url).await {
//!                 Ok(reply) if is_usable_direct_link(&reply) => {
//!                     println!("direct URL: {}", reply);
//!                 }
//!                 Ok(reply) => println!("upstream refused: {}", reply),
//!                 Err(err) => println!("resolution failed: {}", err),
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! # Failure contract
//!
//! Catalog operations and the download-links pipeline never fail the
//! caller: they log and return empty collections. The direct-link
//! pipeline returns a typed [`MlwbdError`]. Nothing in this crate
//! panics on upstream misbehavior.
//!
//! # Concurrency
//!
//! [`MlwbdScraper`] is `Send + Sync`; every invocation builds its own
//! client and token set, so concurrent resolutions need no locking.

mod client;
mod error;
pub mod parser;
mod profile;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, MlwbdClient, UserAgentPool};

// Re-export error types
pub use error::{MlwbdError, Result};

// Re-export parser building blocks
pub use parser::{ApiTokens, ExtractedLinks, ScriptPatterns, extract_download_links,
    hidden_field, parse_array_literal, parse_movie_catalog};

// Re-export the resolver API
pub use scraper::{MlwbdScraper, is_usable_direct_link};

// Re-export site configuration
pub use profile::SiteProfile;

// Re-export data types
pub use types::{DownloadGroup, DownloadLink, MovieSummary};
