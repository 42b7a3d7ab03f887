//! Core data types for the mlwbd resolver
//!
//! Contains the data structures handed to the presentation layer.

use serde::{Deserialize, Serialize};

/// A single movie entry from a catalog listing or search page
///
/// Entries missing a title or a detail-page link are dropped during
/// parsing; a constructed summary always carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Movie title
    pub title: String,

    /// Poster image URL (may be empty when the article has no image)
    pub image: String,

    /// URL of the movie detail page
    pub link: String,
}

/// One download link inside a [`DownloadGroup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    /// Episode/part identifier or filename fragment, e.g. "720p"
    pub label: String,

    /// Link target
    pub url: String,

    /// Quality or host tag taken from the anchor text, e.g. "GDrive"
    pub info: String,
}

/// A named cluster of download links sharing a common heading
///
/// Link order mirrors document order; groups whose links are all
/// filtered away are never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadGroup {
    /// Heading text, e.g. "Episode 1"
    pub title: String,

    /// Links collected under the heading, in document order
    pub links: Vec<DownloadLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_summary_serialization() {
        let movie = MovieSummary {
            title: "Test Movie".to_string(),
            image: "https://cdn.example.org/poster.jpg".to_string(),
            link: "https://example.org/test-movie/".to_string(),
        };

        let json = serde_json::to_string(&movie).expect("Serialization should succeed");
        let deserialized: MovieSummary =
            serde_json::from_str(&json).expect("Deserialization should succeed");

        assert_eq!(movie, deserialized);
    }

    #[test]
    fn test_download_group_serialization() {
        let group = DownloadGroup {
            title: "Episode 1".to_string(),
            links: vec![DownloadLink {
                label: "720p".to_string(),
                url: "https://files.example.org/e1".to_string(),
                info: "GDrive".to_string(),
            }],
        };

        let json = serde_json::to_string(&group).expect("Serialization should succeed");
        let deserialized: DownloadGroup =
            serde_json::from_str(&json).expect("Deserialization should succeed");

        assert_eq!(group, deserialized);
    }

    #[test]
    fn test_movie_summary_with_empty_image() {
        let movie = MovieSummary {
            title: "No Poster".to_string(),
            image: String::new(),
            link: "https://example.org/no-poster/".to_string(),
        };

        let json = serde_json::to_string(&movie).expect("Serialization should succeed");
        let deserialized: MovieSummary =
            serde_json::from_str(&json).expect("Deserialization should succeed");

        assert_eq!(movie, deserialized);
    }
}
