//! URL helper functions for the movie catalog
//!
//! Provides functions for building search and listing URLs.

/// Builds the catalog search URL for a given query
///
/// URL encodes the query and appends it as the `s` parameter.
///
/// # Example
/// ```
/// use mlwbd_core::url::build_search_url;
/// let url = build_search_url("https://fojik.site", "avatar 2009");
/// assert_eq!(url, "https://fojik.site/?s=avatar%202009");
/// ```
pub fn build_search_url(root: &str, query: &str) -> String {
    let encoded = urlencoding::encode(query);
    format!("{}/?s={}", root.trim_end_matches('/'), encoded)
}

/// Builds the paginated listing URL for a catalog page number
///
/// # Example
/// ```
/// use mlwbd_core::url::build_page_url;
/// let url = build_page_url("https://fojik.site", 3);
/// assert_eq!(url, "https://fojik.site/page/3/");
/// ```
pub fn build_page_url(root: &str, page: u32) -> String {
    format!("{}/page/{}/", root.trim_end_matches('/'), page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_url_simple() {
        let url = build_search_url("https://fojik.site", "avatar");
        assert_eq!(url, "https://fojik.site/?s=avatar");
    }

    #[test]
    fn test_build_search_url_with_spaces() {
        let url = build_search_url("https://fojik.site", "the dark knight");
        assert_eq!(url, "https://fojik.site/?s=the%20dark%20knight");
    }

    #[test]
    fn test_build_search_url_trailing_slash_root() {
        let url = build_search_url("https://fojik.site/", "avatar");
        assert_eq!(url, "https://fojik.site/?s=avatar");
    }

    #[test]
    fn test_build_page_url() {
        let url = build_page_url("https://fojik.site", 1);
        assert_eq!(url, "https://fojik.site/page/1/");
    }

    #[test]
    fn test_build_page_url_trailing_slash_root() {
        let url = build_page_url("https://fojik.site/", 12);
        assert_eq!(url, "https://fojik.site/page/12/");
    }
}
