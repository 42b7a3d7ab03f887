//! Site profile: endpoints and filter rules for one mirror family
//!
//! The resolver walks a fixed chain of redirector hosts. Those hosts
//! change more often than the algorithm does, so every URL, referer and
//! blocklist entry lives here as data. Pointing the resolver at another
//! mirror (or at a mock server in tests) means building another profile,
//! not another code path.

/// Endpoints and filter rules for one upstream site family
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Catalog root serving search and paginated listings
    pub catalog_root: String,

    /// First redirector of the download-links chain (receives FU + FN)
    pub blog_endpoint: String,
    /// Referer sent alongside the FU2 post
    pub blog_referer: String,
    /// Second redirector of the download-links chain (receives FU2)
    pub dld_endpoint: String,
    /// Token API that answers with the landing page URL
    pub link_api_endpoint: String,
    /// Origin header for the token API call
    pub link_api_origin: String,

    /// First redirector of the direct-link chain (receives FU5)
    pub direct_dld_endpoint: String,
    /// Second redirector of the direct-link chain (receives FU7)
    pub direct_blog_endpoint: String,
    /// Token API that answers with the final file URL
    pub direct_api_endpoint: String,

    /// URL fragments whose links are dropped from extracted results
    pub blocked_fragments: Vec<String>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            catalog_root: "https://fojik.site".to_string(),
            blog_endpoint: "https://search.technews24.site/blog.php".to_string(),
            blog_referer: "https://search.technews24.site/".to_string(),
            dld_endpoint: "https://freethemesy.com/dld.php".to_string(),
            link_api_endpoint: "https://freethemesy.com/new/l/api/m".to_string(),
            link_api_origin: "https://freethemesy.com".to_string(),
            direct_dld_endpoint: "https://sharelink-3.site/dld.php".to_string(),
            direct_blog_endpoint: "https://sharelink-3.site/blog/".to_string(),
            direct_api_endpoint: "https://sharelink-3.site/l/api/m".to_string(),
            blocked_fragments: vec![".me".to_string()],
        }
    }
}

impl SiteProfile {
    /// Whether a link URL matches any blocked fragment
    pub fn is_blocked(&self, url: &str) -> bool {
        self.blocked_fragments.iter().any(|f| url.contains(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_endpoints() {
        let profile = SiteProfile::default();
        assert_eq!(profile.catalog_root, "https://fojik.site");
        assert!(profile.blog_endpoint.ends_with("/blog.php"));
        assert!(profile.direct_api_endpoint.ends_with("/l/api/m"));
    }

    #[test]
    fn test_default_blocklist() {
        let profile = SiteProfile::default();
        assert!(profile.is_blocked("https://host.me/file"));
        assert!(profile.is_blocked("https://cdn.example.me/path"));
        assert!(!profile.is_blocked("https://host.example.org/file"));
    }

    #[test]
    fn test_custom_blocklist() {
        let profile = SiteProfile {
            blocked_fragments: vec![".ads.".to_string()],
            ..SiteProfile::default()
        };
        assert!(profile.is_blocked("https://x.ads.example/file"));
        assert!(!profile.is_blocked("https://host.me/file"));
    }
}
