//! Source page retrieval

use crate::error::NavError;
use url::Url;

/// Retrieves the text of a same-site page
///
/// Futures are not required to be `Send`: the browser implementation runs
/// on the single UI thread.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Body text of a successful response; transport failures and
    /// non-success statuses are errors
    async fn fetch_text(&self, url: &Url) -> Result<String, NavError>;
}

/// Resolve a `data-source` reference against the current page URL
pub fn resolve_source(base: &Url, source: &str) -> Result<Url, NavError> {
    base.join(source).map_err(|e| NavError::InvalidSourceUrl {
        source_url: source.to_string(),
        base: base.to_string(),
        source: e,
    })
}

/// Reject `url` unless it shares the page's origin
///
/// Opaque origins (`file:`, `data:`) never match, so only use this where
/// the page is served over http(s).
pub fn check_same_origin(page: &Url, url: &Url) -> Result<(), NavError> {
    let origin = page.origin();
    if url.origin() == origin {
        return Ok(());
    }
    Err(NavError::CrossOrigin {
        url: url.to_string(),
        origin: origin.ascii_serialization(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_sources() {
        let base = Url::parse("https://example.com/shop/index.html").unwrap();
        assert_eq!(
            resolve_source(&base, "products.html").unwrap().as_str(),
            "https://example.com/shop/products.html"
        );
        assert_eq!(
            resolve_source(&base, "/guides/").unwrap().as_str(),
            "https://example.com/guides/"
        );
        assert_eq!(
            resolve_source(&base, "../about.html?x=1").unwrap().as_str(),
            "https://example.com/about.html?x=1"
        );
    }

    #[test]
    fn test_unresolvable_source() {
        let base = Url::parse("https://example.com/").unwrap();
        let err = resolve_source(&base, "http://[::1").unwrap_err();
        assert!(matches!(err, NavError::InvalidSourceUrl { .. }));
        assert!(err.is_fallback());
    }

    #[test]
    fn test_same_origin_check() {
        let page = Url::parse("https://example.com/shop/index.html").unwrap();
        let sibling = resolve_source(&page, "products.html").unwrap();
        assert!(check_same_origin(&page, &sibling).is_ok());

        for source in [
            "https://cdn.example.net/products.html",
            "http://example.com/products.html",
            "https://example.com:8443/products.html",
        ] {
            let url = resolve_source(&page, source).unwrap();
            let err = check_same_origin(&page, &url).unwrap_err();
            assert!(
                matches!(err, NavError::CrossOrigin { ref origin, .. } if origin == "https://example.com"),
                "{source}"
            );
            assert!(err.is_fallback());
        }
    }
}
