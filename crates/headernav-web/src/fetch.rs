//! Same-origin page fetcher over gloo-net

use gloo_net::http::Request;
use headernav_core::submenu::check_same_origin;
use headernav_core::{NavError, PageFetcher};
use url::Url;
use web_sys::RequestCredentials;

/// Fetches sibling pages with ambient same-origin credentials
///
/// Sources on another origin are refused before any request is made, so
/// the list keeps its "view all" link.
#[derive(Debug, Clone)]
pub struct GlooFetcher {
    page: Url,
}

impl GlooFetcher {
    pub fn new(page: Url) -> Self {
        Self { page }
    }
}

impl PageFetcher for GlooFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String, NavError> {
        check_same_origin(&self.page, url)?;

        let response = Request::get(url.as_str())
            .credentials(RequestCredentials::SameOrigin)
            .send()
            .await
            .map_err(|e| NavError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.ok() {
            return Err(NavError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.text().await.map_err(|e| NavError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
