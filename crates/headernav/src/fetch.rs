//! Page fetcher for the CLI: HTTP(S) through reqwest, `file://` from disk

use headernav_core::{NavError, PageFetcher};
use std::time::Duration;
use tracing::debug;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("headernav/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_file(url: &Url) -> Result<String, NavError> {
        let path = url.to_file_path().map_err(|_| NavError::Network {
            url: url.to_string(),
            message: "not a local file path".to_string(),
        })?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| NavError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

impl PageFetcher for ReqwestFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String, NavError> {
        if url.scheme() == "file" {
            debug!(%url, "reading local page");
            return Self::fetch_file(url).await;
        }

        debug!(%url, "fetching page");
        let network = |e: reqwest::Error| NavError::Network {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url.clone()).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_file_urls() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("products.html");
        std::fs::write(&page, "<article id=\"a\"><h2>A</h2></article>").unwrap();

        let fetcher = ReqwestFetcher::new().unwrap();
        let url = Url::from_file_path(&page).unwrap();
        let text = fetcher.fetch_text(&url).await.unwrap();
        assert!(text.contains("<h2>A</h2>"));
    }

    #[tokio::test]
    async fn test_missing_file_is_fallback_error() {
        let temp = TempDir::new().unwrap();
        let fetcher = ReqwestFetcher::new().unwrap();
        let url = Url::from_file_path(temp.path().join("missing.html")).unwrap();

        let err = fetcher.fetch_text(&url).await.unwrap_err();
        assert!(matches!(err, NavError::Network { .. }));
        assert!(err.is_fallback());
    }
}
