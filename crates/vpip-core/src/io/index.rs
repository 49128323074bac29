//! Simple-index page fetching.
//!
//! Every failure mode collapses to an empty candidate list after logging, so
//! callers only ever see "some candidates" or "none".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use vpip_schema::{Artifact, PackageName, list_candidates};

use crate::USER_AGENT;

/// Per-request timeout for index pages.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures before an HTTP status was received.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the timeout.
    #[error("Timed out fetching {url}")]
    Timeout {
        /// Requested page.
        url: String,
    },

    /// Connection, TLS or body transfer failed.
    #[error("Request to {url} failed: {source}")]
    Http {
        /// Requested page.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
}

/// Raw outcome of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded as text.
    pub body: String,
}

/// Retrieves index pages. Swappable so resolution can run offline in tests.
#[async_trait]
pub trait IndexFetcher: Send + Sync {
    /// GET `url`, giving up after `timeout`.
    ///
    /// Any HTTP status counts as a response, including 404.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Timeout`] when `timeout` elapses and
    /// [`FetchError::Http`] for any other transport failure.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<IndexResponse, FetchError>;
}

/// [`IndexFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpIndexFetcher {
    client: Client,
}

impl HttpIndexFetcher {
    /// Wrap an existing client, e.g. one with custom TLS or proxy settings.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IndexFetcher for HttpIndexFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<IndexResponse, FetchError> {
        let classify = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Http {
                    url: url.to_string(),
                    source,
                }
            }
        };

        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(classify)?;
        Ok(IndexResponse { status, body })
    }
}

/// Page URL for `package` under `index_url`: `<index>/<package>/`.
pub fn package_url(index_url: &str, package: &PackageName) -> String {
    format!("{}/{}/", index_url.trim_end_matches('/'), package)
}

/// Fetch and parse the candidate list for `package`, newest first.
///
/// Not-found, unexpected statuses, timeouts and transport errors are logged
/// and yield an empty list.
pub async fn fetch_candidates(
    fetcher: &dyn IndexFetcher,
    package: &PackageName,
    index_url: &str,
) -> Vec<Artifact> {
    let url = package_url(index_url, package);
    tracing::info!("Querying `{url}` for package `{package}`");

    match fetcher.fetch(&url, FETCH_TIMEOUT).await {
        Ok(IndexResponse { status: 200, body }) => {
            tracing::info!("Successfully fetched package data from `{url}`");
            let candidates = list_candidates(&body);
            tracing::debug!("{} candidate artifacts for `{package}`", candidates.len());
            candidates
        }
        Ok(IndexResponse { status: 404, .. }) => {
            tracing::info!("No candidate found for `{package}` from `{url}`");
            Vec::new()
        }
        Ok(IndexResponse { status, .. }) => {
            tracing::error!("Unexpected status {status} from `{url}`");
            Vec::new()
        }
        Err(e @ FetchError::Timeout { .. }) => {
            tracing::error!("{e}");
            Vec::new()
        }
        Err(e) => {
            tracing::error!("Error fetching package data: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const PAGE: &str = r#"<html><body>
<a href="https://files.example/dummy-1.0.0-py3-none-any.whl#sha256=0000000000000000000000000000000000000000000000000000000000000000">w</a>
<a href="https://files.example/dummy-1.0.0.tar.gz">s</a>
<a href="https://files.example/dummy-2.0.0~abcd1234-py3-none-any.whl">v</a>
<a href="/not-an-artifact">x</a>
</body></html>"#;

    struct Failing(fn(&str) -> FetchError);

    #[async_trait]
    impl IndexFetcher for Failing {
        async fn fetch(&self, url: &str, _: Duration) -> Result<IndexResponse, FetchError> {
            Err((self.0)(url))
        }
    }

    #[test]
    fn test_package_url() {
        let name = PackageName::from("Dummy_Pkg");
        assert_eq!(
            package_url("https://pypi.org/simple", &name),
            "https://pypi.org/simple/dummy-pkg/"
        );
        assert_eq!(
            package_url("https://pypi.org/simple/", &name),
            "https://pypi.org/simple/dummy-pkg/"
        );
    }

    #[tokio::test]
    async fn test_fetch_candidates_ok() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/simple/dummy/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;

        let index = format!("{}/simple", server.url());
        let fetcher = HttpIndexFetcher::default();
        let candidates = fetch_candidates(&fetcher, &PackageName::from("dummy"), &index).await;

        let names: Vec<&str> = candidates.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(
            names,
            [
                "dummy-2.0.0~abcd1234-py3-none-any.whl",
                "dummy-1.0.0-py3-none-any.whl",
                "dummy-1.0.0.tar.gz",
            ]
        );
        assert!(candidates[1].integrity_hash.is_some());
    }

    #[tokio::test]
    async fn test_fetch_candidates_trailing_slash_index() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/simple/dummy/")
            .with_status(200)
            .with_body(PAGE)
            .create_async()
            .await;

        let index = format!("{}/simple/", server.url());
        let candidates =
            fetch_candidates(&HttpIndexFetcher::default(), &PackageName::from("dummy"), &index)
                .await;
        assert_eq!(candidates.len(), 3);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_candidates_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/simple/missing/")
            .with_status(404)
            .create_async()
            .await;

        let index = format!("{}/simple", server.url());
        let candidates =
            fetch_candidates(&HttpIndexFetcher::default(), &PackageName::from("missing"), &index)
                .await;
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_candidates_server_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/simple/dummy/")
            .with_status(500)
            .with_body(PAGE)
            .create_async()
            .await;

        let index = format!("{}/simple", server.url());
        let candidates =
            fetch_candidates(&HttpIndexFetcher::default(), &PackageName::from("dummy"), &index)
                .await;
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_candidates_timeout_is_empty() {
        let fetcher = Failing(|url| FetchError::Timeout {
            url: url.to_string(),
        });
        let candidates =
            fetch_candidates(&fetcher, &PackageName::from("dummy"), "http://index").await;
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_candidates_connection_refused_is_empty() {
        // Port 1 is reserved and nothing listens on it.
        let candidates = fetch_candidates(
            &HttpIndexFetcher::default(),
            &PackageName::from("dummy"),
            "http://127.0.0.1:1/simple",
        )
        .await;
        assert!(candidates.is_empty());
    }
}
