//! HTTP suggestion source
//!
//! Issues `GET {base_url}/{query}` and decodes a JSON array of suggestion
//! records. The optional access credential travels as the `api-key` header.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode, Url};

use super::{SourceError, SuggestionSource};
use crate::suggestion::Suggestion;

/// Header carrying the access credential
const API_KEY_HEADER: &str = "api-key";

#[derive(Debug, Clone)]
pub struct HttpSuggestionSource {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpSuggestionSource {
    /// Create a new source
    ///
    /// Fails if `base_url` is not an absolute URL that can carry path
    /// segments, or if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl {
            message: format!("{}: {}", base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl {
                message: format!("{} cannot carry a query path", base_url),
            });
        }

        let client = Client::builder().timeout(timeout).build().map_err(|e| SourceError::Network {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base_url,
            // Blank keys are treated as absent
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Request URL for a query, percent-encoded as a single path segment
    pub fn request_url(&self, query: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl {
                message: format!("{} cannot carry a query path", self.base_url),
            })?
            .pop_if_empty()
            .push(query);
        Ok(url)
    }

    async fn fetch_inner(&self, query: &str) -> Result<Vec<Suggestion>, SourceError> {
        let url = self.request_url(query)?;
        log::debug!("Fetching suggestions from {}", url);

        let mut request = self.client.get(url);
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| SourceError::Network {
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, retry_after.as_deref(), body));
        }

        response
            .json::<Vec<Suggestion>>()
            .await
            .map_err(|e| SourceError::Parse {
                message: e.to_string(),
            })
    }
}

impl SuggestionSource for HttpSuggestionSource {
    fn fetch<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Suggestion>, SourceError>> {
        self.fetch_inner(query).boxed()
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Map a non-success response to an error
fn status_error(status: StatusCode, retry_after: Option<&str>, body: String) -> SourceError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return SourceError::RateLimited {
            retry_after: retry_after.and_then(|v| v.trim().parse().ok()),
        };
    }
    SourceError::Api {
        code: status.as_u16(),
        message: body,
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
