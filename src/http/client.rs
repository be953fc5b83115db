use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio::time::Instant;
use tracing::error;

use crate::error::{AppError, AppResult, HttpError};
use crate::metrics::RequestResult;

pub const DEFAULT_USER_AGENT: &str = concat!("httpload/", env!("CARGO_PKG_VERSION"));

/// Issues the GET requests of a load test.
///
/// Implementations time the request from send to response headers and must
/// release the response body before returning. Callers cancel an in-flight
/// request by dropping the returned future.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Performs one GET against `url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is malformed or the transport fails.
    async fn get(&self, url: &str) -> AppResult<RequestResult>;
}

#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Builds a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| {
                error!("Failed to build HTTP client: {}", err);
                AppError::http(HttpError::BuildClientFailed { source: err })
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> AppResult<RequestResult> {
        let parsed = Url::parse(url).map_err(|err| {
            AppError::http(HttpError::InvalidUrl {
                url: url.to_owned(),
                source: err,
            })
        })?;

        let start = Instant::now();
        let response = self.client.get(parsed).send().await.map_err(|err| {
            AppError::http(HttpError::Transport {
                url: url.to_owned(),
                source: err,
            })
        })?;
        let result = RequestResult::new(start, response.status().as_u16());

        // Drain so the connection can go back to the pool; body errors do not
        // change an already measured result.
        drop(response.bytes().await);
        Ok(result)
    }
}
