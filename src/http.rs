//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Optional basic authentication per request
//! - Status-to-error mapping shared by checkers and notifiers
//!
//! Requests are attempted once; a failed request fails the dependency and
//! the next scheduled run tries again.

use crate::config::Credentials;
use crate::error::HttpError;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header; GitHub rejects requests without one
const DEFAULT_USER_AGENT: &str = concat!("relcheck/", env!("CARGO_PKG_VERSION"));

/// Media type requested from the GitHub REST API
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// HTTP client wrapper with timeout and error mapping
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| HttpError::Network {
                url: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Create a client with the given timeout and the default User-Agent
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Download a resource as raw bytes
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.send(url, self.client.get(url)).await?;
        let bytes = response.bytes().await.map_err(|e| HttpError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    /// GET a GitHub API resource and parse the JSON body
    pub async fn get_github_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
    ) -> Result<T, HttpError> {
        let request = self.client.get(url).header("Accept", GITHUB_ACCEPT);
        let request = authenticate(request, credentials);
        let response = self.send(url, request).await?;
        response.json::<T>().await.map_err(|e| HttpError::Decode {
            url: url.to_string(),
            message: format!("failed to parse JSON: {}", e),
        })
    }

    /// POST a JSON body to a GitHub API resource
    pub async fn post_github_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        credentials: Option<&Credentials>,
    ) -> Result<(), HttpError> {
        let request = authenticate(
            self.client
                .post(url)
                .header("Accept", GITHUB_ACCEPT)
                .json(body),
            credentials,
        );
        self.send(url, request).await?;
        Ok(())
    }

    /// Send a request and map transport failures and non-success statuses
    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, HttpError> {
        debug!("HTTP request to {}", url);
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout {
                    url: url.to_string(),
                }
            } else {
                HttpError::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

fn authenticate(request: RequestBuilder, credentials: Option<&Credentials>) -> RequestBuilder {
    match credentials {
        Some(creds) => request.basic_auth(&creds.username, Some(&creds.secret)),
        None => request,
    }
}
