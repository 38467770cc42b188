//! ---
//! shelf_section: "02-backend-client"
//! shelf_subsection: "module"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "JSON-over-HTTP client for the book-library backend."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors surfaced by a single backend call.
///
/// Each variant maps to one step-failure disposition in the runner:
/// none of them abort the scenario on their own.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint path could not be joined onto the base address.
    #[error("invalid endpoint path '{path}': {source}")]
    InvalidEndpoint {
        path: String,
        source: url::ParseError,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    /// The request could not be sent or the response never arrived.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The response body was received but is not valid JSON.
    #[error("response from {endpoint} is not valid JSON: {source}")]
    InvalidJson {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// Thin client around a shared [`reqwest::Client`] bound to one base
/// address. Every backend operation goes through [`ApiClient::post_json`];
/// there are no other verbs in the contract.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    /// Build a client with the per-request timeout applied connection-wide.
    pub fn new(base: Url, request_timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { base, http })
    }

    /// The base address endpoint paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// POST `body` as JSON to `base + path` and parse the response body as
    /// JSON. The `Content-Type: application/json` header is fixed for every
    /// call.
    pub async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ClientError> {
        let endpoint = self
            .base
            .join(path)
            .map_err(|source| ClientError::InvalidEndpoint {
                path: path.to_owned(),
                source,
            })?;

        let response = self
            .http
            .post(endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| classify_send_error(&endpoint, source))?;
        debug!(endpoint = %endpoint, status = %response.status(), "response status");

        response
            .json::<Value>()
            .await
            .map_err(|source| classify_body_error(&endpoint, source))
    }
}

fn classify_send_error(endpoint: &Url, source: reqwest::Error) -> ClientError {
    if source.is_timeout() {
        ClientError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}

fn classify_body_error(endpoint: &Url, source: reqwest::Error) -> ClientError {
    if source.is_timeout() {
        ClientError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        ClientError::InvalidJson {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}
