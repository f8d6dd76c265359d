//! Upstream forwarding used by the `/api/*path` route.
//!
//! The caller's path and query are passed through unvalidated; only the
//! credential parameter is owned by the server.
use anyhow::Context;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

pub const API_KEY_PARAM: &str = "api_key";
pub const FAILURE_MESSAGE: &str = "Failed to fetch data";

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Any failure reaching the upstream. `status` is set when a response was received.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub status: Option<StatusCode>,
    pub message: String,
}

impl UpstreamError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issues one GET for `path` (relative to the upstream base) with `query` as given.
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<UpstreamResponse, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    client: Client,
    base_url: String,
}

impl ReqwestUpstream {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(format!("cinevault/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = build_upstream_url(&self.base_url, path, query)?;
        debug!("Forwarding to {}/{}", self.base_url, path);

        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(format!("request failed: {}", e)))?;
        let status = res.status();
        if !status.is_success() {
            return Err(UpstreamError::from_status(
                status,
                format!("Request failed with status code {}", status.as_u16()),
            ));
        }
        let body = res
            .bytes()
            .await
            .map_err(|e| UpstreamError::transport(format!("reading body failed: {}", e)))?;
        Ok(UpstreamResponse { status, body })
    }
}

/// Joins the non-empty segments of a wildcard capture with `/`.
pub fn join_segments(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Copies the caller's parameters and sets `key` to `value`.
///
/// A repeated name keeps the position of its first occurrence and the value of
/// its last one. `key` always ends up exactly once, carrying `value`.
pub fn merge_query(params: Vec<(String, String)>, key: &str, value: &str) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(params.len() + 1);
    for (name, v) in params {
        match merged.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = v,
            None => merged.push((name, v)),
        }
    }
    match merged.iter_mut().find(|(name, _)| name == key) {
        Some(slot) => slot.1 = value.to_string(),
        None => merged.push((key.to_string(), value.to_string())),
    }
    merged
}

pub fn build_upstream_url(
    base: &str,
    path: &str,
    query: &[(String, String)],
) -> Result<Url, UpstreamError> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse_with_params(&raw, query)
        .map_err(|e| UpstreamError::transport(format!("invalid upstream url '{}': {}", raw, e)))
}
