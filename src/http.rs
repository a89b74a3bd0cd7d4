// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP adapter for one backend base URL.
//!
//! This is the only place that talks to `reqwest` and the only place that
//! turns HTTP status codes into [`ApiError`] variants.

use std::time::Duration;

use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Body of an outgoing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Text(String),
}

/// Fully described request against an adapter's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// JSON-over-HTTPS client bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpAdapter {
    base_url: Url,
    http: Client,
}

impl HttpAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> ApiResult<Self> {
        // Url::join drops the last segment unless the base ends in '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| ApiError::Config(format!("invalid base URL {base_url}: {e}")))?;
        Ok(Self { base_url, http })
    }

    /// Resolve `path` against the base URL and append query parameters.
    pub fn url(&self, path: &str, params: &[(String, String)]) -> ApiResult<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("invalid path {path}: {e}")))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send `request` and decode a JSON response.
    ///
    /// An empty 2xx body decodes as JSON `null`, so `()` and `Option<T>`
    /// work for endpoints without content.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let url = self.url(&request.path, &request.params)?;
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Text(text) => builder
                .header(header::CONTENT_TYPE, "text/plain")
                .body(text),
        };

        let response = builder.send().await.map_err(|e| {
            ApiError::Transport(format!("{} {} failed: {e}", request.method, request.path))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ApiError::Transport(format!("{} {} body: {e}", request.method, request.path))
        })?;

        if !status.is_success() {
            debug!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                "Backend returned error"
            );
            return Err(ApiError::from_response_body(status.as_u16(), &body));
        }

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "{} {} invalid JSON: {e}",
                request.method, request.path
            ))
        })
    }
}
