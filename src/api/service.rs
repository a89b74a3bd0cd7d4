// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated fetch against either backend.

use std::sync::Arc;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::domain::ApiDomain;
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiRequest, HttpAdapter, RequestBody};
use crate::session::SessionManager;

/// Per-call options of [`ApiService::fetch_from`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Send the body as plain text instead of JSON
    pub no_json: bool,
    /// Skip session resolution and send the request anonymously
    pub no_credential: bool,
    /// Query parameters
    pub params: Vec<(String, String)>,
}

impl FetchOptions {
    pub fn anonymous() -> Self {
        Self {
            no_credential: true,
            ..Self::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// Entry point for every backend call that may need a session.
pub struct ApiService {
    sessions: Arc<SessionManager>,
    dfx: HttpAdapter,
    lock: HttpAdapter,
}

impl ApiService {
    pub fn new(sessions: Arc<SessionManager>, dfx: HttpAdapter, lock: HttpAdapter) -> Self {
        Self {
            sessions,
            dfx,
            lock,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Call `path` on the DFX backend.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> ApiResult<T> {
        self.fetch_from(ApiDomain::Dfx, path, method, body, FetchOptions::default())
            .await
    }

    /// Call `path` on `domain`, attaching the domain's session token.
    ///
    /// A `401` drops the domain's session before the error is returned, so
    /// the next call signs in again.
    pub async fn fetch_from<T: DeserializeOwned>(
        &self,
        domain: ApiDomain,
        path: &str,
        method: Method,
        body: Option<Value>,
        options: FetchOptions,
    ) -> ApiResult<T> {
        let session = self.sessions.session(options.no_credential, domain).await?;
        let bearer = session
            .is_logged_in()
            .then(|| session.access_token().map(str::to_string))
            .flatten();

        let mut request = ApiRequest::new(method, path).bearer(bearer);
        request.params = options.params;
        request.body = match body {
            None => RequestBody::Empty,
            Some(Value::String(text)) if options.no_json => RequestBody::Text(text),
            Some(value) if options.no_json => RequestBody::Text(value.to_string()),
            Some(value) => RequestBody::Json(value),
        };

        let result = self.adapter(domain).send(request).await;
        if let Err(ApiError::AuthExpired(_)) = &result {
            if !options.no_credential {
                self.sessions.invalidate(domain).await?;
            }
        }
        result
    }

    pub async fn get<T: DeserializeOwned>(&self, domain: ApiDomain, path: &str) -> ApiResult<T> {
        self.fetch_from(domain, path, Method::GET, None, FetchOptions::default())
            .await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        domain: ApiDomain,
        path: &str,
        options: FetchOptions,
    ) -> ApiResult<T> {
        self.fetch_from(domain, path, Method::GET, None, options)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        domain: ApiDomain,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = encode(path, body)?;
        self.fetch_from(domain, path, Method::POST, Some(body), FetchOptions::default())
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        domain: ApiDomain,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = encode(path, body)?;
        self.fetch_from(domain, path, Method::PUT, Some(body), FetchOptions::default())
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        domain: ApiDomain,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = encode(path, body)?;
        self.fetch_from(domain, path, Method::PATCH, Some(body), FetchOptions::default())
            .await
    }

    fn adapter(&self, domain: ApiDomain) -> &HttpAdapter {
        match domain {
            ApiDomain::Dfx => &self.dfx,
            ApiDomain::Lock => &self.lock,
        }
    }
}

fn encode<B: Serialize>(path: &str, body: &B) -> ApiResult<Value> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::InvalidResponse(format!("failed to encode body for {path}: {e}")))
}
