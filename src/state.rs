// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wiring of the client components.

use std::sync::Arc;

use crate::api::{ApiService, DfxApi, LockApi};
use crate::auth::WalletAuthenticator;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::http::HttpAdapter;
use crate::session::SessionManager;
use crate::storage::KeyValueStorage;

/// Every long-lived component of the client, built once at startup.
#[derive(Clone)]
pub struct ClientState {
    pub sessions: Arc<SessionManager>,
    pub authenticator: Arc<WalletAuthenticator>,
    pub api: Arc<ApiService>,
    pub dfx: DfxApi,
    pub lock: LockApi,
}

impl ClientState {
    pub fn new(config: &ClientConfig, storage: Arc<dyn KeyValueStorage>) -> ApiResult<Self> {
        let dfx_http = HttpAdapter::new(&config.dfx_api_url, config.http_timeout)?;
        let lock_http = HttpAdapter::new(&config.lock_api_url, config.http_timeout)?;

        let authenticator = Arc::new(WalletAuthenticator::new(
            dfx_http.clone(),
            lock_http.clone(),
            storage.clone(),
            config.sign_up.clone(),
        ));
        let sessions = Arc::new(SessionManager::new(storage, authenticator.clone()));
        let api = Arc::new(ApiService::new(sessions.clone(), dfx_http, lock_http));

        Ok(Self {
            sessions,
            dfx: DfxApi::new(api.clone()),
            lock: LockApi::new(api.clone(), authenticator.clone()),
            authenticator,
            api,
        })
    }
}
