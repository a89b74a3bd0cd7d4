// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet-based sign-in against the DFX and LOCK backends.
//!
//! ## DFX Flow
//!
//! 1. Reuse the cached signature for the address, or fetch the challenge
//!    from `auth/sign-message` and sign it with the wallet
//! 2. `POST auth/signIn` with address and signature
//! 3. On success store the token next to the signature
//! 4. `401`: the signature is stale; replace it with a fresh one and fail
//! 5. `403`: remember that the user's country is blocked and fail
//! 6. `404`: no account yet; `POST auth/signUp` and use that token
//!
//! LOCK follows the same steps with its own endpoints, except that the
//! challenge is signed on every sign-in and nothing is cached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::signatures::{SignatureRecord, SignatureStore};
use crate::api::models::{
    AuthCredentials, AuthResponse, LockSignUpRequest, SignMessage, SignUpRequest,
};
use crate::domain::ApiDomain;
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiRequest, HttpAdapter};
use crate::session::{Session, TokenRenewer};
use crate::storage::KeyValueStorage;
use crate::wallet::WalletSigner;

/// Wallet name sent on LOCK sign-up when none is configured.
pub const DEFAULT_WALLET_NAME: &str = "DFX Wallet";

/// Values sent along with a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpSettings {
    /// DFX wallet id
    pub wallet_id: u32,
    /// Referral code of the user who invited this wallet
    pub used_ref: Option<String>,
    /// Wallet name reported to LOCK
    pub wallet_name: String,
}

impl Default for SignUpSettings {
    fn default() -> Self {
        Self {
            wallet_id: 1,
            used_ref: None,
            wallet_name: DEFAULT_WALLET_NAME.to_string(),
        }
    }
}

/// Obtains access tokens by proving ownership of the active wallet.
pub struct WalletAuthenticator {
    dfx: HttpAdapter,
    lock: HttpAdapter,
    signatures: SignatureStore,
    settings: SignUpSettings,
    wallet: RwLock<Option<Arc<WalletSigner>>>,
    dfx_blocked: AtomicBool,
    lock_blocked: AtomicBool,
}

impl WalletAuthenticator {
    pub fn new(
        dfx: HttpAdapter,
        lock: HttpAdapter,
        storage: Arc<dyn KeyValueStorage>,
        settings: SignUpSettings,
    ) -> Self {
        Self {
            dfx,
            lock,
            signatures: SignatureStore::new(storage),
            settings,
            wallet: RwLock::new(None),
            dfx_blocked: AtomicBool::new(false),
            lock_blocked: AtomicBool::new(false),
        }
    }

    /// Switch the wallet used for signing, or clear it with `None`.
    pub async fn set_active_wallet(&self, wallet: Option<Arc<WalletSigner>>) {
        match &wallet {
            Some(w) => info!(address = %w.address(), "Active wallet changed"),
            None => info!("Active wallet cleared"),
        }
        *self.wallet.write().await = wallet;
    }

    pub async fn active_wallet(&self) -> Option<Arc<WalletSigner>> {
        self.wallet.read().await.clone()
    }

    pub fn signatures(&self) -> &SignatureStore {
        &self.signatures
    }

    /// The backend of `domain` refused the user's country.
    pub fn is_not_allowed_in_country(&self, domain: ApiDomain) -> bool {
        self.block_flag(domain).load(Ordering::SeqCst)
    }

    /// Allow authentication attempts for `domain` again.
    pub fn clear_country_block(&self, domain: ApiDomain) {
        self.block_flag(domain).store(false, Ordering::SeqCst);
    }

    /// Sign `message` for `address`.
    ///
    /// Without a message the DFX challenge for the address is fetched,
    /// signed and persisted as the address's [`SignatureRecord`].
    pub async fn create_signature(&self, address: &str, message: Option<&str>) -> ApiResult<String> {
        let wallet = self.wallet_for(address).await?;

        if let Some(message) = message {
            return wallet.sign_message(message).await;
        }

        let challenge = self.challenge(ApiDomain::Dfx, address).await?;
        let signature = wallet.sign_message(&challenge).await?;
        self.signatures
            .put(&SignatureRecord::new(address, signature.clone()))?;
        debug!(address = %address, "Stored new DFX signature");
        Ok(signature)
    }

    /// Sign in to DFX for `address`, creating the account if necessary.
    pub async fn create_web_token(&self, address: &str) -> ApiResult<String> {
        self.ensure_allowed(ApiDomain::Dfx)?;

        let signature = match self.signatures.get(address)? {
            Some(record) => record.signature,
            None => self.create_signature(address, None).await?,
        };
        let credentials = AuthCredentials {
            address: address.to_string(),
            signature,
        };

        match self
            .authenticate(ApiDomain::Dfx, "auth/signIn", &credentials)
            .await
        {
            Ok(token) => {
                self.signatures.set_token(address, &token)?;
                Ok(token)
            }
            Err(ApiError::AuthExpired(message)) => {
                warn!(address = %address, "DFX rejected signature, signing a new one");
                self.signatures.delete(address)?;
                if let Err(e) = self.create_signature(address, None).await {
                    warn!(address = %address, error = %e, "Re-signing DFX challenge failed");
                }
                Err(ApiError::AuthExpired(message))
            }
            Err(ApiError::AccountNotFound(_)) => {
                info!(address = %address, "No DFX account, signing up");
                let request = SignUpRequest {
                    address: credentials.address,
                    signature: credentials.signature,
                    wallet_id: self.settings.wallet_id,
                    used_ref: self.settings.used_ref.clone(),
                };
                let token = self
                    .authenticate(ApiDomain::Dfx, "auth/signUp", &request)
                    .await?;
                self.signatures.set_token(address, &token)?;
                Ok(token)
            }
            Err(e) => Err(e),
        }
    }

    /// Cached DFX token of the active wallet when still usable, otherwise a
    /// fresh one. `None` without an active wallet.
    pub async fn get_active_web_token(&self) -> ApiResult<Option<String>> {
        let Some(wallet) = self.active_wallet().await else {
            return Ok(None);
        };
        let address = wallet.address();

        if let Some(token) = self.signatures.get(address)?.and_then(|r| r.token) {
            let session = Session::from_token(token.as_str());
            if session.is_logged_in()
                && !session.is_expired()
                && session.address() == Some(address)
            {
                return Ok(Some(token));
            }
        }

        self.create_web_token(address).await.map(Some)
    }

    /// Sign in to LOCK with the active wallet, creating the account if
    /// necessary. `None` without an active wallet.
    pub async fn lock_create_web_token(&self) -> ApiResult<Option<String>> {
        self.ensure_allowed(ApiDomain::Lock)?;

        let Some(wallet) = self.active_wallet().await else {
            return Ok(None);
        };
        let address = wallet.address().to_string();

        let challenge = self.challenge(ApiDomain::Lock, &address).await?;
        let signature = wallet.sign_message(&challenge).await?;
        let credentials = AuthCredentials {
            address: address.clone(),
            signature,
        };

        match self
            .authenticate(ApiDomain::Lock, "auth/sign-in", &credentials)
            .await
        {
            Ok(token) => Ok(Some(token)),
            Err(ApiError::AccountNotFound(_)) => {
                info!(address = %address, "No LOCK account, signing up");
                let request = LockSignUpRequest {
                    address: credentials.address,
                    signature: credentials.signature,
                    wallet_name: self.settings.wallet_name.clone(),
                };
                self.authenticate(ApiDomain::Lock, "auth/sign-up", &request)
                    .await
                    .map(Some)
            }
            Err(e) => Err(e),
        }
    }

    async fn wallet_for(&self, address: &str) -> ApiResult<Arc<WalletSigner>> {
        match self.active_wallet().await {
            Some(wallet) if wallet.address() == address => Ok(wallet),
            _ => Err(ApiError::Signing(format!("no wallet available for {address}"))),
        }
    }

    async fn challenge(&self, domain: ApiDomain, address: &str) -> ApiResult<String> {
        let response: SignMessage = self
            .adapter(domain)
            .send(ApiRequest::get("auth/sign-message").param("address", address))
            .await?;
        Ok(response.message)
    }

    /// Anonymous sign-in or sign-up call returning the access token. A 404
    /// means the address has no account yet.
    async fn authenticate<B: Serialize>(
        &self,
        domain: ApiDomain,
        path: &str,
        body: &B,
    ) -> ApiResult<String> {
        self.ensure_allowed(domain)?;

        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("failed to encode {path}: {e}")))?;
        let result: ApiResult<AuthResponse> = self
            .adapter(domain)
            .send(ApiRequest::post(path).json(body))
            .await;

        match result {
            Ok(response) => {
                debug!(domain = %domain, path = %path, "Authenticated");
                Ok(response.access_token)
            }
            Err(ApiError::RegionBlocked(message)) => {
                warn!(domain = %domain, "Backend not available in user's country");
                self.block_flag(domain).store(true, Ordering::SeqCst);
                Err(ApiError::RegionBlocked(message))
            }
            Err(ApiError::Backend {
                status_code: 404,
                message,
            }) => Err(ApiError::AccountNotFound(message)),
            Err(e) => Err(e),
        }
    }

    fn ensure_allowed(&self, domain: ApiDomain) -> ApiResult<()> {
        if self.is_not_allowed_in_country(domain) {
            return Err(ApiError::RegionBlocked(format!(
                "{domain} is not available in your country"
            )));
        }
        Ok(())
    }

    fn adapter(&self, domain: ApiDomain) -> &HttpAdapter {
        match domain {
            ApiDomain::Dfx => &self.dfx,
            ApiDomain::Lock => &self.lock,
        }
    }

    fn block_flag(&self, domain: ApiDomain) -> &AtomicBool {
        match domain {
            ApiDomain::Dfx => &self.dfx_blocked,
            ApiDomain::Lock => &self.lock_blocked,
        }
    }
}

#[async_trait]
impl TokenRenewer for WalletAuthenticator {
    async fn active_address(&self) -> Option<String> {
        self.active_wallet().await.map(|w| w.address().to_string())
    }

    async fn dfx_token(&self) -> ApiResult<Option<String>> {
        self.get_active_web_token().await
    }

    async fn lock_token(&self) -> ApiResult<Option<String>> {
        self.lock_create_web_token().await
    }

    async fn invalidate(&self, domain: ApiDomain) -> ApiResult<()> {
        if domain == ApiDomain::Dfx {
            if let Some(address) = self.active_address().await {
                self.signatures.clear_token(&address)?;
            }
        }
        Ok(())
    }
}
