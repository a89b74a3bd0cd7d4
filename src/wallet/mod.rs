// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Module
//!
//! Boundary to the wallet that proves address ownership. Key derivation and
//! transaction handling live in the wallet SDK; this module only needs an
//! address and a way to sign a message for it.
//!
//! ## Protection Types
//!
//! - Unprotected: the key is available and signs immediately
//! - Encrypted: the key must be unlocked with the user's passphrase, which
//!   is taken from the [`PassphraseCache`] or requested through the injected
//!   [`PassphrasePrompter`]

pub mod prompt;
pub mod signing;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

pub use prompt::{Passphrase, PassphraseCache, PassphrasePrompter, PromptReason};
pub use signing::{message_digest, recover_signer, LocalKey, MESSAGE_MAGIC};

use crate::error::{ApiError, ApiResult};

/// Passphrase-encrypted key material held by the wallet SDK.
#[async_trait]
pub trait EncryptedKeystore: Send + Sync {
    /// Decrypt the signing key; a wrong passphrase is an error.
    async fn unlock(&self, passphrase: &Passphrase) -> ApiResult<LocalKey>;
}

/// How the wallet's key is protected.
pub enum WalletProtection {
    Unprotected(LocalKey),
    Encrypted {
        keystore: Arc<dyn EncryptedKeystore>,
        prompter: Arc<dyn PassphrasePrompter>,
    },
}

/// Active wallet account: an address plus the means to sign for it.
pub struct WalletSigner {
    address: String,
    protection: WalletProtection,
    passphrase_cache: PassphraseCache,
}

impl WalletSigner {
    pub fn unprotected(address: impl Into<String>, key: LocalKey) -> Self {
        Self {
            address: address.into(),
            protection: WalletProtection::Unprotected(key),
            passphrase_cache: PassphraseCache::new(),
        }
    }

    pub fn encrypted(
        address: impl Into<String>,
        keystore: Arc<dyn EncryptedKeystore>,
        prompter: Arc<dyn PassphrasePrompter>,
    ) -> Self {
        Self {
            address: address.into(),
            protection: WalletProtection::Encrypted { keystore, prompter },
            passphrase_cache: PassphraseCache::new(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self.protection, WalletProtection::Encrypted { .. })
    }

    pub fn passphrase_cache(&self) -> &PassphraseCache {
        &self.passphrase_cache
    }

    /// Sign `message` with the wallet key, prompting for the passphrase if
    /// the wallet is encrypted and no unlocked passphrase is cached.
    pub async fn sign_message(&self, message: &str) -> ApiResult<String> {
        match &self.protection {
            WalletProtection::Unprotected(key) => key.sign_message(message),
            WalletProtection::Encrypted { keystore, prompter } => {
                let passphrase = match self.passphrase_cache.get().await {
                    Some(cached) => cached,
                    None => {
                        debug!(address = %self.address, "Requesting wallet passphrase");
                        let reason = PromptReason::SignMessage {
                            address: self.address.clone(),
                        };
                        prompter.request(&reason).await?
                    }
                };

                let key = match keystore.unlock(&passphrase).await {
                    Ok(key) => key,
                    Err(e) => {
                        warn!(address = %self.address, error = %e, "Wallet unlock failed");
                        self.passphrase_cache.clear().await;
                        return Err(match e {
                            ApiError::Signing(_) => e,
                            other => ApiError::Signing(other.to_string()),
                        });
                    }
                };

                self.passphrase_cache.remember(passphrase).await;
                key.sign_message(message)
            }
        }
    }
}
