// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Passphrase prompt capability and unlock cache.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::ApiResult;

/// Secret entered by the user to unlock an encrypted wallet.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase(String);

impl Passphrase {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase(***)")
    }
}

/// Why the user is being asked for the passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReason {
    /// Prove ownership of `address` to a backend
    SignMessage { address: String },
}

/// Asks the user for the wallet passphrase.
///
/// Implementations may wait indefinitely; a dismissed prompt must resolve
/// to an error rather than hang.
#[async_trait]
pub trait PassphrasePrompter: Send + Sync {
    async fn request(&self, reason: &PromptReason) -> ApiResult<Passphrase>;
}

/// Last passphrase that successfully unlocked the wallet.
#[derive(Debug, Default)]
pub struct PassphraseCache {
    inner: RwLock<Option<Passphrase>>,
}

impl PassphraseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Passphrase> {
        self.inner.read().await.clone()
    }

    pub async fn remember(&self, passphrase: Passphrase) {
        *self.inner.write().await = Some(passphrase);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}
