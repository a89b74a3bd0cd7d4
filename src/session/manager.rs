// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-domain session management with lazy renewal.
//!
//! ## Renewal Flow
//!
//! 1. Read the persisted record for the domain and build a [`Session`]
//! 2. The session is trusted when its token is long enough, not expired
//!    and issued for the wallet's active address
//! 3. Otherwise ask the [`TokenRenewer`] for a fresh token, persist it and
//!    read storage again. Without a wallet an already logged-out session is
//!    left untouched
//!
//! Renewal is serialized per domain: callers that find an invalid session
//! while another renewal is running wait for it and then re-check storage,
//! so a burst of requests produces a single sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use super::claims::Session;
use super::record::SessionRecord;
use crate::domain::ApiDomain;
use crate::error::ApiResult;
use crate::storage::{JsonStorageExt, KeyValueStorage};

/// Tokens shorter than this are treated as missing.
pub const MIN_TOKEN_LENGTH: usize = 10;

/// Capacity of the session update broadcast channel.
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Strategy that mints fresh tokens for the session manager.
#[async_trait]
pub trait TokenRenewer: Send + Sync {
    /// Address of the wallet currently in use, if any.
    async fn active_address(&self) -> Option<String>;

    /// Fresh DFX token for the active wallet, `None` without a wallet.
    async fn dfx_token(&self) -> ApiResult<Option<String>>;

    /// Fresh LOCK token for the active wallet, `None` without a wallet.
    async fn lock_token(&self) -> ApiResult<Option<String>>;

    /// Called after the backend rejected the session of `domain`.
    async fn invalidate(&self, _domain: ApiDomain) -> ApiResult<()> {
        Ok(())
    }
}

/// Published whenever a session record is written.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub domain: ApiDomain,
    pub record: SessionRecord,
}

/// Single source of truth for the current session of each API domain.
///
/// Construct once at startup and share behind an `Arc`.
pub struct SessionManager {
    storage: Arc<dyn KeyValueStorage>,
    renewer: Arc<dyn TokenRenewer>,
    updates: broadcast::Sender<SessionUpdate>,
    dfx_renewal: Mutex<()>,
    lock_renewal: Mutex<()>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn KeyValueStorage>, renewer: Arc<dyn TokenRenewer>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            storage,
            renewer,
            updates,
            dfx_renewal: Mutex::new(()),
            lock_renewal: Mutex::new(()),
        }
    }

    /// Current valid session for `domain`, renewing it when necessary.
    ///
    /// With `no_credential` an anonymous session is returned without
    /// touching storage or the renewer.
    pub async fn session(&self, no_credential: bool, domain: ApiDomain) -> ApiResult<Session> {
        if no_credential {
            return Ok(Session::anonymous());
        }

        let session = self.get_session(domain)?;
        if self.is_valid(&session).await {
            return Ok(session);
        }

        let _guard = self.renewal_lock(domain).lock().await;

        let session = self.get_session(domain)?;
        if self.is_valid(&session).await {
            debug!(domain = %domain, "Session renewed by concurrent caller");
            return Ok(session);
        }

        info!(domain = %domain, "Renewing session");
        let token = match domain {
            ApiDomain::Dfx => self.renewer.dfx_token().await?,
            ApiDomain::Lock => self.renewer.lock_token().await?,
        };
        if token.is_none() {
            if session.access_token().is_none() {
                debug!(domain = %domain, "No active wallet, session already logged out");
                return Ok(session);
            }
            warn!(domain = %domain, "No active wallet, storing logged-out session");
        }

        self.update_session(
            SessionRecord {
                access_token: token,
            },
            domain,
        )?;
        self.get_session(domain)
    }

    /// Raw read of the persisted session, never triggers renewal.
    pub fn get_session(&self, domain: ApiDomain) -> ApiResult<Session> {
        let record: Option<SessionRecord> = self.storage.read_json(domain.session_key())?;
        Ok(Session::from_record(record))
    }

    /// Persist `record` for `domain` and publish it to subscribers.
    pub fn update_session(&self, record: SessionRecord, domain: ApiDomain) -> ApiResult<()> {
        self.storage.write_json(domain.session_key(), &record)?;
        // No subscribers is fine.
        let _ = self.updates.send(SessionUpdate { domain, record });
        Ok(())
    }

    /// Log out of `domain`.
    pub fn delete_session(&self, domain: ApiDomain) -> ApiResult<()> {
        self.update_session(SessionRecord::empty(), domain)
    }

    /// Drop a session the backend rejected and let the renewer forget any
    /// cached credential for it.
    pub async fn invalidate(&self, domain: ApiDomain) -> ApiResult<()> {
        warn!(domain = %domain, "Backend rejected session, clearing it");
        self.delete_session(domain)?;
        self.renewer.invalidate(domain).await
    }

    /// Receive every subsequent session write.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates.subscribe()
    }

    async fn is_valid(&self, session: &Session) -> bool {
        let long_enough = session
            .access_token()
            .is_some_and(|t| t.len() >= MIN_TOKEN_LENGTH);
        if !long_enough || session.is_expired() {
            return false;
        }
        match self.renewer.active_address().await {
            Some(active) => session.address() == Some(active.as_str()),
            None => true,
        }
    }

    fn renewal_lock(&self, domain: ApiDomain) -> &Mutex<()> {
        match domain {
            ApiDomain::Dfx => &self.dfx_renewal,
            ApiDomain::Lock => &self.lock_renewal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::mint_token;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingRenewer {
        address: Option<String>,
        dfx_calls: AtomicUsize,
        lock_calls: AtomicUsize,
        invalidations: AtomicUsize,
        delay: Duration,
    }

    impl CountingRenewer {
        fn new(address: &str) -> Self {
            Self {
                address: Some(address.to_string()),
                dfx_calls: AtomicUsize::new(0),
                lock_calls: AtomicUsize::new(0),
                invalidations: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl TokenRenewer for CountingRenewer {
        async fn active_address(&self) -> Option<String> {
            self.address.clone()
        }

        async fn dfx_token(&self) -> ApiResult<Option<String>> {
            self.dfx_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(self
                .address
                .as_deref()
                .map(|a| mint_token(a, "User", 3600)))
        }

        async fn lock_token(&self) -> ApiResult<Option<String>> {
            self.lock_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .address
                .as_deref()
                .map(|a| mint_token(a, "User", 3600)))
        }

        async fn invalidate(&self, _domain: ApiDomain) -> ApiResult<()> {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Storage that counts reads, to prove anonymous sessions never touch it.
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        reads: AtomicUsize,
    }

    impl KeyValueStorage for CountingStorage {
        fn read(&self, key: &str) -> crate::storage::StorageResult<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> crate::storage::StorageResult<()> {
            self.inner.write(key, value)
        }

        fn remove(&self, key: &str) -> crate::storage::StorageResult<()> {
            self.inner.remove(key)
        }
    }

    fn build_manager(renewer: Arc<CountingRenewer>) -> (Arc<MemoryStorage>, SessionManager) {
        let storage = Arc::new(MemoryStorage::new());
        let manager = SessionManager::new(storage.clone(), renewer);
        (storage, manager)
    }

    #[tokio::test]
    async fn no_credential_returns_anonymous_without_storage_or_renewal() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let storage = Arc::new(CountingStorage::default());
        let manager = SessionManager::new(storage.clone(), renewer.clone());

        for domain in ApiDomain::ALL {
            let session = manager.session(true, domain).await.unwrap();
            assert!(!session.is_logged_in());
        }

        assert_eq!(storage.reads.load(Ordering::SeqCst), 0);
        assert_eq!(renewer.dfx_calls.load(Ordering::SeqCst), 0);
        assert_eq!(renewer.lock_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_session_is_returned_without_renewal() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let (_, manager) = build_manager(renewer.clone());
        let token = mint_token("df1qalice", "User", 3600);
        manager
            .update_session(SessionRecord::new(token.clone()), ApiDomain::Dfx)
            .unwrap();

        let session = manager.session(false, ApiDomain::Dfx).await.unwrap();
        assert_eq!(session.access_token(), Some(token.as_str()));
        assert_eq!(renewer.dfx_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn address_mismatch_triggers_exactly_one_renewal() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let (_, manager) = build_manager(renewer.clone());
        manager
            .update_session(
                SessionRecord::new(mint_token("df1qbob", "User", 3600)),
                ApiDomain::Dfx,
            )
            .unwrap();

        let session = manager.session(false, ApiDomain::Dfx).await.unwrap();
        assert_eq!(session.address(), Some("df1qalice"));
        assert_eq!(renewer.dfx_calls.load(Ordering::SeqCst), 1);
        assert_eq!(renewer.lock_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_session_is_renewed_for_its_domain() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let (_, manager) = build_manager(renewer.clone());
        manager
            .update_session(
                SessionRecord::new(mint_token("df1qalice", "User", -10)),
                ApiDomain::Lock,
            )
            .unwrap();

        let session = manager.session(false, ApiDomain::Lock).await.unwrap();
        assert!(!session.is_expired());
        assert_eq!(renewer.lock_calls.load(Ordering::SeqCst), 1);
        assert_eq!(renewer.dfx_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn short_token_is_renewed() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let (_, manager) = build_manager(renewer.clone());
        manager
            .update_session(SessionRecord::new("abc"), ApiDomain::Dfx)
            .unwrap();

        manager.session(false, ApiDomain::Dfx).await.unwrap();
        assert_eq!(renewer.dfx_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lock_update_does_not_touch_default_domain() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let (_, manager) = build_manager(renewer);
        let dfx_token = mint_token("df1qalice", "User", 3600);
        manager
            .update_session(SessionRecord::new(dfx_token.clone()), ApiDomain::Dfx)
            .unwrap();

        manager
            .update_session(SessionRecord::new("X"), ApiDomain::Lock)
            .unwrap();

        assert_eq!(
            manager.get_session(ApiDomain::Lock).unwrap().access_token(),
            Some("X")
        );
        assert_eq!(
            manager.get_session(ApiDomain::Dfx).unwrap().access_token(),
            Some(dfx_token.as_str())
        );
    }

    #[tokio::test]
    async fn delete_session_clears_only_that_domain() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let (storage, manager) = build_manager(renewer);
        manager
            .update_session(SessionRecord::new("token-dfx-123"), ApiDomain::Dfx)
            .unwrap();
        manager
            .update_session(SessionRecord::new("token-lock-123"), ApiDomain::Lock)
            .unwrap();

        manager.delete_session(ApiDomain::Dfx).unwrap();

        assert_eq!(storage.read("session").unwrap().as_deref(), Some("{}"));
        assert_eq!(
            manager.get_session(ApiDomain::Lock).unwrap().access_token(),
            Some("token-lock-123")
        );
    }

    #[tokio::test]
    async fn updates_are_broadcast() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let (_, manager) = build_manager(renewer);
        let mut updates = manager.subscribe();

        manager
            .update_session(SessionRecord::new("token-lock-123"), ApiDomain::Lock)
            .unwrap();

        let update = updates.recv().await.unwrap();
        assert_eq!(update.domain, ApiDomain::Lock);
        assert_eq!(update.record, SessionRecord::new("token-lock-123"));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_renewal() {
        let mut renewer = CountingRenewer::new("df1qalice");
        renewer.delay = Duration::from_millis(50);
        let renewer = Arc::new(renewer);
        let (_, manager) = build_manager(renewer.clone());
        let manager = Arc::new(manager);

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.session(false, ApiDomain::Dfx).await })
            })
            .collect();

        for task in tasks {
            let session = task.await.unwrap().unwrap();
            assert!(session.is_logged_in());
        }
        assert_eq!(renewer.dfx_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_wallet_stores_logged_out_session() {
        let mut renewer = CountingRenewer::new("unused");
        renewer.address = None;
        let renewer = Arc::new(renewer);
        let (_, manager) = build_manager(renewer.clone());

        let session = manager.session(false, ApiDomain::Dfx).await.unwrap();
        assert!(!session.is_logged_in());
        assert_eq!(renewer.dfx_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_wallet_writes_logged_out_session_once() {
        let mut renewer = CountingRenewer::new("unused");
        renewer.address = None;
        let renewer = Arc::new(renewer);
        let (storage, manager) = build_manager(renewer.clone());
        manager
            .update_session(SessionRecord::new("abc"), ApiDomain::Dfx)
            .unwrap();
        let mut updates = manager.subscribe();

        manager.session(false, ApiDomain::Dfx).await.unwrap();
        manager.session(false, ApiDomain::Dfx).await.unwrap();

        let update = updates.try_recv().unwrap();
        assert_eq!(update.record, SessionRecord::empty());
        assert!(matches!(
            updates.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        assert_eq!(storage.read("session").unwrap().as_deref(), Some("{}"));
        assert_eq!(renewer.dfx_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn no_wallet_leaves_missing_session_unwritten() {
        let mut renewer = CountingRenewer::new("unused");
        renewer.address = None;
        let renewer = Arc::new(renewer);
        let (storage, manager) = build_manager(renewer.clone());
        let mut updates = manager.subscribe();

        manager.session(false, ApiDomain::Lock).await.unwrap();
        manager.session(false, ApiDomain::Lock).await.unwrap();

        assert!(matches!(
            updates.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        assert_eq!(storage.read(ApiDomain::Lock.session_key()).unwrap(), None);
    }

    #[tokio::test]
    async fn invalidate_clears_session_and_notifies_renewer() {
        let renewer = Arc::new(CountingRenewer::new("df1qalice"));
        let (_, manager) = build_manager(renewer.clone());
        manager
            .update_session(
                SessionRecord::new(mint_token("df1qalice", "User", 3600)),
                ApiDomain::Dfx,
            )
            .unwrap();

        manager.invalidate(ApiDomain::Dfx).await.unwrap();

        assert_eq!(
            manager.get_session(ApiDomain::Dfx).unwrap().access_token(),
            None
        );
        assert_eq!(renewer.invalidations.load(Ordering::SeqCst), 1);
    }
}
