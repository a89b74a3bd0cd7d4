// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cached ownership proofs, one record per wallet address.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::{JsonStorageExt, KeyValueStorage, StorageResult};

/// Signed DFX challenge for an address, plus the last token it produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    pub address: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SignatureRecord {
    pub fn new(address: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            signature: signature.into(),
            token: None,
        }
    }
}

/// Storage-backed repository of [`SignatureRecord`]s.
#[derive(Clone)]
pub struct SignatureStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SignatureStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn key(address: &str) -> String {
        format!("signature-{address}")
    }

    pub fn get(&self, address: &str) -> StorageResult<Option<SignatureRecord>> {
        self.storage.read_json(&Self::key(address))
    }

    pub fn put(&self, record: &SignatureRecord) -> StorageResult<()> {
        self.storage.write_json(&Self::key(&record.address), record)
    }

    /// Attach `token` to the stored record, if one exists.
    pub fn set_token(&self, address: &str, token: &str) -> StorageResult<()> {
        if let Some(mut record) = self.get(address)? {
            record.token = Some(token.to_string());
            self.put(&record)?;
        }
        Ok(())
    }

    pub fn clear_token(&self, address: &str) -> StorageResult<()> {
        if let Some(mut record) = self.get(address)? {
            if record.token.take().is_some() {
                self.put(&record)?;
            }
        }
        Ok(())
    }

    pub fn delete(&self, address: &str) -> StorageResult<()> {
        self.storage.remove(&Self::key(address))
    }
}
