// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistent Storage Module
//!
//! Durable key/value persistence for session records and address/signature
//! pairs. The client only needs three operations (read, overwrite, remove)
//! on string values; JSON encoding is layered on top by [`JsonStorageExt`].
//!
//! ## Implementations
//!
//! - [`FileStorage`] - one JSON file per key, atomic writes via rename
//! - [`MemoryStorage`] - process-local map, used by tests
//!
//! All writers perform blind overwrites: the last write for a key wins.

pub mod file;
pub mod memory;
pub mod paths;

use std::io;

use serde::{de::DeserializeOwned, Serialize};

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use paths::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key contains characters that are not allowed in storage keys
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Storage root has not been created yet
    #[error("Storage not initialized")]
    NotInitialized,

    /// A previous writer panicked while holding the storage lock
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable string key/value store.
///
/// Implementations must be safe to share between tasks; every method is a
/// complete, independent operation.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if absent.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Typed JSON access on top of any [`KeyValueStorage`].
pub trait JsonStorageExt {
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>>;
    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()>;
}

impl<S: KeyValueStorage + ?Sized> JsonStorageExt for S {
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.read(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.write(key, &raw)
    }
}
