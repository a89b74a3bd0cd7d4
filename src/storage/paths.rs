// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the file-backed key/value layout.

use std::path::{Path, PathBuf};

use super::{StorageError, StorageResult};

/// Default directory for persisted sessions and signatures.
pub const DATA_ROOT: &str = "./data";

/// Extension used for every stored entry.
const ENTRY_EXTENSION: &str = "json";

/// Storage path utilities.
///
/// Every key maps to exactly one file directly under the root:
///
/// ```text
/// {root}/
///   session.json              # DFX session record
///   session-LOCK.json         # LOCK session record
///   signature-{address}.json  # address/signature pair
/// ```
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all stored entries.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    ///
    /// Keys are restricted to ASCII alphanumerics, `-` and `_` so that a key
    /// can never escape the root directory.
    pub fn entry(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{ENTRY_EXTENSION}")))
    }

    /// Temporary sibling used for atomic writes of `key`.
    pub fn temp_entry(&self, key: &str, nonce: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!(".{key}.{nonce}.tmp")))
    }
}

/// Reject keys that are empty or contain path-significant characters.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
