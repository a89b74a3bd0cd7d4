// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client error type.
//!
//! Backend failures arrive as JSON bodies of the form
//! `{"statusCode": 401, "message": "..."}`. The HTTP adapter maps the status
//! codes that drive the authentication flow onto dedicated variants so
//! callers match on a type instead of comparing numbers:
//!
//! | Status | Variant | Meaning |
//! |--------|---------|---------|
//! | 401 | [`ApiError::AuthExpired`] | Token or signature rejected |
//! | 403 | [`ApiError::RegionBlocked`] | Not allowed in the user's country |
//!
//! A 404 stays a [`ApiError::Backend`] error. Only the sign-in calls of the
//! authenticator turn it into [`ApiError::AccountNotFound`].

use serde::Deserialize;
use serde_json::Value;

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authorization rejected: {0}")]
    AuthExpired(String),

    #[error("Not allowed in country: {0}")]
    RegionBlocked(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Backend returned {status_code}: {message}")]
    Backend { status_code: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Response was invalid: {0}")]
    InvalidResponse(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration missing or invalid: {0}")]
    Config(String),
}

/// Result type for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by both backends.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    message: Option<Value>,
}

impl ApiError {
    /// Map an HTTP status and backend message onto the error taxonomy.
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 => Self::AuthExpired(message),
            403 => Self::RegionBlocked(message),
            _ => Self::Backend {
                status_code,
                message,
            },
        }
    }

    /// Build an error from a non-2xx response body.
    ///
    /// The body's `statusCode` wins over the transport status when present;
    /// unparseable bodies are kept verbatim as the message.
    pub fn from_response_body(http_status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                let status = parsed.status_code.unwrap_or(http_status);
                let message = parsed
                    .message
                    .map(message_to_string)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                Self::from_status(status, message)
            }
            Err(_) if body.trim().is_empty() => {
                Self::from_status(http_status, format!("HTTP {http_status}"))
            }
            Err(_) => Self::from_status(http_status, body.trim()),
        }
    }

    /// HTTP status code carried by this error, if it came from the backend.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthExpired(_) => Some(401),
            Self::RegionBlocked(_) => Some(403),
            Self::AccountNotFound(_) => Some(404),
            Self::Backend { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

fn message_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(message_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
