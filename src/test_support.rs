// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for unit tests.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

/// Mint an HS256 token with the claims the backends issue.
///
/// `expires_in` is relative to now and may be negative.
pub fn mint_token(address: &str, role: &str, expires_in: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = json!({
        "id": 7,
        "address": address,
        "role": role,
        "iat": now,
        "exp": now + expires_in,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("token encodes")
}
