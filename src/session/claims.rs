// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session value object and the token claims it exposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::record::SessionRecord;
use super::roles::UserRole;

/// Claims of a DFX / LOCK access token.
///
/// The token is issued and verified by the backend; the client only reads
/// the claims it needs for renewal decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Wallet address the token was issued for
    pub address: String,

    /// Role of the user behind the address
    #[serde(default)]
    pub role: UserRole,

    /// Expiration timestamp (seconds)
    pub exp: i64,

    /// Issued at timestamp (seconds)
    #[serde(default)]
    pub iat: Option<i64>,

    /// Backend user id
    #[serde(default)]
    pub id: Option<u64>,
}

/// Decode token claims without verifying the signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token).map(|data| data.claims)
}

/// Authorization credential for one API domain.
///
/// Immutable: every storage read builds a new `Session`. A token whose
/// claims cannot be decoded yields a session that is neither logged in nor
/// valid, so a malformed token is always renewed and never trusted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    access_token: Option<String>,
    claims: Option<TokenClaims>,
}

impl Session {
    /// Session that carries no credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a session from a persisted record (or its absence).
    pub fn from_record(record: Option<SessionRecord>) -> Self {
        let access_token = record
            .and_then(|r| r.access_token)
            .filter(|t| !t.is_empty());

        let claims = access_token
            .as_deref()
            .and_then(|token| match decode_claims(token) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    warn!(error = %e, "Stored access token could not be decoded");
                    None
                }
            });

        Self {
            access_token,
            claims,
        }
    }

    /// Convenience constructor for a raw token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::from_record(Some(SessionRecord::new(token)))
    }

    /// The raw stored token, decodable or not.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn claims(&self) -> Option<&TokenClaims> {
        self.claims.as_ref()
    }

    pub fn address(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.address.as_str())
    }

    pub fn role(&self) -> UserRole {
        self.claims.as_ref().map(|c| c.role).unwrap_or_default()
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.claims
            .as_ref()
            .and_then(|c| DateTime::from_timestamp(c.exp, 0))
    }

    /// A decodable token is present.
    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some() && self.claims.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expired relative to `now`; sessions without claims are always expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires() {
            Some(expires) => now > expires,
            None => true,
        }
    }

    pub fn is_beta_user(&self) -> bool {
        self.role().is_beta()
    }
}
