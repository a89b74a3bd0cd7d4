// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Module
//!
//! One bearer session per API domain, persisted as
//! `{"accessToken": "..."}` under `"session"` (DFX) and `"session-LOCK"`
//! (LOCK).
//!
//! - [`Session`] - immutable view of a stored token and its decoded claims
//! - [`SessionManager`] - reads, writes and lazily renews sessions
//! - [`TokenRenewer`] - injected strategy that mints fresh tokens

pub mod claims;
pub mod manager;
pub mod record;
pub mod roles;

pub use claims::{decode_claims, Session, TokenClaims};
pub use manager::{SessionManager, SessionUpdate, TokenRenewer, MIN_TOKEN_LENGTH};
pub use record::SessionRecord;
pub use roles::UserRole;
