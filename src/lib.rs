// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DFX Wallet Client - session handling for the DFX and LOCK backends
//!
//! Keeps one access token per backend, signs in with the active wallet
//! whenever a token is missing, expired or issued for another address,
//! and wraps the endpoints the wallet uses.
//!
//! ## Modules
//!
//! - `api` - Authenticated fetch and endpoint wrappers
//! - `auth` - Wallet sign-in / sign-up and cached signatures
//! - `session` - Session value object and per-domain session manager
//! - `storage` - Key/value persistence (file and in-memory)
//! - `wallet` - Message signing and passphrase handling

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod session;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod wallet;

#[cfg(test)]
mod test_support;

pub use domain::ApiDomain;
pub use error::{ApiError, ApiResult};
pub use state::ClientState;
