// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Obtains DFX and LOCK access tokens by proving ownership of the active
//! wallet's address.
//!
//! ## Auth Flow
//!
//! 1. The backend hands out a challenge message for the address
//! 2. The wallet signs it (prompting for the passphrase if encrypted)
//! 3. Address and signature are exchanged for a JWT at sign-in, or at
//!    sign-up when the backend does not know the address yet
//!
//! ## Caching
//!
//! - DFX signatures are stored per address together with the last token,
//!   so a restart does not require signing again
//! - LOCK challenges are signed on every sign-in
//! - A `403` marks the domain as blocked for the user's country until
//!   explicitly cleared

pub mod authenticator;
pub mod signatures;

pub use authenticator::{SignUpSettings, WalletAuthenticator, DEFAULT_WALLET_NAME};
pub use signatures::{SignatureRecord, SignatureStore};
