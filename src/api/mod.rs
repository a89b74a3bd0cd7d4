// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Backend API
//!
//! [`ApiService`] resolves the session of the target domain and performs
//! the call; [`DfxApi`] and [`LockApi`] wrap the individual endpoints with
//! typed request and response models.

pub mod dfx;
pub mod lock;
pub mod models;
pub mod service;

pub use dfx::DfxApi;
pub use lock::LockApi;
pub use service::{ApiService, FetchOptions};
