// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Backend API domains.

use std::fmt;

/// One of the two backends the wallet holds a session for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiDomain {
    /// DFX exchange API (buy, sell, KYC, bank accounts)
    #[default]
    Dfx,
    /// LOCK staking API
    Lock,
}

impl ApiDomain {
    pub const ALL: [ApiDomain; 2] = [ApiDomain::Dfx, ApiDomain::Lock];

    /// Storage key of the persisted session record for this domain.
    pub fn session_key(&self) -> &'static str {
        match self {
            ApiDomain::Dfx => "session",
            ApiDomain::Lock => "session-LOCK",
        }
    }
}

impl fmt::Display for ApiDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiDomain::Dfx => write!(f, "DFX"),
            ApiDomain::Lock => write!(f, "LOCK"),
        }
    }
}
