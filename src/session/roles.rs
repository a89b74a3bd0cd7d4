// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles carried in backend tokens.

use serde::{Deserialize, Deserializer, Serialize};

/// Role claim of a DFX / LOCK access token.
///
/// Roles the client does not know about decode as `Unknown` instead of
/// failing the whole token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum UserRole {
    #[default]
    Unknown,
    User,
    #[serde(rename = "VIP")]
    Vip,
    Beta,
    Admin,
    Support,
    Compliance,
    Partner,
}

impl UserRole {
    /// Parse role from string (case-insensitive).
    pub fn parse(s: &str) -> UserRole {
        match s.trim().to_lowercase().as_str() {
            "user" => UserRole::User,
            "vip" => UserRole::Vip,
            "beta" => UserRole::Beta,
            "admin" => UserRole::Admin,
            "support" => UserRole::Support,
            "compliance" => UserRole::Compliance,
            "partner" => UserRole::Partner,
            _ => UserRole::Unknown,
        }
    }

    /// Admins and beta testers see beta features.
    pub fn is_beta(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Beta)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(UserRole::parse(&raw))
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Unknown => write!(f, "Unknown"),
            UserRole::User => write!(f, "User"),
            UserRole::Vip => write!(f, "VIP"),
            UserRole::Beta => write!(f, "Beta"),
            UserRole::Admin => write!(f, "Admin"),
            UserRole::Support => write!(f, "Support"),
            UserRole::Compliance => write!(f, "Compliance"),
            UserRole::Partner => write!(f, "Partner"),
        }
    }
}
