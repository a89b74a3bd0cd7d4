// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the [`ClientConfig`] loaded
//! from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DFX_ENVIRONMENT` | `production`, `preview`, `staging` or `development` | `production` |
//! | `DFX_API_URL` | DFX base URL override | per environment |
//! | `LOCK_API_URL` | LOCK base URL override | per environment |
//! | `DFX_WALLET_ID` | Wallet id sent on DFX sign-up | `1` |
//! | `DFX_REF_CODE` | Referral code sent on DFX sign-up | none |
//! | `LOCK_WALLET_NAME` | Wallet name sent on LOCK sign-up | `DFX Wallet` |
//! | `DFX_DATA_DIR` | Directory for sessions and signatures | `./data` |
//! | `DFX_HTTP_TIMEOUT_SECS` | HTTP request timeout | `15` |
//! | `WALLET_ADDRESS` | Address of the wallet to sign in with | none |
//! | `WALLET_KEY_PATH` | PEM file with the wallet's private key | none |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::{SignUpSettings, DEFAULT_WALLET_NAME};
use crate::error::{ApiError, ApiResult};
use crate::storage::paths::DATA_ROOT;

pub const ENVIRONMENT_ENV: &str = "DFX_ENVIRONMENT";
pub const DFX_API_URL_ENV: &str = "DFX_API_URL";
pub const LOCK_API_URL_ENV: &str = "LOCK_API_URL";
pub const WALLET_ID_ENV: &str = "DFX_WALLET_ID";
pub const REF_CODE_ENV: &str = "DFX_REF_CODE";
pub const WALLET_NAME_ENV: &str = "LOCK_WALLET_NAME";

/// Environment variable name for the storage directory.
///
/// Session records and cached signatures are written here, one JSON file
/// per key.
pub const DATA_DIR_ENV: &str = "DFX_DATA_DIR";

pub const HTTP_TIMEOUT_ENV: &str = "DFX_HTTP_TIMEOUT_SECS";
pub const WALLET_ADDRESS_ENV: &str = "WALLET_ADDRESS";
pub const WALLET_KEY_PATH_ENV: &str = "WALLET_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_WALLET_ID: u32 = 1;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Backend deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Preview,
    Staging,
    Development,
}

impl Environment {
    pub fn dfx_base_url(&self) -> &'static str {
        match self {
            Environment::Production | Environment::Preview => "https://api.dfx.swiss/v1/",
            Environment::Staging | Environment::Development => "https://dev.api.dfx.swiss/v1/",
        }
    }

    pub fn lock_base_url(&self) -> &'static str {
        match self {
            Environment::Production | Environment::Preview => "https://api.lock.space/v1/",
            Environment::Staging | Environment::Development => "https://dev.api.lock.space/v1/",
        }
    }
}

impl FromStr for Environment {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prd" | "prod" => Ok(Environment::Production),
            "preview" | "pre" => Ok(Environment::Preview),
            "staging" | "stg" => Ok(Environment::Staging),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(ApiError::Config(format!("unknown environment {other:?}"))),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; anything but `json` is pretty.
    pub fn from_env() -> Self {
        match env_optional(&|name: &str| std::env::var(name).ok(), LOG_FORMAT_ENV) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Wallet the binary signs in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub address: String,
    pub key_path: PathBuf,
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub environment: Environment,
    pub dfx_api_url: String,
    pub lock_api_url: String,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    pub sign_up: SignUpSettings,
    pub wallet: Option<WalletConfig>,
}

impl ClientConfig {
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|name: &str| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match env_optional(&lookup, ENVIRONMENT_ENV) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        let dfx_api_url =
            env_or_default(&lookup, DFX_API_URL_ENV, environment.dfx_base_url());
        let lock_api_url =
            env_or_default(&lookup, LOCK_API_URL_ENV, environment.lock_base_url());
        let data_dir = PathBuf::from(env_or_default(&lookup, DATA_DIR_ENV, DATA_ROOT));

        let timeout_secs = env_parsed(&lookup, HTTP_TIMEOUT_ENV, DEFAULT_HTTP_TIMEOUT_SECS)?;
        let wallet_id = env_parsed(&lookup, WALLET_ID_ENV, DEFAULT_WALLET_ID)?;

        let sign_up = SignUpSettings {
            wallet_id,
            used_ref: env_optional(&lookup, REF_CODE_ENV),
            wallet_name: env_or_default(&lookup, WALLET_NAME_ENV, DEFAULT_WALLET_NAME),
        };

        let wallet = match (
            env_optional(&lookup, WALLET_ADDRESS_ENV),
            env_optional(&lookup, WALLET_KEY_PATH_ENV),
        ) {
            (Some(address), Some(key_path)) => Some(WalletConfig {
                address,
                key_path: PathBuf::from(key_path),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ApiError::Config(WALLET_KEY_PATH_ENV.to_string())),
            (None, Some(_)) => return Err(ApiError::Config(WALLET_ADDRESS_ENV.to_string())),
        };

        Ok(Self {
            environment,
            dfx_api_url,
            lock_api_url,
            data_dir,
            http_timeout: Duration::from_secs(timeout_secs),
            sign_up,
            wallet,
        })
    }
}

fn env_optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_default<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    env_optional(lookup, name).unwrap_or_else(|| default.to_string())
}

fn env_parsed<F, T>(lookup: &F, name: &str, default: T) -> ApiResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match env_optional(lookup, name) {
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::Config(format!("{name} has invalid value {value:?}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_target_production() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.dfx_api_url, "https://api.dfx.swiss/v1/");
        assert_eq!(config.lock_api_url, "https://api.lock.space/v1/");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.sign_up, SignUpSettings::default());
        assert_eq!(config.wallet, None);
    }

    #[test]
    fn development_uses_dev_hosts() {
        let config =
            ClientConfig::from_lookup(lookup(&[(ENVIRONMENT_ENV, "development")])).unwrap();
        assert_eq!(config.dfx_api_url, "https://dev.api.dfx.swiss/v1/");
        assert_eq!(config.lock_api_url, "https://dev.api.lock.space/v1/");
    }

    #[test]
    fn explicit_urls_override_environment() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENVIRONMENT_ENV, "staging"),
            (DFX_API_URL_ENV, " http://localhost:3000/v1 "),
        ]))
        .unwrap();
        assert_eq!(config.dfx_api_url, "http://localhost:3000/v1");
        assert_eq!(config.lock_api_url, "https://dev.api.lock.space/v1/");
    }

    #[test]
    fn sign_up_settings_are_read() {
        let config = ClientConfig::from_lookup(lookup(&[
            (WALLET_ID_ENV, "7"),
            (REF_CODE_ENV, "000-123"),
            (WALLET_NAME_ENV, "Light Wallet"),
        ]))
        .unwrap();
        assert_eq!(config.sign_up.wallet_id, 7);
        assert_eq!(config.sign_up.used_ref.as_deref(), Some("000-123"));
        assert_eq!(config.sign_up.wallet_name, "Light Wallet");
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(ENVIRONMENT_ENV, "mainnet")])),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(HTTP_TIMEOUT_ENV, "soon")])),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn wallet_needs_address_and_key() {
        let config = ClientConfig::from_lookup(lookup(&[
            (WALLET_ADDRESS_ENV, "df1qalice"),
            (WALLET_KEY_PATH_ENV, "/keys/alice.pem"),
        ]))
        .unwrap();
        assert_eq!(
            config.wallet,
            Some(WalletConfig {
                address: "df1qalice".to_string(),
                key_path: PathBuf::from("/keys/alice.pem"),
            })
        );

        assert!(ClientConfig::from_lookup(lookup(&[(WALLET_ADDRESS_ENV, "df1qalice")])).is_err());
    }
}
