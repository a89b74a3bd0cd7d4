// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use dfx_wallet_client::config::{ClientConfig, LogFormat, WalletConfig};
use dfx_wallet_client::storage::{FileStorage, StoragePaths};
use dfx_wallet_client::telemetry::init_tracing;
use dfx_wallet_client::wallet::{LocalKey, WalletSigner};
use dfx_wallet_client::{ApiError, ApiResult, ClientState};

const USAGE: &str = "usage: dfx-wallet-client <user | lock-staking <asset>>";

enum Command {
    User,
    LockStaking { asset: String },
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        match args {
            [cmd] if cmd == "user" => Some(Command::User),
            [cmd, asset] if cmd == "lock-staking" => Some(Command::LockStaking {
                asset: asset.clone(),
            }),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(LogFormat::from_env());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> ApiResult<()> {
    let config = ClientConfig::from_env()?;
    info!(
        environment = ?config.environment,
        dfx = %config.dfx_api_url,
        lock = %config.lock_api_url,
        "Loaded configuration"
    );

    let mut storage = FileStorage::new(StoragePaths::new(&config.data_dir));
    storage.initialize()?;
    let state = ClientState::new(&config, Arc::new(storage))?;

    if let Some(wallet) = &config.wallet {
        let signer = load_wallet(wallet)?;
        state
            .authenticator
            .set_active_wallet(Some(Arc::new(signer)))
            .await;
    }

    match command {
        Command::User => print_json(&state.dfx.get_user().await?),
        Command::LockStaking { asset } => print_json(&state.lock.get_staking(&asset).await?),
    }
}

fn load_wallet(wallet: &WalletConfig) -> ApiResult<WalletSigner> {
    let pem = std::fs::read(&wallet.key_path).map_err(|e| {
        ApiError::Config(format!(
            "failed to read wallet key {}: {e}",
            wallet.key_path.display()
        ))
    })?;
    let key = LocalKey::from_pem(&pem)?;
    Ok(WalletSigner::unprotected(wallet.address.clone(), key))
}

fn print_json<T: Serialize>(value: &T) -> ApiResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
    println!("{json}");
    Ok(())
}
