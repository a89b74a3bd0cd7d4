// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LOCK staking endpoints.

use std::sync::Arc;

use super::models::{
    LockDepositRequest, LockStaking, LockUser, LockWithdrawal, LockWithdrawalRequest,
    LockWithdrawalSignature,
};
use super::service::{ApiService, FetchOptions};
use crate::auth::WalletAuthenticator;
use crate::domain::ApiDomain;
use crate::error::{ApiError, ApiResult};

/// Blockchain the wallet stakes on.
pub const DEFAULT_BLOCKCHAIN: &str = "DeFiChain";

/// Staking strategy of LOCK masternode staking.
pub const DEFAULT_STRATEGY: &str = "Masternode";

#[derive(Clone)]
pub struct LockApi {
    service: Arc<ApiService>,
    authenticator: Arc<WalletAuthenticator>,
}

impl LockApi {
    pub fn new(service: Arc<ApiService>, authenticator: Arc<WalletAuthenticator>) -> Self {
        Self {
            service,
            authenticator,
        }
    }

    pub async fn get_user(&self) -> ApiResult<LockUser> {
        self.service.get(ApiDomain::Lock, "user").await
    }

    /// Staking position of the user for `asset` on DeFiChain masternodes.
    pub async fn get_staking(&self, asset: &str) -> ApiResult<LockStaking> {
        let options = FetchOptions::default()
            .param("asset", asset)
            .param("blockchain", DEFAULT_BLOCKCHAIN)
            .param("strategy", DEFAULT_STRATEGY);
        self.service
            .get_with(ApiDomain::Lock, "staking", options)
            .await
    }

    /// Report a deposit transaction to staking position `staking_id`.
    pub async fn create_deposit(
        &self,
        staking_id: u64,
        amount: f64,
        tx_id: &str,
    ) -> ApiResult<LockStaking> {
        let request = LockDepositRequest {
            amount,
            tx_id: tx_id.to_string(),
        };
        self.service
            .post(
                ApiDomain::Lock,
                &format!("staking/{staking_id}/deposit"),
                &request,
            )
            .await
    }

    pub async fn create_withdrawal(
        &self,
        staking_id: u64,
        amount: f64,
    ) -> ApiResult<LockWithdrawal> {
        self.service
            .post(
                ApiDomain::Lock,
                &format!("staking/{staking_id}/withdrawal"),
                &LockWithdrawalRequest { amount },
            )
            .await
    }

    /// Sign the ownership message of a pending withdrawal with the active
    /// wallet and submit the signature.
    pub async fn sign_withdrawal(
        &self,
        staking_id: u64,
        withdrawal: &LockWithdrawal,
    ) -> ApiResult<LockWithdrawal> {
        let message = withdrawal.signature_message.as_deref().ok_or_else(|| {
            ApiError::InvalidResponse(format!(
                "withdrawal {} has no signature message",
                withdrawal.id
            ))
        })?;
        let wallet = self
            .authenticator
            .active_wallet()
            .await
            .ok_or_else(|| ApiError::Signing("no active wallet".to_string()))?;

        let signature = self
            .authenticator
            .create_signature(wallet.address(), Some(message))
            .await?;
        self.service
            .patch(
                ApiDomain::Lock,
                &format!("staking/{staking_id}/withdrawal/{}/sign", withdrawal.id),
                &LockWithdrawalSignature { signature },
            )
            .await
    }

    /// Request a withdrawal and sign it right away.
    pub async fn withdraw(&self, staking_id: u64, amount: f64) -> ApiResult<LockWithdrawal> {
        let withdrawal = self.create_withdrawal(staking_id, amount).await?;
        self.sign_withdrawal(staking_id, &withdrawal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::tests::{service, MintingRenewer, ADDRESS};
    use crate::auth::SignUpSettings;
    use crate::http::HttpAdapter;
    use crate::storage::MemoryStorage;
    use crate::wallet::recover_signer;
    use crate::wallet::tests::test_key;
    use crate::wallet::WalletSigner;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn api() -> (MockServer, MockServer, LockApi) {
        let dfx = MockServer::start().await;
        let lock = MockServer::start().await;
        let service = Arc::new(service(&dfx, &lock, Arc::new(MintingRenewer::new())));
        let timeout = Duration::from_secs(5);
        let authenticator = Arc::new(WalletAuthenticator::new(
            HttpAdapter::new(&format!("{}/v1", dfx.uri()), timeout).unwrap(),
            HttpAdapter::new(&format!("{}/v1", lock.uri()), timeout).unwrap(),
            Arc::new(MemoryStorage::new()),
            SignUpSettings::default(),
        ));
        authenticator
            .set_active_wallet(Some(Arc::new(WalletSigner::unprotected(
                ADDRESS,
                test_key(),
            ))))
            .await;
        (dfx, lock, LockApi::new(service, authenticator))
    }

    fn withdrawal_json(signature_message: Option<&str>, status: &str) -> serde_json::Value {
        json!({
            "id": 5,
            "signatureMessage": signature_message,
            "amount": 10.0,
            "status": status
        })
    }

    fn staking_json() -> serde_json::Value {
        json!({
            "id": 12,
            "status": "Active",
            "asset": "DFI",
            "depositAddress": "df1qdeposit",
            "strategy": "Masternode",
            "minDeposits": [{"amount": 1.0, "asset": "DFI"}],
            "fee": 0.05,
            "balances": [{"asset": "DFI", "balance": 1200.5}]
        })
    }

    #[tokio::test]
    async fn staking_is_queried_for_masternodes() {
        let (_dfx, lock, api) = api().await;
        Mock::given(method("GET"))
            .and(path("/v1/staking"))
            .and(query_param("asset", "DFI"))
            .and(query_param("blockchain", "DeFiChain"))
            .and(query_param("strategy", "Masternode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(staking_json()))
            .expect(1)
            .mount(&lock)
            .await;

        let staking = api.get_staking("DFI").await.unwrap();
        assert_eq!(staking.id, 12);
        assert_eq!(staking.balances[0].balance, 1200.5);
    }

    #[tokio::test]
    async fn deposit_posts_amount_and_tx() {
        let (_dfx, lock, api) = api().await;
        Mock::given(method("POST"))
            .and(path("/v1/staking/12/deposit"))
            .and(body_json(json!({"amount": 5.0, "txId": "abc"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(staking_json()))
            .expect(1)
            .mount(&lock)
            .await;

        let staking = api.create_deposit(12, 5.0, "abc").await.unwrap();
        assert_eq!(staking.deposit_address, "df1qdeposit");
    }

    #[tokio::test]
    async fn withdrawal_is_created_and_signed() {
        let (_dfx, lock, api) = api().await;
        let message = "Withdraw 10 DFI from staking 12";
        Mock::given(method("POST"))
            .and(path("/v1/staking/12/withdrawal"))
            .and(body_json(json!({"amount": 10.0})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(withdrawal_json(Some(message), "Draft")),
            )
            .expect(1)
            .mount(&lock)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/v1/staking/12/withdrawal/5/sign"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(withdrawal_json(Some(message), "Pending")),
            )
            .expect(1)
            .mount(&lock)
            .await;

        let withdrawal = api.withdraw(12, 10.0).await.unwrap();
        assert_eq!(withdrawal.status, "Pending");

        let requests = lock.received_requests().await.unwrap();
        let sign_request = requests
            .iter()
            .find(|r| r.method.as_str() == "PATCH")
            .unwrap();
        let body: LockWithdrawalSignature = serde_json::from_slice(&sign_request.body).unwrap();
        let signer = recover_signer(message, &body.signature).unwrap();
        assert_eq!(&signer, test_key().verifying_key());
    }

    #[tokio::test]
    async fn withdrawal_without_message_is_not_signed() {
        let (_dfx, lock, api) = api().await;
        let withdrawal: LockWithdrawal =
            serde_json::from_value(withdrawal_json(None, "Draft")).unwrap();

        let result = api.sign_withdrawal(12, &withdrawal).await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
        assert!(lock.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn withdrawal_errors_are_typed() {
        let (_dfx, lock, api) = api().await;
        Mock::given(method("POST"))
            .and(path("/v1/staking/12/withdrawal"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({"statusCode": 400, "message": ["amount must be positive"]}),
            ))
            .mount(&lock)
            .await;

        let result = api.create_withdrawal(12, -1.0).await;
        match result {
            Err(ApiError::Backend {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 400);
                assert_eq!(message, "amount must be positive");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
