// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DFX exchange endpoints.

use std::sync::Arc;

use super::models::{
    from_bank_account_dto, normalize_iban, to_bank_account_dto, BankAccount, BankAccountDto,
    BuyRoute, CreateBankAccount, CreateBuyRoute, CreateSellRoute, IdRef, KycData, SellRoute,
    StakingRoute, UpdateBankAccount, UpdateUser, User, UserDetail,
};
use super::service::ApiService;
use crate::domain::ApiDomain;
use crate::error::ApiResult;

/// Typed wrapper around the DFX endpoints the wallet uses.
#[derive(Clone)]
pub struct DfxApi {
    service: Arc<ApiService>,
}

impl DfxApi {
    pub fn new(service: Arc<ApiService>) -> Self {
        Self { service }
    }

    // =========================================================================
    // User
    // =========================================================================

    pub async fn get_user(&self) -> ApiResult<User> {
        self.service.get(ApiDomain::Dfx, "user").await
    }

    pub async fn get_user_detail(&self) -> ApiResult<UserDetail> {
        self.service.get(ApiDomain::Dfx, "user/detail").await
    }

    pub async fn update_user(&self, update: &UpdateUser) -> ApiResult<User> {
        self.service.put(ApiDomain::Dfx, "user", update).await
    }

    pub async fn get_kyc_data(&self) -> ApiResult<KycData> {
        self.service.get(ApiDomain::Dfx, "kyc/data").await
    }

    // =========================================================================
    // Bank accounts
    // =========================================================================

    pub async fn get_bank_accounts(&self) -> ApiResult<Vec<BankAccount>> {
        let accounts: Vec<BankAccountDto> =
            self.service.get(ApiDomain::Dfx, "bankAccount").await?;
        Ok(accounts.into_iter().map(from_bank_account_dto).collect())
    }

    pub async fn post_bank_account(&self, account: &CreateBankAccount) -> ApiResult<BankAccount> {
        let mut body = account.clone();
        body.iban = normalize_iban(&account.iban);
        let created: BankAccountDto = self
            .service
            .post(ApiDomain::Dfx, "bankAccount", &body)
            .await?;
        Ok(from_bank_account_dto(created))
    }

    pub async fn put_bank_account(
        &self,
        id: u64,
        update: &UpdateBankAccount,
    ) -> ApiResult<BankAccount> {
        let updated: BankAccountDto = self
            .service
            .put(ApiDomain::Dfx, &format!("bankAccount/{id}"), update)
            .await?;
        Ok(from_bank_account_dto(updated))
    }

    /// Replace a bank account with a locally edited copy.
    pub async fn save_bank_account(&self, account: BankAccount) -> ApiResult<BankAccount> {
        let dto = to_bank_account_dto(account);
        let update = UpdateBankAccount {
            label: dto.label,
            preferred_currency: dto
                .preferred_currency
                .map(|fiat| IdRef { id: fiat.id }),
        };
        self.put_bank_account(dto.id, &update).await
    }

    // =========================================================================
    // Routes
    // =========================================================================

    pub async fn get_buy_routes(&self) -> ApiResult<Vec<BuyRoute>> {
        self.service.get(ApiDomain::Dfx, "buy").await
    }

    pub async fn post_buy_route(&self, route: &CreateBuyRoute) -> ApiResult<BuyRoute> {
        self.service.post(ApiDomain::Dfx, "buy", route).await
    }

    pub async fn get_sell_routes(&self) -> ApiResult<Vec<SellRoute>> {
        self.service.get(ApiDomain::Dfx, "sell").await
    }

    pub async fn post_sell_route(&self, route: &CreateSellRoute) -> ApiResult<SellRoute> {
        self.service.post(ApiDomain::Dfx, "sell", route).await
    }

    pub async fn get_staking_routes(&self) -> ApiResult<Vec<StakingRoute>> {
        self.service.get(ApiDomain::Dfx, "staking").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::tests::{service, MintingRenewer};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn api() -> (MockServer, MockServer, DfxApi) {
        let dfx = MockServer::start().await;
        let lock = MockServer::start().await;
        let service = Arc::new(service(&dfx, &lock, Arc::new(MintingRenewer::new())));
        (dfx, lock, DfxApi::new(service))
    }

    #[tokio::test]
    async fn bank_accounts_are_formatted_for_display() {
        let (dfx, _lock, api) = api().await;
        Mock::given(method("GET"))
            .and(path("/v1/bankAccount"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "iban": "DE89370400440532013000", "sepaInstant": true}
            ])))
            .mount(&dfx)
            .await;

        let accounts = api.get_bank_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].iban, "DE89 3704 0044 0532 0130 00");
        assert!(accounts[0].sepa_instant);
    }

    #[tokio::test]
    async fn new_bank_account_is_sent_without_spaces() {
        let (dfx, _lock, api) = api().await;
        Mock::given(method("POST"))
            .and(path("/v1/bankAccount"))
            .and(body_json(json!({"iban": "DE89370400440532013000", "label": "Main"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                json!({"id": 9, "iban": "DE89370400440532013000", "label": "Main"}),
            ))
            .expect(1)
            .mount(&dfx)
            .await;

        let created = api
            .post_bank_account(&CreateBankAccount {
                iban: "DE89 3704 0044 0532 0130 00".to_string(),
                label: Some("Main".to_string()),
                preferred_currency: None,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 9);
        assert_eq!(created.label.as_deref(), Some("Main"));
    }

    #[tokio::test]
    async fn edited_bank_account_is_saved_by_id() {
        let (dfx, _lock, api) = api().await;
        Mock::given(method("PUT"))
            .and(path("/v1/bankAccount/4"))
            .and(body_json(json!({"label": "Savings"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"id": 4, "iban": "CH9300762011623852957", "label": "Savings"}),
            ))
            .expect(1)
            .mount(&dfx)
            .await;

        let saved = api
            .save_bank_account(BankAccount {
                id: 4,
                iban: "CH93 0076 2011 6238 5295 7".to_string(),
                label: Some("Savings".to_string()),
                sepa_instant: false,
                preferred_currency: None,
            })
            .await
            .unwrap();
        assert_eq!(saved.iban, "CH93 0076 2011 6238 5295 7");
    }

    #[tokio::test]
    async fn user_update_is_put() {
        let (dfx, _lock, api) = api().await;
        Mock::given(method("PUT"))
            .and(path("/v1/user"))
            .and(body_json(json!({"mail": "new@dfx.swiss"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"mail": "new@dfx.swiss"})),
            )
            .expect(1)
            .mount(&dfx)
            .await;

        let user = api
            .update_user(&UpdateUser {
                mail: Some("new@dfx.swiss".to_string()),
                ..UpdateUser::default()
            })
            .await
            .unwrap();
        assert_eq!(user.mail.as_deref(), Some("new@dfx.swiss"));
    }
}
