// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the DFX and LOCK backends. Both backends
//! use camelCase JSON; every optional field defaults so that additive
//! backend changes do not break decoding.
//!
//! ## Model Categories
//!
//! - **Auth**: sign-in / sign-up credentials and token responses
//! - **User**: profile, referral and KYC data
//! - **Bank accounts**: IBANs registered for payouts
//! - **Routes**: buy, sell and staking routes
//! - **LOCK**: staking positions and their deposits/withdrawals

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth Models
// =============================================================================

/// Address plus proof of ownership, sent to sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthCredentials {
    pub address: String,
    pub signature: String,
}

/// DFX sign-up body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub address: String,
    pub signature: String,
    pub wallet_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_ref: Option<String>,
}

/// LOCK sign-up body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LockSignUpRequest {
    pub address: String,
    pub signature: String,
    pub wallet_name: String,
}

/// Token returned by sign-in and sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
}

/// Challenge message to sign for an address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignMessage {
    pub message: String,
}

// =============================================================================
// Shared Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fiat {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub buyable: bool,
    #[serde(default)]
    pub sellable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub blockchain: Option<String>,
    #[serde(default)]
    pub buyable: bool,
    #[serde(default)]
    pub sellable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Language {
    pub id: u64,
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub id: u64,
    pub symbol: String,
    pub name: String,
}

/// Reference by id, used in request bodies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdRef {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deposit {
    pub id: u64,
    pub address: String,
}

// =============================================================================
// User Models
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum KycStatus {
    #[default]
    #[serde(rename = "NA")]
    NotAvailable,
    Chatbot,
    #[serde(rename = "OnlineId")]
    OnlineId,
    #[serde(rename = "VideoId")]
    VideoId,
    Check,
    Completed,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradingLimit {
    pub limit: f64,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub address: Option<String>,
    pub mail: Option<String>,
    pub mobile_number: Option<String>,
    pub language: Option<Language>,
    pub currency: Option<Fiat>,
    pub used_ref: Option<String>,
    #[serde(rename = "ref")]
    pub ref_code: Option<String>,
    pub ref_fee_percent: Option<f64>,
    pub kyc_status: KycStatus,
    pub kyc_hash: Option<String>,
    pub kyc_data_complete: bool,
    pub trading_limit: Option<TradingLimit>,
}

/// User profile including referral statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub ref_volume: f64,
    pub ref_credit: f64,
    pub paid_ref_credit: f64,
    pub ref_count: u64,
    pub ref_count_active: u64,
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub staking_volume: f64,
}

/// Fields of the user profile the wallet may change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<IdRef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AccountType {
    #[default]
    Personal,
    Business,
    SoleProprietorship,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct KycData {
    pub account_type: AccountType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub zip: Option<String>,
    pub location: Option<String>,
    pub country: Option<Country>,
    pub mail: Option<String>,
    pub phone: Option<String>,
    pub organization_name: Option<String>,
    pub organization_street: Option<String>,
    pub organization_house_number: Option<String>,
    pub organization_location: Option<String>,
    pub organization_zip: Option<String>,
    pub organization_country: Option<Country>,
}

// =============================================================================
// Bank Account Models
// =============================================================================

/// Bank account as exchanged with the backend (IBAN without spaces).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountDto {
    pub id: u64,
    pub iban: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub sepa_instant: bool,
    #[serde(default)]
    pub preferred_currency: Option<Fiat>,
}

/// Bank account as shown to the user (IBAN grouped in fours).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub id: u64,
    pub iban: String,
    pub label: Option<String>,
    pub sepa_instant: bool,
    pub preferred_currency: Option<Fiat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankAccount {
    pub iban: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_currency: Option<IdRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBankAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_currency: Option<IdRef>,
}

/// Group an IBAN into blocks of four for display. Case is preserved.
pub fn format_iban(iban: &str) -> String {
    let compact: Vec<char> = normalize_iban(iban).chars().collect();
    compact
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip all whitespace from an IBAN.
pub fn normalize_iban(iban: &str) -> String {
    iban.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn from_bank_account_dto(dto: BankAccountDto) -> BankAccount {
    BankAccount {
        id: dto.id,
        iban: format_iban(&dto.iban),
        label: dto.label,
        sepa_instant: dto.sepa_instant,
        preferred_currency: dto.preferred_currency,
    }
}

pub fn to_bank_account_dto(account: BankAccount) -> BankAccountDto {
    BankAccountDto {
        id: account.id,
        iban: normalize_iban(&account.iban),
        label: account.label,
        sepa_instant: account.sepa_instant,
        preferred_currency: account.preferred_currency,
    }
}

// =============================================================================
// Route Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuyRoute {
    pub id: u64,
    #[serde(default)]
    pub active: bool,
    pub iban: String,
    pub asset: Asset,
    #[serde(default)]
    pub bank_usage: Option<String>,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub annual_volume: f64,
    #[serde(default)]
    pub fee: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateBuyRoute {
    pub iban: String,
    pub asset: IdRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SellRoute {
    pub id: u64,
    #[serde(default)]
    pub active: bool,
    pub fiat: Fiat,
    pub deposit: Deposit,
    pub iban: String,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub annual_volume: f64,
    #[serde(default)]
    pub fee: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSellRoute {
    pub iban: String,
    pub fiat: IdRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StakingRoute {
    pub id: u64,
    #[serde(default)]
    pub active: bool,
    pub deposit: Deposit,
    #[serde(default)]
    pub reward_type: Option<String>,
    #[serde(default)]
    pub payback_type: Option<String>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub rewards_paid_out: f64,
}

// =============================================================================
// LOCK Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LockUser {
    pub address: Option<String>,
    pub mail: Option<String>,
    pub kyc_status: Option<String>,
    pub kyc_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockBalance {
    pub asset: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub pending_deposits: f64,
    #[serde(default)]
    pub pending_withdrawals: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockStaking {
    pub id: u64,
    pub status: String,
    pub asset: String,
    pub deposit_address: String,
    pub strategy: String,
    #[serde(default)]
    pub min_deposits: Vec<LockMinDeposit>,
    #[serde(default)]
    pub fee: f64,
    #[serde(default)]
    pub balances: Vec<LockBalance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LockMinDeposit {
    pub amount: f64,
    pub asset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockDepositRequest {
    pub amount: f64,
    pub tx_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockWithdrawalRequest {
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockWithdrawal {
    pub id: u64,
    #[serde(default)]
    pub signature_message: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    pub amount: f64,
    pub status: String,
}

/// Signature proving ownership for a pending LOCK withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockWithdrawalSignature {
    pub signature: String,
}
