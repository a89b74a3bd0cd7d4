// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet message signing.
//!
//! Produces the compact recoverable signature format the backends verify:
//! a double SHA-256 over the length-prefixed DeFiChain magic and message,
//! signed with secp256k1, returned as base64 of
//! `header || r || s` where `header = 27 + recovery_id + 4` (compressed key).

use base64ct::{Base64, Encoding};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::SecretKey;
use sha2::{Digest, Sha256};

use crate::error::{ApiError, ApiResult};

/// Magic prefix of signed messages.
pub const MESSAGE_MAGIC: &str = "Defi Signed Message:\n";

/// Header offset for signatures made with a compressed public key.
const COMPRESSED_HEADER_BASE: u8 = 27 + 4;

/// Unprotected secp256k1 wallet key.
#[derive(Clone)]
pub struct LocalKey {
    signing_key: SigningKey,
}

impl std::fmt::Debug for LocalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKey").finish_non_exhaustive()
    }
}

impl LocalKey {
    /// Parse a private key from PEM (SEC1 `EC PRIVATE KEY` or PKCS#8
    /// `PRIVATE KEY`).
    pub fn from_pem(pem_bytes: &[u8]) -> ApiResult<Self> {
        let pem_str = std::str::from_utf8(pem_bytes)
            .map_err(|e| ApiError::Signing(format!("Invalid UTF-8: {e}")))?;

        let pem = pem::parse(pem_str.trim())
            .map_err(|e| ApiError::Signing(format!("Invalid PEM: {e}")))?;

        let secret_key = SecretKey::from_sec1_der(pem.contents())
            .or_else(|_| parse_pkcs8_to_secret_key(pem.contents()))
            .map_err(|e| ApiError::Signing(format!("Invalid key format: {e}")))?;

        Self::from_bytes(&secret_key.to_bytes())
    }

    /// Build from raw 32-byte scalar.
    pub fn from_bytes(bytes: &[u8]) -> ApiResult<Self> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| ApiError::Signing(format!("Invalid private key: {e}")))?;
        Ok(Self { signing_key })
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign `message` and return the base64 compact signature.
    pub fn sign_message(&self, message: &str) -> ApiResult<String> {
        let digest = message_digest(message);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| ApiError::Signing(e.to_string()))?;

        let mut compact = Vec::with_capacity(65);
        compact.push(COMPRESSED_HEADER_BASE + recovery_id.to_byte());
        compact.extend_from_slice(&signature.to_bytes());
        Ok(Base64::encode_string(&compact))
    }
}

fn parse_pkcs8_to_secret_key(der: &[u8]) -> Result<SecretKey, String> {
    use k256::pkcs8::DecodePrivateKey;
    SecretKey::from_pkcs8_der(der).map_err(|e| e.to_string())
}

/// Double SHA-256 of the magic-prefixed message.
pub fn message_digest(message: &str) -> [u8; 32] {
    let mut buf = Vec::with_capacity(MESSAGE_MAGIC.len() + message.len() + 10);
    write_varint(&mut buf, MESSAGE_MAGIC.len() as u64);
    buf.extend_from_slice(MESSAGE_MAGIC.as_bytes());
    write_varint(&mut buf, message.len() as u64);
    buf.extend_from_slice(message.as_bytes());

    Sha256::digest(Sha256::digest(&buf)).into()
}

/// Recover the public key that produced `signature` over `message`.
pub fn recover_signer(message: &str, signature: &str) -> ApiResult<VerifyingKey> {
    let bytes = Base64::decode_vec(signature)
        .map_err(|e| ApiError::Signing(format!("Invalid base64 signature: {e}")))?;
    if bytes.len() != 65 {
        return Err(ApiError::Signing(format!(
            "Signature must be 65 bytes, got {}",
            bytes.len()
        )));
    }

    let recovery_byte = bytes[0]
        .checked_sub(COMPRESSED_HEADER_BASE)
        .ok_or_else(|| ApiError::Signing("Unsupported signature header".to_string()))?;
    let recovery_id = RecoveryId::from_byte(recovery_byte)
        .ok_or_else(|| ApiError::Signing("Invalid recovery id".to_string()))?;
    let signature = Signature::from_slice(&bytes[1..])
        .map_err(|e| ApiError::Signing(e.to_string()))?;

    VerifyingKey::recover_from_prehash(&message_digest(message), &signature, recovery_id)
        .map_err(|e| ApiError::Signing(e.to_string()))
}

/// Bitcoin-style compact size encoding.
fn write_varint(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&n.to_le_bytes());
        }
    }
}
