use alloy_primitives::{Address, Bytes, B256};
use k256::ecdsa::SigningKey;
use sponsored_batch_core::{
    hashing::{calls_fingerprint, eth_signed_message_hash},
    signature::{address_of, verify_authority, K256Verifier},
    BatchResult,
};
use tracing::debug;

use crate::types::{DigestReport, SignRequest, SignedAuthorization};

pub use sponsored_batch_core::hashing::{authorization_digest, encode_calls};

/// Parse a hex private key, with or without `0x`.
pub fn parse_private_key(raw: &str) -> anyhow::Result<SigningKey> {
    let trimmed = raw.trim();
    let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(hex_str)?;
    Ok(SigningKey::from_slice(&bytes)?)
}

/// Address the key controls, i.e. the account whose delegate verifies the signature.
pub fn account_address(key: &SigningKey) -> Address {
    address_of(key.verifying_key())
}

/// Fingerprint, digest and prefixed signing hash of a request (must match on-chain).
pub fn digest_report(request: &SignRequest) -> DigestReport {
    let fingerprint = calls_fingerprint(&request.calls());
    let digest = authorization_digest(fingerprint, &request.fee(), request.nonce, request.deadline);
    DigestReport {
        calls_fingerprint: fingerprint,
        digest,
        signing_hash: eth_signed_message_hash(digest),
    }
}

/// `personal_sign` over a 32-byte digest, returned as 65 bytes `r || s || v`.
pub fn sign_digest(key: &SigningKey, digest: B256) -> Result<Bytes, k256::ecdsa::Error> {
    let prehash = eth_signed_message_hash(digest);
    let (signature, recovery_id) = key.sign_prehash_recoverable(prehash.as_slice())?;

    let mut sig_bytes = Vec::with_capacity(65);
    sig_bytes.extend_from_slice(&signature.to_bytes());
    sig_bytes.push(27 + u8::from(recovery_id.is_y_odd()));
    Ok(Bytes::from(sig_bytes))
}

/// Sign `request` with the account key.
pub fn sign_authorization(
    key: &SigningKey,
    request: &SignRequest,
) -> Result<SignedAuthorization, k256::ecdsa::Error> {
    let report = digest_report(request);
    let signature = sign_digest(key, report.digest)?;
    let account = account_address(key);
    debug!(%account, nonce = %request.nonce, digest = %report.digest, "signed authorization");

    Ok(SignedAuthorization {
        account,
        nonce: request.nonce,
        deadline: request.deadline,
        fee: request.fee,
        calls_fingerprint: report.calls_fingerprint,
        digest: report.digest,
        signature,
    })
}

/// Check `signature` over `request` recovers to `account`, as the delegate would.
pub fn verify_request(request: &SignRequest, signature: &[u8], account: Address) -> BatchResult<()> {
    let digest = digest_report(request).digest;
    verify_authority(&K256Verifier, digest, signature, account)
}
