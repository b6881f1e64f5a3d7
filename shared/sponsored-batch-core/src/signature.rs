//! Signature parsing and signer recovery.
//!
//! The expected authority is never stored: a signature is valid only if it recovers to the
//! address the code is running as (the delegated account itself).

use alloy_primitives::{Address, B256, U256};

use crate::{
    errors::{BatchError, BatchResult},
    hashing::eth_signed_message_hash,
};

/// `r || s || v`.
pub const SIGNATURE_LENGTH: usize = 65;

/// secp256k1 group order divided by two. Larger `s` values are malleable twins (EIP-2).
pub const SECP256K1_HALF_ORDER: U256 = U256::from_limbs([
    0xdfe9_2f46_681b_20a0,
    0x5d57_6e73_57a4_501d,
    0xffff_ffff_ffff_ffff,
    0x7fff_ffff_ffff_ffff,
]);

/// Recovers the signer of a 32-byte prehash.
pub trait SignatureVerifier {
    fn recover_identity(&self, prehash: B256, signature: &[u8]) -> BatchResult<Address>;
}

/// Validated components of a 65-byte signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureParts {
    pub r: B256,
    pub s: B256,
    pub y_parity: bool,
}

impl SignatureParts {
    /// `v` in the 27/28 form expected by the `ecrecover` precompile.
    pub fn v(&self) -> u8 {
        27 + u8::from(self.y_parity)
    }
}

/// Split and sanity-check raw signature bytes.
///
/// Accepts `v` in {0, 1, 27, 28}. Rejects zero `r`/`s` and high-`s` signatures.
pub fn parse_signature(signature: &[u8]) -> BatchResult<SignatureParts> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(BatchError::InvalidSignature);
    }

    let r = B256::from_slice(&signature[0..32]);
    let s = B256::from_slice(&signature[32..64]);
    let y_parity = match signature[64] {
        0 | 27 => false,
        1 | 28 => true,
        _ => return Err(BatchError::InvalidSignature),
    };

    if r == B256::ZERO || s == B256::ZERO {
        return Err(BatchError::InvalidSignature);
    }
    if U256::from_be_bytes(s.0) > SECP256K1_HALF_ORDER {
        return Err(BatchError::InvalidSignature);
    }

    Ok(SignatureParts { r, s, y_parity })
}

/// Check that `signature` over the prefixed `digest` was produced by `authority`.
pub fn verify_authority<V: SignatureVerifier + ?Sized>(
    verifier: &V,
    digest: B256,
    signature: &[u8],
    authority: Address,
) -> BatchResult<()> {
    let recovered = verifier.recover_identity(eth_signed_message_hash(digest), signature)?;
    if recovered != authority {
        return Err(BatchError::Unauthorized { recovered });
    }
    Ok(())
}

/// Pure-Rust secp256k1 recovery.
#[cfg(any(test, feature = "k256"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct K256Verifier;

#[cfg(any(test, feature = "k256"))]
impl SignatureVerifier for K256Verifier {
    fn recover_identity(&self, prehash: B256, signature: &[u8]) -> BatchResult<Address> {
        use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

        let parts = parse_signature(signature)?;
        let sig = Signature::from_slice(&signature[0..64]).map_err(|_| BatchError::InvalidSignature)?;
        let recovery_id = RecoveryId::new(parts.y_parity, false);
        let key = VerifyingKey::recover_from_prehash(prehash.as_slice(), &sig, recovery_id)
            .map_err(|_| BatchError::InvalidSignature)?;
        Ok(address_of(&key))
    }
}

/// Ethereum address of a secp256k1 public key.
#[cfg(any(test, feature = "k256"))]
pub fn address_of(key: &k256::ecdsa::VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = alloy_primitives::keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}
