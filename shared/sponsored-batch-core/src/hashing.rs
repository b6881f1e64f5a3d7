//! Signing protocol: call-set fingerprint, authorization digest and message prefix.
//!
//! Off-chain signers must reproduce these byte layouts exactly:
//!
//! ```text
//! callsFingerprint = keccak256( concat_i( target_i || value_i || payload_i ) )
//! digest           = keccak256( abi.encode(callsFingerprint, fee.asset, fee.amount,
//!                                          fee.receiver, nonce, deadline) )
//! signed           = keccak256( "\x19Ethereum Signed Message:\n32" || digest )
//! ```

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::types::{Call, Fee};

/// Prefix applied by `eth_sign` / `personal_sign` to a 32-byte message.
pub const ETH_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Width of one ABI slot.
const WORD: usize = 32;

/// Fingerprint of an ordered call set.
///
/// Matches Solidity `abi.encodePacked(target, value, data)` per call, concatenated in order:
/// 20-byte target, 32-byte big-endian value, raw payload.
pub fn calls_fingerprint(calls: &[Call]) -> B256 {
    keccak256(encode_calls(calls))
}

/// Packed encoding hashed by [`calls_fingerprint`].
pub fn encode_calls(calls: &[Call]) -> Vec<u8> {
    let size = calls
        .iter()
        .map(|call| 20 + WORD + call.payload.len())
        .sum();
    let mut buf = Vec::with_capacity(size);
    for call in calls {
        buf.extend_from_slice(call.target.as_slice());
        buf.extend_from_slice(&call.value.to_be_bytes::<32>());
        buf.extend_from_slice(&call.payload);
    }
    buf
}

/// Digest the account signs to authorize one batch.
///
/// Six fixed 32-byte slots, so no field can bleed into its neighbour. The fee fields are
/// always present; the no-fee entry point passes [`Fee::NONE`].
pub fn authorization_digest(calls_fingerprint: B256, fee: &Fee, nonce: U256, deadline: U256) -> B256 {
    let mut buf = Vec::with_capacity(WORD * 6);
    buf.extend_from_slice(calls_fingerprint.as_slice());
    buf.extend_from_slice(&address_word(fee.asset));
    buf.extend_from_slice(&fee.amount.to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(fee.receiver));
    buf.extend_from_slice(&nonce.to_be_bytes::<32>());
    buf.extend_from_slice(&deadline.to_be_bytes::<32>());
    keccak256(buf)
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || digest)`.
pub fn eth_signed_message_hash(digest: B256) -> B256 {
    let mut buf = Vec::with_capacity(ETH_MESSAGE_PREFIX.len() + WORD);
    buf.extend_from_slice(ETH_MESSAGE_PREFIX);
    buf.extend_from_slice(digest.as_slice());
    keccak256(buf)
}

/// Left-pads an address into one ABI slot.
pub(crate) fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(address.as_slice());
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;

    fn call(target: u8, value: u64, payload: &[u8]) -> Call {
        Call::new(
            Address::repeat_byte(target),
            U256::from(value),
            Bytes::copy_from_slice(payload),
        )
    }

    #[test]
    fn test_encode_calls_layout() {
        let calls = vec![call(0x01, 10, &[0xde, 0xad]), call(0x02, 0, &[])];
        let encoded = encode_calls(&calls);

        assert_eq!(encoded.len(), (20 + 32 + 2) + (20 + 32));
        assert_eq!(&encoded[0..20], Address::repeat_byte(0x01).as_slice());
        assert_eq!(encoded[20 + 31], 10);
        assert_eq!(&encoded[52..54], &[0xde, 0xad]);
        assert_eq!(&encoded[54..74], Address::repeat_byte(0x02).as_slice());
    }

    #[test]
    fn test_empty_call_set_hashes_empty_string() {
        assert_eq!(calls_fingerprint(&[]), keccak256(b""));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let calls = vec![call(0x01, 10, b"abc"), call(0x02, 3, b"")];
        assert_eq!(calls_fingerprint(&calls), calls_fingerprint(&calls.clone()));
    }

    #[test]
    fn test_fingerprint_sensitivity() {
        let base = vec![call(0x01, 10, b"abc"), call(0x02, 3, b"x")];
        let fingerprint = calls_fingerprint(&base);

        let mut target = base.clone();
        target[0].target = Address::repeat_byte(0x03);
        let mut value = base.clone();
        value[1].value = U256::from(4u64);
        let mut payload = base.clone();
        payload[0].payload = Bytes::from_static(b"abd");
        let reordered = vec![base[1].clone(), base[0].clone()];
        let truncated = vec![base[0].clone()];

        for variant in [target, value, payload, reordered, truncated] {
            assert_ne!(calls_fingerprint(&variant), fingerprint);
        }
    }

    #[test]
    fn test_digest_matches_abi_encode_layout() {
        let fingerprint = keccak256(b"calls");
        let fee = Fee::token(
            Address::repeat_byte(0x11),
            U256::from(5u64),
            Address::repeat_byte(0x22),
        );
        let nonce = U256::from(7u64);
        let deadline = U256::from(1_700_000_000u64);

        let mut expected = Vec::new();
        expected.extend_from_slice(fingerprint.as_slice());
        expected.extend_from_slice(&[0u8; 12]);
        expected.extend_from_slice(&[0x11; 20]);
        expected.extend_from_slice(&U256::from(5u64).to_be_bytes::<32>());
        expected.extend_from_slice(&[0u8; 12]);
        expected.extend_from_slice(&[0x22; 20]);
        expected.extend_from_slice(&nonce.to_be_bytes::<32>());
        expected.extend_from_slice(&deadline.to_be_bytes::<32>());
        assert_eq!(expected.len(), 192);

        assert_eq!(authorization_digest(fingerprint, &fee, nonce, deadline), keccak256(expected));
    }

    #[test]
    fn test_digest_sensitivity() {
        let fingerprint = keccak256(b"calls");
        let fee = Fee::token(
            Address::repeat_byte(0x11),
            U256::from(5u64),
            Address::repeat_byte(0x22),
        );
        let nonce = U256::from(7u64);
        let deadline = U256::from(100u64);
        let digest = authorization_digest(fingerprint, &fee, nonce, deadline);

        let variants = [
            authorization_digest(keccak256(b"other"), &fee, nonce, deadline),
            authorization_digest(fingerprint, &Fee { asset: Address::ZERO, ..fee }, nonce, deadline),
            authorization_digest(fingerprint, &Fee { amount: U256::from(6u64), ..fee }, nonce, deadline),
            authorization_digest(fingerprint, &Fee { receiver: Address::repeat_byte(0x23), ..fee }, nonce, deadline),
            authorization_digest(fingerprint, &fee, U256::from(8u64), deadline),
            authorization_digest(fingerprint, &fee, nonce, U256::from(101u64)),
            authorization_digest(fingerprint, &Fee::NONE, nonce, deadline),
        ];
        for variant in variants {
            assert_ne!(variant, digest);
        }
    }

    #[test]
    fn test_eth_signed_message_hash() {
        let digest = B256::repeat_byte(0x42);
        let mut expected = b"\x19Ethereum Signed Message:\n32".to_vec();
        expected.extend_from_slice(&[0x42; 32]);
        assert_eq!(eth_signed_message_hash(digest), keccak256(expected));
        assert_ne!(eth_signed_message_hash(digest), digest);
    }
}
