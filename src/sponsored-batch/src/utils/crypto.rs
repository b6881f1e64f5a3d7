//! Signer recovery through the EVM `ecrecover` precompile.

use sponsored_batch_core::{
    errors::{BatchError, BatchResult},
    signature::{parse_signature, SignatureVerifier},
};
use stylus_sdk::{
    alloy_primitives::{Address, B256},
    call::RawCall,
};

/// Precompile address 0x01.
const ECRECOVER: Address = Address::with_last_byte(1);

/// Gas forwarded to the precompile (it costs 3000).
const ECRECOVER_GAS: u64 = 50_000;

/// [`SignatureVerifier`] backed by `ecrecover`.
///
/// The signature is validated before the precompile sees it: exactly 65 bytes, `v` in
/// {0, 1, 27, 28}, non-zero `r`/`s` and low `s`. The precompile returns no data for points
/// it cannot recover.
#[derive(Clone, Copy, Debug, Default)]
pub struct EcrecoverVerifier;

impl SignatureVerifier for EcrecoverVerifier {
    fn recover_identity(&self, prehash: B256, signature: &[u8]) -> BatchResult<Address> {
        let parts = parse_signature(signature)?;

        let mut input = [0u8; 128];
        input[0..32].copy_from_slice(prehash.as_slice());
        // v as 32-byte big-endian word.
        input[63] = parts.v();
        input[64..96].copy_from_slice(parts.r.as_slice());
        input[96..128].copy_from_slice(parts.s.as_slice());

        let out = unsafe { RawCall::new_static().gas(ECRECOVER_GAS).call(ECRECOVER, &input) }
            .map_err(|_| BatchError::InvalidSignature)?;
        if out.len() < 32 {
            return Err(BatchError::InvalidSignature);
        }
        // precompile returns 32-byte word with address in the low 20 bytes.
        let recovered = Address::from_slice(&out[12..32]);
        if recovered == Address::ZERO {
            return Err(BatchError::InvalidSignature);
        }
        Ok(recovered)
    }
}
