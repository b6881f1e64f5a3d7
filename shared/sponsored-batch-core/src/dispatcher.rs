//! The three entry points, each run as one all-or-nothing unit.
//!
//! Signed paths, in order:
//! 1. deadline check
//! 2. fingerprint the call set and read the account nonce
//! 3. rebuild the digest and check the signature recovers to the account
//! 4. settle the fee (skipped when the amount is zero)
//! 5. advance the nonce
//! 6. run the batch
//!
//! The self-invoked path only checks the caller and runs the batch; it neither reads a
//! signature nor consumes a nonce.

use alloy_primitives::U256;

use crate::{
    errors::{BatchError, BatchResult},
    executor::execute_batch,
    fee::settle_fee,
    hashing::{authorization_digest, calls_fingerprint},
    host::Host,
    signature::{verify_authority, SignatureVerifier},
    types::{Authorization, BatchReceipt, Call, Fee},
};

pub struct Dispatcher<'a, H: ?Sized, V: ?Sized> {
    host: &'a mut H,
    verifier: &'a V,
}

impl<'a, H, V> Dispatcher<'a, H, V>
where
    H: Host + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    pub fn new(host: &'a mut H, verifier: &'a V) -> Self {
        Self { host, verifier }
    }

    /// Signed batch without a fee. The digest still commits to [`Fee::NONE`].
    pub fn execute_with_authorization(
        &mut self,
        calls: &[Call],
        deadline: U256,
        signature: &[u8],
    ) -> BatchResult<BatchReceipt> {
        self.atomically(|host, verifier| execute_signed(host, verifier, calls, &Fee::NONE, deadline, signature))
    }

    /// Signed batch that pays `fee` from the account before any call runs.
    pub fn execute_with_fee(
        &mut self,
        calls: &[Call],
        fee: &Fee,
        deadline: U256,
        signature: &[u8],
    ) -> BatchResult<BatchReceipt> {
        self.atomically(|host, verifier| execute_signed(host, verifier, calls, fee, deadline, signature))
    }

    /// Route a full [`Authorization`] to the matching signed entry point.
    pub fn execute(&mut self, authorization: &Authorization) -> BatchResult<BatchReceipt> {
        if authorization.fee == Fee::NONE {
            self.execute_with_authorization(&authorization.calls, authorization.deadline, &authorization.signature)
        } else {
            self.execute_with_fee(
                &authorization.calls,
                &authorization.fee,
                authorization.deadline,
                &authorization.signature,
            )
        }
    }

    /// Batch invoked by the account itself. No signature, no fee, nonce untouched.
    pub fn execute_direct(&mut self, calls: &[Call]) -> BatchResult<BatchReceipt> {
        self.atomically(|host, _| {
            let caller = host.caller();
            let account = host.account();
            if caller != account {
                return Err(BatchError::InvalidCaller { caller });
            }
            let nonce = host.nonce_of(account);
            execute_batch(host, calls, nonce, calls_fingerprint(calls))
        })
    }

    fn atomically<T>(&mut self, op: impl FnOnce(&mut H, &V) -> BatchResult<T>) -> BatchResult<T> {
        let checkpoint = self.host.checkpoint();
        let outcome = op(&mut *self.host, self.verifier);
        if outcome.is_err() {
            self.host.rollback(checkpoint);
        }
        outcome
    }
}

fn execute_signed<H, V>(
    host: &mut H,
    verifier: &V,
    calls: &[Call],
    fee: &Fee,
    deadline: U256,
    signature: &[u8],
) -> BatchResult<BatchReceipt>
where
    H: Host + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    if U256::from(host.timestamp()) > deadline {
        return Err(BatchError::Expired);
    }

    let account = host.account();
    let fingerprint = calls_fingerprint(calls);
    let nonce = host.nonce_of(account);
    let digest = authorization_digest(fingerprint, fee, nonce, deadline);
    verify_authority(verifier, digest, signature, account)?;

    settle_fee(host, fee)?;
    host.advance_nonce(account)?;

    execute_batch(host, calls, nonce, fingerprint)
}
