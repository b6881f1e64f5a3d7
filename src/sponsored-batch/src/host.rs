//! Engine host backed by contract storage, `RawCall` and EVM logs.
//!
//! Under 7702 delegation `contract_address()` is the account itself, so the engine's
//! identity binding needs no stored key.

use alloc::vec::Vec;

use sponsored_batch_core::{
    errors::{BatchError, BatchResult},
    BatchEvent, CallInvoker, Environment, EventSink, Journal, NonceStore,
};
use stylus_sdk::{
    alloy_primitives::{Address, U256},
    call::RawCall,
    prelude::*,
    stylus_core::log,
};

use crate::{
    batch_sponsor::BatchSponsor,
    interfaces::{BatchExecuted, CallExecuted, FeeCharged},
};

pub struct StylusHost<'a> {
    sponsor: &'a mut BatchSponsor,
}

impl<'a> StylusHost<'a> {
    pub fn new(sponsor: &'a mut BatchSponsor) -> Self {
        Self { sponsor }
    }
}

impl Environment for StylusHost<'_> {
    fn account(&self) -> Address {
        self.sponsor.vm().contract_address()
    }

    fn caller(&self) -> Address {
        self.sponsor.vm().msg_sender()
    }

    fn timestamp(&self) -> u64 {
        self.sponsor.vm().block_timestamp()
    }
}

impl NonceStore for StylusHost<'_> {
    fn nonce_of(&self, account: Address) -> U256 {
        self.sponsor.stored_nonce(account)
    }

    fn advance_nonce(&mut self, account: Address) -> BatchResult<U256> {
        let next = self
            .sponsor
            .stored_nonce(account)
            .checked_add(U256::from(1u64))
            .ok_or(BatchError::InvalidNonce)?;
        self.sponsor.store_nonce(account, next);
        Ok(next)
    }
}

impl CallInvoker for StylusHost<'_> {
    fn invoke(&mut self, target: Address, value: U256, payload: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        unsafe { RawCall::new_with_value(value).call(target, payload) }
    }

    fn has_code(&self, target: Address) -> bool {
        self.sponsor.vm().code_size(target) > 0
    }
}

impl EventSink for StylusHost<'_> {
    fn emit(&mut self, event: BatchEvent) {
        let vm = self.sponsor.vm();
        match event {
            BatchEvent::CallExecuted {
                target,
                value,
                payload,
            } => log(
                vm,
                CallExecuted {
                    target,
                    value,
                    data: payload,
                },
            ),
            BatchEvent::BatchExecuted {
                nonce,
                call_count,
                calls_fingerprint,
            } => log(
                vm,
                BatchExecuted {
                    nonce,
                    callCount: U256::from(call_count),
                    callsHash: calls_fingerprint,
                },
            ),
            BatchEvent::FeeCharged {
                asset,
                receiver,
                amount,
            } => log(
                vm,
                FeeCharged {
                    asset,
                    receiver,
                    amount,
                },
            ),
        }
    }
}

/// A failed dispatch surfaces as a revert, which discards every effect on its own.
impl Journal for StylusHost<'_> {
    type Checkpoint = ();

    fn checkpoint(&mut self) {}

    fn rollback(&mut self, _checkpoint: ()) {}
}
