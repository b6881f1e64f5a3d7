//! Stylus delegate for EIP-7702 accounts: sponsored, atomic batch execution.
//!
//! An account delegates its code to this contract. A sponsor then submits batches the
//! account signed off-chain; the sponsor pays gas and may collect a fee from the account.
//!
//! Design notes:
//! - The authority is the running address (`contract_address()` under delegation), never a
//!   stored key, so a signature only ever works for the account that produced it.
//! - The fee is settled before any call of the batch runs.
//! - The nonce is consumed after the fee and before the calls; any failure reverts the whole
//!   transaction, nonce included.

use alloc::vec::Vec;

use sponsored_batch_core::{hashing, Dispatcher};
use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
};

use crate::{
    errors::BatchSponsorError,
    host::StylusHost,
    utils::{
        abi::{decode_calls, decode_fee, CallTuple, FeeTuple},
        crypto::EcrecoverVerifier,
    },
};

sol_storage! {
    #[entrypoint]
    pub struct BatchSponsor {
        /// Replay nonce per account. Under delegation only the account's own key is used.
        mapping(address => uint256) nonces;
    }
}

#[public]
impl BatchSponsor {
    /// Signed batch without a fee.
    ///
    /// The signature covers the call set, the zero fee, the account nonce and `deadline`.
    #[payable]
    pub fn execute_with_authorization(
        &mut self,
        calls: Vec<CallTuple>,
        deadline: U256,
        signature: Bytes,
    ) -> Result<(), BatchSponsorError> {
        let calls = decode_calls(calls);
        let mut host = StylusHost::new(self);
        Dispatcher::new(&mut host, &EcrecoverVerifier).execute_with_authorization(&calls, deadline, &signature)?;
        Ok(())
    }

    /// Signed batch that first pays `fee` (`(asset, amount, receiver)`) from the account.
    #[payable]
    pub fn execute_with_fee(
        &mut self,
        calls: Vec<CallTuple>,
        fee: FeeTuple,
        deadline: U256,
        signature: Bytes,
    ) -> Result<(), BatchSponsorError> {
        let calls = decode_calls(calls);
        let fee = decode_fee(fee);
        let mut host = StylusHost::new(self);
        Dispatcher::new(&mut host, &EcrecoverVerifier).execute_with_fee(&calls, &fee, deadline, &signature)?;
        Ok(())
    }

    /// Batch sent by the account itself. Does not consume a nonce.
    #[payable]
    pub fn execute_direct(&mut self, calls: Vec<CallTuple>) -> Result<(), BatchSponsorError> {
        let calls = decode_calls(calls);
        let mut host = StylusHost::new(self);
        Dispatcher::new(&mut host, &EcrecoverVerifier).execute_direct(&calls)?;
        Ok(())
    }

    /// Nonce the next signed authorization must commit to.
    pub fn nonce(&self) -> U256 {
        self.stored_nonce(self.vm().contract_address())
    }

    pub fn calls_fingerprint(&self, calls: Vec<CallTuple>) -> FixedBytes<32> {
        hashing::calls_fingerprint(&decode_calls(calls))
    }

    /// Digest (before the message prefix) to sign for the current nonce.
    pub fn authorization_digest(&self, calls: Vec<CallTuple>, fee: FeeTuple, deadline: U256) -> FixedBytes<32> {
        let fingerprint = hashing::calls_fingerprint(&decode_calls(calls));
        let nonce = self.stored_nonce(self.vm().contract_address());
        hashing::authorization_digest(fingerprint, &decode_fee(fee), nonce, deadline)
    }

    /// Plain value transfers into the account.
    #[receive]
    #[payable]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        Ok(())
    }
}

impl BatchSponsor {
    pub(crate) fn stored_nonce(&self, account: Address) -> U256 {
        self.nonces.get(account)
    }

    pub(crate) fn store_nonce(&mut self, account: Address, nonce: U256) {
        self.nonces.insert(account, nonce);
    }
}
