//! Batch data model shared on-chain and off-chain.

use alloc::vec::Vec;

use alloy_primitives::{Address, Bytes, B256, U256};

use crate::hashing::{authorization_digest, calls_fingerprint};

/// One external invocation made from the account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Call {
    pub target: Address,
    pub value: U256,
    pub payload: Bytes,
}

impl Call {
    pub fn new(target: Address, value: U256, payload: impl Into<Bytes>) -> Self {
        Self {
            target,
            value,
            payload: payload.into(),
        }
    }
}

/// Fee paid by the account to a receiver before the batch runs.
///
/// `asset == Address::ZERO` selects the native asset; `amount == 0` charges nothing whatever
/// the asset is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fee {
    pub asset: Address,
    pub amount: U256,
    pub receiver: Address,
}

impl Fee {
    /// All-zero sentinel signed over by the no-fee entry point.
    pub const NONE: Fee = Fee {
        asset: Address::ZERO,
        amount: U256::ZERO,
        receiver: Address::ZERO,
    };

    pub fn native(amount: U256, receiver: Address) -> Self {
        Self {
            asset: Address::ZERO,
            amount,
            receiver,
        }
    }

    pub fn token(asset: Address, amount: U256, receiver: Address) -> Self {
        Self {
            asset,
            amount,
            receiver,
        }
    }

    pub fn is_native(&self) -> bool {
        self.asset == Address::ZERO
    }

    pub fn is_chargeable(&self) -> bool {
        self.amount != U256::ZERO
    }
}

/// Signed authorization as handed to the sponsor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Authorization {
    pub calls: Vec<Call>,
    pub fee: Fee,
    /// Unix timestamp (seconds) after which the authorization is rejected.
    pub deadline: U256,
    /// `r || s || v`.
    pub signature: Bytes,
}

impl Authorization {
    /// Digest this authorization must be signed over for the given nonce.
    pub fn digest(&self, nonce: U256) -> B256 {
        authorization_digest(calls_fingerprint(&self.calls), &self.fee, nonce, self.deadline)
    }
}

/// Summary of a committed dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchReceipt {
    pub nonce: U256,
    pub call_count: usize,
    pub calls_fingerprint: B256,
}
