//! ABI tuple <-> engine type conversions.
//!
//! Calls and fees cross the ABI as tuples: Stylus' `#[public]` glue supports tuples via
//! `AbiType`, and a Solidity `struct` is ABI-equivalent to a tuple.

use alloc::vec::Vec;

use sponsored_batch_core::{Call, Fee};
use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{self, Address, U256},
};

/// `(address target, uint256 value, bytes data)`.
pub type CallTuple = (Address, U256, Bytes);

/// `(address asset, uint256 amount, address receiver)`.
pub type FeeTuple = (Address, U256, Address);

pub fn decode_calls(calls: Vec<CallTuple>) -> Vec<Call> {
    calls
        .into_iter()
        .map(|(target, value, data)| Call::new(target, value, alloy_primitives::Bytes::from(data.to_vec())))
        .collect()
}

pub fn decode_fee((asset, amount, receiver): FeeTuple) -> Fee {
    Fee {
        asset,
        amount,
        receiver,
    }
}
