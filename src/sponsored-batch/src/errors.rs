//! Revert reasons of the contract, one Solidity error per engine failure.

use alloy_sol_types::sol;
use sponsored_batch_core::BatchError;
use stylus_sdk::{alloy_primitives::U256, stylus_proc::SolidityError};

sol! {
    error Expired();
    error InvalidSignature();
    error Unauthorized(address recovered);
    error FeeNativeTransferFailed();
    error FeeTokenTransferFailed();
    error CallReverted(uint256 index, bytes reason);
    error InvalidCaller(address caller);
    error InvalidNonce();
}

#[derive(SolidityError)]
pub enum BatchSponsorError {
    Expired(Expired),
    InvalidSignature(InvalidSignature),
    Unauthorized(Unauthorized),
    FeeNativeTransferFailed(FeeNativeTransferFailed),
    FeeTokenTransferFailed(FeeTokenTransferFailed),
    CallReverted(CallReverted),
    InvalidCaller(InvalidCaller),
    InvalidNonce(InvalidNonce),
}

impl From<BatchError> for BatchSponsorError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Expired => Self::Expired(Expired {}),
            BatchError::InvalidSignature => Self::InvalidSignature(InvalidSignature {}),
            BatchError::Unauthorized { recovered } => Self::Unauthorized(Unauthorized { recovered }),
            BatchError::FeeNativeTransferFailed => {
                Self::FeeNativeTransferFailed(FeeNativeTransferFailed {})
            }
            BatchError::FeeTokenTransferFailed => {
                Self::FeeTokenTransferFailed(FeeTokenTransferFailed {})
            }
            BatchError::CallReverted { index, reason } => Self::CallReverted(CallReverted {
                index: U256::from(index),
                reason,
            }),
            BatchError::InvalidCaller { caller } => Self::InvalidCaller(InvalidCaller { caller }),
            BatchError::InvalidNonce => Self::InvalidNonce(InvalidNonce {}),
        }
    }
}
