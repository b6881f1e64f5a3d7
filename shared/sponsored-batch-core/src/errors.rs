use alloy_primitives::{Address, Bytes};

/// Reasons a dispatch is rejected. Every variant aborts the whole dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchError {
    /// `block.timestamp` is past the signed deadline.
    Expired,
    /// Signature bytes could not be parsed or recovered.
    InvalidSignature,
    /// Signature recovered to someone other than the running account.
    Unauthorized { recovered: Address },
    FeeNativeTransferFailed,
    FeeTokenTransferFailed,
    /// Call at `index` failed; `reason` is the raw revert data it returned.
    CallReverted { index: usize, reason: Bytes },
    /// Self-invoked path called by anyone but the account.
    InvalidCaller { caller: Address },
    /// Replay nonce cannot be advanced any further.
    InvalidNonce,
}

pub type BatchResult<T> = Result<T, BatchError>;
