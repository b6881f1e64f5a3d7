//! Host seams the engine runs against.
//!
//! On-chain these map to Stylus storage, `RawCall` and EVM logs; off-chain they are served
//! by [`crate::memory::InMemoryHost`].

use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

use crate::{errors::BatchResult, events::BatchEvent};

/// Identity and clock of the running dispatch.
pub trait Environment {
    /// Identity the code runs as. Signatures must recover to this address.
    fn account(&self) -> Address;

    /// Immediate caller of the entry point.
    fn caller(&self) -> Address;

    /// Current block timestamp (seconds).
    fn timestamp(&self) -> u64;
}

/// Per-account replay nonce.
pub trait NonceStore {
    /// Current nonce; `0` for an account that never executed a signed batch.
    fn nonce_of(&self, account: Address) -> U256;

    /// Increment the nonce by exactly one and return the new value.
    fn advance_nonce(&mut self, account: Address) -> BatchResult<U256>;
}

/// Outbound calls made from the account.
pub trait CallInvoker {
    /// Call `target` with `value` attached. `Ok` carries return data, `Err` revert data.
    fn invoke(&mut self, target: Address, value: U256, payload: &[u8]) -> Result<Vec<u8>, Vec<u8>>;

    fn has_code(&self, target: Address) -> bool;
}

pub trait EventSink {
    fn emit(&mut self, event: BatchEvent);
}

/// Commit-or-revert support for hosts that do not roll back on their own.
///
/// The EVM discards every effect of a reverted transaction, so the contract host implements
/// this as a no-op.
pub trait Journal {
    type Checkpoint;

    fn checkpoint(&mut self) -> Self::Checkpoint;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}

/// Everything a dispatch needs from its host.
pub trait Host: Environment + NonceStore + CallInvoker + EventSink + Journal {}

impl<T> Host for T where T: Environment + NonceStore + CallInvoker + EventSink + Journal {}
