use alloy_primitives::{Address, Bytes, B256, U256};

/// Observable effects of a committed dispatch, emitted through [`crate::EventSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchEvent {
    CallExecuted {
        target: Address,
        value: U256,
        payload: Bytes,
    },
    BatchExecuted {
        /// Nonce the authorization was signed over (current nonce on the self path).
        nonce: U256,
        call_count: usize,
        calls_fingerprint: B256,
    },
    FeeCharged {
        asset: Address,
        receiver: Address,
        amount: U256,
    },
}
