use alloy_primitives::{Bytes, B256, U256};

use crate::{
    errors::{BatchError, BatchResult},
    events::BatchEvent,
    host::{CallInvoker, EventSink},
    types::{BatchReceipt, Call},
};

/// Run `calls` in order, stopping at the first failure.
///
/// Effects of earlier calls are not undone here; the dispatcher rolls back the whole unit
/// when this returns an error.
pub fn execute_batch<H: CallInvoker + EventSink + ?Sized>(
    host: &mut H,
    calls: &[Call],
    nonce: U256,
    calls_fingerprint: B256,
) -> BatchResult<BatchReceipt> {
    for (index, call) in calls.iter().enumerate() {
        host.invoke(call.target, call.value, &call.payload)
            .map_err(|reason| BatchError::CallReverted {
                index,
                reason: Bytes::from(reason),
            })?;
        host.emit(BatchEvent::CallExecuted {
            target: call.target,
            value: call.value,
            payload: call.payload.clone(),
        });
    }

    host.emit(BatchEvent::BatchExecuted {
        nonce,
        call_count: calls.len(),
        calls_fingerprint,
    });

    Ok(BatchReceipt {
        nonce,
        call_count: calls.len(),
        calls_fingerprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hashing::calls_fingerprint, memory::InMemoryHost};
    use alloy_primitives::Address;

    const ACCOUNT: Address = Address::repeat_byte(0xac);

    #[test]
    fn test_calls_run_in_order() {
        let mut host = InMemoryHost::new(ACCOUNT);
        host.set_balance(ACCOUNT, U256::from(100u64));
        let calls = vec![
            Call::new(Address::repeat_byte(2), U256::from(1u64), Bytes::from_static(b"b")),
            Call::new(Address::repeat_byte(1), U256::from(2u64), Bytes::from_static(b"a")),
        ];
        let fingerprint = calls_fingerprint(&calls);

        let receipt = execute_batch(&mut host, &calls, U256::from(3u64), fingerprint).unwrap();

        assert_eq!(receipt.call_count, 2);
        assert_eq!(receipt.nonce, U256::from(3u64));
        let targets: Vec<_> = host.invocations().iter().map(|i| i.target).collect();
        assert_eq!(targets, vec![Address::repeat_byte(2), Address::repeat_byte(1)]);
        assert_eq!(host.events().len(), 3);
        assert_eq!(
            host.events()[2],
            BatchEvent::BatchExecuted {
                nonce: U256::from(3u64),
                call_count: 2,
                calls_fingerprint: fingerprint,
            }
        );
    }

    #[test]
    fn test_first_failure_stops_batch() {
        let mut host = InMemoryHost::new(ACCOUNT);
        host.revert_on(Address::repeat_byte(2), Bytes::from_static(b"boom"));
        let calls = vec![
            Call::new(Address::repeat_byte(1), U256::ZERO, Bytes::new()),
            Call::new(Address::repeat_byte(2), U256::ZERO, Bytes::new()),
            Call::new(Address::repeat_byte(3), U256::ZERO, Bytes::new()),
        ];

        let err = execute_batch(&mut host, &calls, U256::ZERO, calls_fingerprint(&calls)).unwrap_err();

        assert_eq!(
            err,
            BatchError::CallReverted {
                index: 1,
                reason: Bytes::from_static(b"boom"),
            }
        );
        assert!(host
            .invocations()
            .iter()
            .all(|i| i.target != Address::repeat_byte(3)));
    }

    #[test]
    fn test_empty_batch() {
        let mut host = InMemoryHost::new(ACCOUNT);
        let receipt = execute_batch(&mut host, &[], U256::ZERO, calls_fingerprint(&[])).unwrap();
        assert_eq!(receipt.call_count, 0);
        assert_eq!(host.events().len(), 1);
    }
}
