//! Fee settlement, always run before any call of the batch.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, U256};

use crate::{
    errors::{BatchError, BatchResult},
    events::BatchEvent,
    hashing::address_word,
    host::{CallInvoker, EventSink},
    types::Fee,
};

/// Charge `fee` from the account. A zero amount is a no-op.
pub fn settle_fee<H: CallInvoker + EventSink + ?Sized>(host: &mut H, fee: &Fee) -> BatchResult<()> {
    if !fee.is_chargeable() {
        return Ok(());
    }

    if fee.is_native() {
        host.invoke(fee.receiver, fee.amount, &[])
            .map_err(|_| BatchError::FeeNativeTransferFailed)?;
    } else {
        let ret = host
            .invoke(fee.asset, U256::ZERO, &encode_transfer(fee.receiver, fee.amount))
            .map_err(|_| BatchError::FeeTokenTransferFailed)?;
        if !transfer_succeeded(&ret, host.has_code(fee.asset)) {
            return Err(BatchError::FeeTokenTransferFailed);
        }
    }

    host.emit(BatchEvent::FeeCharged {
        asset: fee.asset,
        receiver: fee.receiver,
        amount: fee.amount,
    });
    Ok(())
}

/// Calldata for ERC-20 `transfer(address,uint256)`.
pub fn encode_transfer(to: Address, amount: U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32 * 2);
    data.extend_from_slice(&transfer_selector());
    data.extend_from_slice(&address_word(to));
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    data
}

/// Selector of ERC-20 `transfer(address,uint256)` (`0xa9059cbb`).
pub fn transfer_selector() -> [u8; 4] {
    selector("transfer(address,uint256)")
}

/// Tokens either return `true` or nothing at all; empty return data only counts when the
/// asset actually has code.
fn transfer_succeeded(ret: &[u8], has_code: bool) -> bool {
    if ret.is_empty() {
        return has_code;
    }
    ret.len() >= 32 && U256::from_be_slice(&ret[0..32]) == U256::from(1u64)
}

fn selector(sig: &str) -> [u8; 4] {
    let h = keccak256(sig.as_bytes());
    [h[0], h[1], h[2], h[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryHost, TokenBehavior};

    const ACCOUNT: Address = Address::repeat_byte(0xac);
    const RECEIVER: Address = Address::repeat_byte(0xfe);
    const TOKEN: Address = Address::repeat_byte(0x70);

    #[test]
    fn test_transfer_selector() {
        let data = encode_transfer(RECEIVER, U256::from(5u64));
        assert_eq!(&data[0..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 68);
        assert_eq!(&data[16..36], RECEIVER.as_slice());
        assert_eq!(data[67], 5);
    }

    #[test]
    fn test_transfer_return_conventions() {
        let mut word = [0u8; 32];
        word[31] = 1;
        assert!(transfer_succeeded(&word, true));
        assert!(transfer_succeeded(&[], true));
        assert!(!transfer_succeeded(&[], false));
        assert!(!transfer_succeeded(&[0u8; 32], true));
        assert!(!transfer_succeeded(&[1u8], true));
    }

    #[test]
    fn test_zero_fee_is_noop() {
        let mut host = InMemoryHost::new(ACCOUNT);
        settle_fee(&mut host, &Fee::token(TOKEN, U256::ZERO, RECEIVER)).unwrap();
        assert!(host.events().is_empty());
        assert!(host.invocations().is_empty());
    }

    #[test]
    fn test_native_fee() {
        let mut host = InMemoryHost::new(ACCOUNT);
        host.set_balance(ACCOUNT, U256::from(10u64));

        settle_fee(&mut host, &Fee::native(U256::from(4u64), RECEIVER)).unwrap();

        assert_eq!(host.balance_of(ACCOUNT), U256::from(6u64));
        assert_eq!(host.balance_of(RECEIVER), U256::from(4u64));
        assert_eq!(
            host.events(),
            &[BatchEvent::FeeCharged {
                asset: Address::ZERO,
                receiver: RECEIVER,
                amount: U256::from(4u64),
            }]
        );
    }

    #[test]
    fn test_native_fee_insufficient_balance() {
        let mut host = InMemoryHost::new(ACCOUNT);
        host.set_balance(ACCOUNT, U256::from(3u64));

        let err = settle_fee(&mut host, &Fee::native(U256::from(4u64), RECEIVER)).unwrap_err();
        assert_eq!(err, BatchError::FeeNativeTransferFailed);
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_token_fee() {
        let mut host = InMemoryHost::new(ACCOUNT);
        host.deploy_token(TOKEN, TokenBehavior::ReturnsBool);
        host.mint(TOKEN, ACCOUNT, U256::from(9u64)).unwrap();

        settle_fee(&mut host, &Fee::token(TOKEN, U256::from(5u64), RECEIVER)).unwrap();

        assert_eq!(host.token_balance(TOKEN, ACCOUNT), U256::from(4u64));
        assert_eq!(host.token_balance(TOKEN, RECEIVER), U256::from(5u64));
    }

    #[test]
    fn test_token_fee_without_return_value() {
        let mut host = InMemoryHost::new(ACCOUNT);
        host.deploy_token(TOKEN, TokenBehavior::NoReturn);
        host.mint(TOKEN, ACCOUNT, U256::from(9u64)).unwrap();

        settle_fee(&mut host, &Fee::token(TOKEN, U256::from(5u64), RECEIVER)).unwrap();
        assert_eq!(host.token_balance(TOKEN, RECEIVER), U256::from(5u64));
    }

    #[test]
    fn test_token_fee_failures() {
        for behavior in [TokenBehavior::ReturnsBool, TokenBehavior::ReturnsFalse] {
            let mut host = InMemoryHost::new(ACCOUNT);
            host.deploy_token(TOKEN, behavior);
            host.mint(TOKEN, ACCOUNT, U256::from(4u64)).unwrap();

            let err = settle_fee(&mut host, &Fee::token(TOKEN, U256::from(5u64), RECEIVER)).unwrap_err();
            assert_eq!(err, BatchError::FeeTokenTransferFailed);
            assert!(host.events().is_empty());
        }
    }

    #[test]
    fn test_token_fee_to_codeless_asset() {
        let mut host = InMemoryHost::new(ACCOUNT);
        let err = settle_fee(&mut host, &Fee::token(TOKEN, U256::from(5u64), RECEIVER)).unwrap_err();
        assert_eq!(err, BatchError::FeeTokenTransferFailed);
    }
}
