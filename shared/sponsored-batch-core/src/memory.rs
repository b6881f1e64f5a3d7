//! In-memory host: plays the account, its native balance, ERC-20 tokens and call targets.
//!
//! Used by the engine's tests and by off-chain tooling to dry-run an authorization before it
//! is handed to a sponsor. State changes are journaled so a failed dispatch leaves no trace.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    errors::{BatchError, BatchResult},
    events::BatchEvent,
    fee::transfer_selector,
    host::{CallInvoker, Environment, EventSink, Journal, NonceStore},
};

/// How a simulated ERC-20 answers `transfer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenBehavior {
    /// Returns `true`, reverts on insufficient balance.
    ReturnsBool,
    /// Returns `false` instead of reverting on insufficient balance.
    ReturnsFalse,
    /// Returns nothing, reverts on insufficient balance.
    NoReturn,
}

/// Setup mistakes reported by [`InMemoryHost::mint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerError {
    UnknownToken(Address),
    BalanceOverflow,
}

/// One successful outbound call, in execution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub target: Address,
    pub value: U256,
    pub payload: Bytes,
}

#[derive(Clone, Debug)]
struct Token {
    behavior: TokenBehavior,
    balances: BTreeMap<Address, U256>,
}

impl Token {
    fn call(&mut self, from: Address, payload: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        if payload.len() < 4 + 32 * 2 || payload[0..4] != transfer_selector() {
            return Err(Vec::new());
        }
        let to = Address::from_slice(&payload[16..36]);
        let amount = U256::from_be_slice(&payload[36..68]);

        let held = self.balances.get(&from).copied().unwrap_or_default();
        if held < amount {
            return match self.behavior {
                TokenBehavior::ReturnsFalse => Ok(bool_word(false)),
                _ => Err(b"ERC20: transfer amount exceeds balance".to_vec()),
            };
        }
        self.balances.insert(from, held - amount);
        let credited = self.balances.get(&to).copied().unwrap_or_default();
        let Some(credited) = credited.checked_add(amount) else {
            self.balances.insert(from, held);
            return Err(b"ERC20: balance overflow".to_vec());
        };
        self.balances.insert(to, credited);

        match self.behavior {
            TokenBehavior::NoReturn => Ok(Vec::new()),
            _ => Ok(bool_word(true)),
        }
    }
}

/// Everything a dispatch may change; snapshotted by [`Journal::checkpoint`].
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    nonces: BTreeMap<Address, U256>,
    balances: BTreeMap<Address, U256>,
    tokens: BTreeMap<Address, Token>,
    invocations: Vec<Invocation>,
    events: Vec<BatchEvent>,
}

#[derive(Clone, Debug)]
pub struct InMemoryHost {
    account: Address,
    caller: Address,
    timestamp: u64,
    contracts: BTreeSet<Address>,
    reverting: BTreeMap<Address, Bytes>,
    ledger: Ledger,
}

impl InMemoryHost {
    /// Host running as `account`, called by `account`, at timestamp 0.
    pub fn new(account: Address) -> Self {
        Self {
            account,
            caller: account,
            timestamp: 0,
            contracts: BTreeSet::new(),
            reverting: BTreeMap::new(),
            ledger: Ledger::default(),
        }
    }

    pub fn set_caller(&mut self, caller: Address) {
        self.caller = caller;
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn set_nonce(&mut self, account: Address, nonce: U256) {
        self.ledger.nonces.insert(account, nonce);
    }

    pub fn set_balance(&mut self, holder: Address, amount: U256) {
        self.ledger.balances.insert(holder, amount);
    }

    pub fn balance_of(&self, holder: Address) -> U256 {
        self.ledger.balances.get(&holder).copied().unwrap_or_default()
    }

    /// Mark `target` as a contract that accepts any call.
    pub fn deploy_contract(&mut self, target: Address) {
        self.contracts.insert(target);
    }

    /// Make every call to `target` revert with `reason`.
    pub fn revert_on(&mut self, target: Address, reason: impl Into<Bytes>) {
        self.contracts.insert(target);
        self.reverting.insert(target, reason.into());
    }

    pub fn deploy_token(&mut self, token: Address, behavior: TokenBehavior) {
        self.contracts.insert(token);
        self.ledger.tokens.insert(
            token,
            Token {
                behavior,
                balances: BTreeMap::new(),
            },
        );
    }

    /// Credit `amount` of `token` to `holder`. The token must be deployed first.
    pub fn mint(&mut self, token: Address, holder: Address, amount: U256) -> Result<(), LedgerError> {
        let deployed = self
            .ledger
            .tokens
            .get_mut(&token)
            .ok_or(LedgerError::UnknownToken(token))?;
        let held = deployed.balances.get(&holder).copied().unwrap_or_default();
        let credited = held.checked_add(amount).ok_or(LedgerError::BalanceOverflow)?;
        deployed.balances.insert(holder, credited);
        Ok(())
    }

    pub fn token_balance(&self, token: Address, holder: Address) -> U256 {
        self.ledger
            .tokens
            .get(&token)
            .and_then(|token| token.balances.get(&holder).copied())
            .unwrap_or_default()
    }

    pub fn events(&self) -> &[BatchEvent] {
        &self.ledger.events
    }

    pub fn invocations(&self) -> &[Invocation] {
        &self.ledger.invocations
    }

    fn transfer_native(&mut self, from: Address, to: Address, value: U256) -> Result<(), Vec<u8>> {
        if value == U256::ZERO {
            return Ok(());
        }
        let held = self.balance_of(from);
        if held < value {
            return Err(Vec::new());
        }
        self.ledger.balances.insert(from, held - value);
        let Some(credited) = self.balance_of(to).checked_add(value) else {
            self.ledger.balances.insert(from, held);
            return Err(Vec::new());
        };
        self.ledger.balances.insert(to, credited);
        Ok(())
    }
}

impl Environment for InMemoryHost {
    fn account(&self) -> Address {
        self.account
    }

    fn caller(&self) -> Address {
        self.caller
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl NonceStore for InMemoryHost {
    fn nonce_of(&self, account: Address) -> U256 {
        self.ledger.nonces.get(&account).copied().unwrap_or_default()
    }

    fn advance_nonce(&mut self, account: Address) -> BatchResult<U256> {
        let next = self
            .nonce_of(account)
            .checked_add(U256::from(1u64))
            .ok_or(BatchError::InvalidNonce)?;
        self.ledger.nonces.insert(account, next);
        Ok(next)
    }
}

impl CallInvoker for InMemoryHost {
    fn invoke(&mut self, target: Address, value: U256, payload: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        if let Some(reason) = self.reverting.get(&target) {
            return Err(reason.to_vec());
        }
        if self.balance_of(self.account) < value {
            return Err(Vec::new());
        }

        let from = self.account;
        let ret = match self.ledger.tokens.get_mut(&target) {
            Some(token) => token.call(from, payload)?,
            None => Vec::new(),
        };
        self.transfer_native(from, target, value)?;

        self.ledger.invocations.push(Invocation {
            target,
            value,
            payload: Bytes::copy_from_slice(payload),
        });
        Ok(ret)
    }

    fn has_code(&self, target: Address) -> bool {
        self.contracts.contains(&target)
    }
}

impl EventSink for InMemoryHost {
    fn emit(&mut self, event: BatchEvent) {
        self.ledger.events.push(event);
    }
}

impl Journal for InMemoryHost {
    type Checkpoint = Ledger;

    fn checkpoint(&mut self) -> Ledger {
        self.ledger.clone()
    }

    fn rollback(&mut self, checkpoint: Ledger) {
        self.ledger = checkpoint;
    }
}

fn bool_word(value: bool) -> Vec<u8> {
    let mut word = alloc::vec![0u8; 32];
    word[31] = u8::from(value);
    word
}
