//! Engine behind sponsored batch execution for a delegated (7702) account.
//!
//! A sponsor submits a batch of calls together with a signature produced by the account's
//! own key. The engine binds that signature to exactly one batch, one fee, one replay nonce
//! and one deadline, settles the fee first and then runs the batch all-or-nothing.
//!
//! The crate is `no_std` so the Stylus contract and the off-chain tooling share one
//! implementation of the hashing protocol. Everything host-specific (storage, external
//! calls, logs, signature recovery) sits behind the traits in [`host`] and [`signature`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod dispatcher;
pub mod errors;
pub mod events;
pub mod executor;
pub mod fee;
pub mod hashing;
pub mod host;
pub mod memory;
pub mod signature;
pub mod types;

pub use dispatcher::Dispatcher;
pub use errors::{BatchError, BatchResult};
pub use events::BatchEvent;
pub use hashing::{authorization_digest, calls_fingerprint, eth_signed_message_hash};
pub use host::{CallInvoker, Environment, EventSink, Host, Journal, NonceStore};
pub use signature::SignatureVerifier;
pub use types::{Authorization, BatchReceipt, Call, Fee};

#[cfg(any(test, feature = "k256"))]
pub use signature::K256Verifier;
