//! Off-chain side of sponsored batches: turns a request file into the digest the delegate
//! recomputes and signs it with the account key.

pub mod encoder;
pub mod types;
