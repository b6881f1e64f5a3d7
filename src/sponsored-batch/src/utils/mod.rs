//! Helpers binding the ABI surface and the EVM to the shared engine.

pub mod abi;
pub mod crypto;
