#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

#[macro_use]
extern crate alloc;

pub mod batch_sponsor;
pub mod errors;
pub mod host;
pub mod interfaces;
pub mod utils;

pub use batch_sponsor::BatchSponsor;
