#![no_std]

mod accrual;
mod contract;
mod errors;
mod storage;
mod types;


pub use contract::{TokenVestingLedger, TokenVestingLedgerClient};
pub use errors::Error;
pub use types::{LedgerConfig, Schedule};
