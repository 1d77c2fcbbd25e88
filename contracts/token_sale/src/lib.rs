#![no_std]

mod contract;
mod storage;

#[cfg(test)]
mod test;

pub use contract::{TokenSaleContract, TokenSaleContractClient};

use soroban_sdk::{contracterror, contracttype, Address};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidParameters = 3,
    Unauthorized = 4,
    SaleExhausted = 5,
    SaleEnded = 6,
    PaymentNotApproved = 7,
    PaymentTransferFailed = 8,
    ArithmeticOverflow = 9,
}

#[derive(Clone)]
#[contracttype]
pub struct SaleConfig {
    pub admin: Address,
    /// Asset buyers pay with.
    pub payment_token: Address,
    /// Schedule-creation facade the sale delegates to.
    pub manager: Address,
    /// Destination of sale proceeds.
    pub treasury: Address,
    /// Payment-token units per sold token.
    pub price: i128,
    pub tokens_cap: i128,
    pub ended: bool,
}

#[contracttype]
pub enum DataKey {
    Config,
    TokensSold,
}
