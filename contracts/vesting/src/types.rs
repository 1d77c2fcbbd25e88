use soroban_sdk::{contracttype, Address, BytesN};

/// A single vesting schedule. Records are append-only: once created they are
/// mutated only by `release` (raises `released`) and `revoke` (sets
/// `revoked`), and are never deleted.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Schedule {
    /// sha256(beneficiary XDR || big-endian sequence number). Never reused.
    pub id: BytesN<32>,
    pub beneficiary: Address,
    /// Vesting start, Unix seconds.
    pub start: u64,
    /// Amount unlocked per elapsed term.
    pub amount_per_term: i128,
    /// Term length in seconds, >= 1.
    pub term_duration: u64,
    /// Total committed to this schedule; `released` never exceeds it.
    pub total_amount: i128,
    /// Cumulative amount already paid out. Monotonically non-decreasing.
    pub released: i128,
    pub revocable: bool,
    pub revoked: bool,
}

#[derive(Clone)]
#[contracttype]
pub struct LedgerConfig {
    pub admin: Address,
    /// The custodied token this ledger holds and pays out.
    pub token: Address,
    /// Unix seconds after which releases are rejected. 0 disables the lock.
    pub release_deadline: u64,
}

#[contracttype]
pub enum DataKey {
    Config,
    Operator,
    Committed,
    ScheduleIds,
    Schedule(BytesN<32>),
    HolderCount(Address),
}
