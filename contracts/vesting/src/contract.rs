use soroban_sdk::{
    contract, contractimpl, contractmeta, symbol_short, token, xdr::ToXdr, Address, Bytes, BytesN,
    Env, Symbol,
};

use crate::accrual;
use crate::errors::Error;
use crate::storage;
use crate::types::{LedgerConfig, Schedule};

contractmeta!(
    key = "Description",
    val = "Token vesting ledger with revocable term schedules"
);

// Operation-in-progress fence, held in temporary storage for the span of a
// single invocation; a failed invocation rolls it back with everything else.
const OP_LOCK: Symbol = symbol_short!("oplock");

#[contract]
pub struct TokenVestingLedger;

pub(crate) fn acquire_op_lock(env: &Env) -> Result<(), Error> {
    let locked: bool = env.storage().temporary().get(&OP_LOCK).unwrap_or(false);
    if locked {
        return Err(Error::ReentrantCall);
    }
    env.storage().temporary().set(&OP_LOCK, &true);
    Ok(())
}

pub(crate) fn release_op_lock(env: &Env) {
    env.storage().temporary().remove(&OP_LOCK);
}

/// Deterministic schedule id for (beneficiary, sequence). Sequences are the
/// beneficiary's schedule count at creation time, so ids are computable
/// before creation.
fn schedule_id_for(env: &Env, beneficiary: &Address, sequence: u64) -> BytesN<32> {
    let mut payload = Bytes::new(env);
    payload.append(&beneficiary.clone().to_xdr(env));
    payload.append(&Bytes::from_slice(env, &sequence.to_be_bytes()));
    env.crypto().sha256(&payload).into()
}

/// Custodied balance minus committed-outstanding: what creation may consume
/// and the admin may withdraw.
fn free_balance(env: &Env, config: &LedgerConfig) -> Result<i128, Error> {
    let balance = token::Client::new(env, &config.token).balance(&env.current_contract_address());
    balance
        .checked_sub(storage::get_committed(env))
        .ok_or(Error::ArithmeticOverflow)
}

#[contractimpl]
impl TokenVestingLedger {
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        release_deadline: u64,
    ) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        storage::set_config(
            &env,
            &LedgerConfig {
                admin: admin.clone(),
                token: token.clone(),
                release_deadline,
            },
        );
        storage::set_committed(&env, 0);

        env.events()
            .publish((symbol_short!("init"),), (admin, token, release_deadline));
        Ok(())
    }

    /// Authorizes a single schedule-creating contract (the facade) besides
    /// the admin.
    pub fn set_operator(env: Env, caller: Address, operator: Address) -> Result<(), Error> {
        let config = storage::get_config(&env)?;
        caller.require_auth();
        if caller != config.admin {
            return Err(Error::Unauthorized);
        }
        storage::set_operator(&env, &operator);
        env.events().publish((symbol_short!("operator"),), (operator,));
        Ok(())
    }

    pub fn create_schedule(
        env: Env,
        creator: Address,
        beneficiary: Address,
        start: u64,
        amount_per_term: i128,
        term_duration: u64,
        total_amount: i128,
        revocable: bool,
    ) -> Result<BytesN<32>, Error> {
        acquire_op_lock(&env)?;
        let config = storage::get_config(&env)?;
        creator.require_auth();
        if creator != config.admin && storage::get_operator(&env) != Some(creator.clone()) {
            return Err(Error::Unauthorized);
        }
        if amount_per_term <= 0 || total_amount <= 0 || term_duration < 1 {
            return Err(Error::InvalidParameters);
        }
        if free_balance(&env, &config)? < total_amount {
            return Err(Error::InsufficientReserve);
        }

        let sequence = storage::holder_count(&env, &beneficiary);
        let id = schedule_id_for(&env, &beneficiary, sequence);
        let schedule = Schedule {
            id: id.clone(),
            beneficiary: beneficiary.clone(),
            start,
            amount_per_term,
            term_duration,
            total_amount,
            released: 0,
            revocable,
            revoked: false,
        };

        storage::set_schedule(&env, &schedule);
        storage::push_schedule_id(&env, &id);
        storage::set_holder_count(&env, &beneficiary, sequence + 1);
        let committed = storage::get_committed(&env)
            .checked_add(total_amount)
            .ok_or(Error::ArithmeticOverflow)?;
        storage::set_committed(&env, committed);

        env.events().publish(
            (symbol_short!("created"), beneficiary),
            (id.clone(), total_amount, start),
        );
        release_op_lock(&env);
        Ok(id)
    }

    /// Pays out up to the vested-but-unreleased amount. Callable by the
    /// schedule's beneficiary or the admin. State is finalized before the
    /// token transfer is issued.
    pub fn release(env: Env, caller: Address, id: BytesN<32>, amount: i128) -> Result<(), Error> {
        acquire_op_lock(&env)?;
        let config = storage::get_config(&env)?;
        caller.require_auth();

        let mut schedule = storage::get_schedule(&env, &id)?;
        if caller != schedule.beneficiary && caller != config.admin {
            return Err(Error::Unauthorized);
        }
        if schedule.revoked {
            return Err(Error::ScheduleRevoked);
        }
        let now = env.ledger().timestamp();
        if config.release_deadline != 0 && now > config.release_deadline {
            return Err(Error::ReleaseExpired);
        }
        if amount <= 0 {
            return Err(Error::InvalidParameters);
        }
        if amount > accrual::releasable_amount(&schedule, now)? {
            return Err(Error::NotYetVested);
        }

        schedule.released = schedule
            .released
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        let committed = storage::get_committed(&env)
            .checked_sub(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        storage::set_schedule(&env, &schedule);
        storage::set_committed(&env, committed);

        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &schedule.beneficiary,
            &amount,
        );

        env.events().publish(
            (symbol_short!("released"), schedule.beneficiary),
            (id, amount),
        );
        release_op_lock(&env);
        Ok(())
    }

    /// Cancels a revocable schedule: settles the vested-but-unreleased
    /// amount to the beneficiary, frees the remainder from the committed
    /// total and freezes the schedule. Admin-only.
    pub fn revoke(env: Env, caller: Address, id: BytesN<32>) -> Result<(), Error> {
        acquire_op_lock(&env)?;
        let config = storage::get_config(&env)?;
        caller.require_auth();
        if caller != config.admin {
            return Err(Error::Unauthorized);
        }

        let mut schedule = storage::get_schedule(&env, &id)?;
        if schedule.revoked {
            return Err(Error::ScheduleRevoked);
        }
        if !schedule.revocable {
            return Err(Error::ScheduleNotRevocable);
        }

        let now = env.ledger().timestamp();
        let vested_due = accrual::releasable_amount(&schedule, now)?;
        let mut committed = storage::get_committed(&env);
        if vested_due > 0 {
            schedule.released = schedule
                .released
                .checked_add(vested_due)
                .ok_or(Error::ArithmeticOverflow)?;
            committed = committed
                .checked_sub(vested_due)
                .ok_or(Error::ArithmeticOverflow)?;
        }
        let remainder = schedule
            .total_amount
            .checked_sub(schedule.released)
            .ok_or(Error::ArithmeticOverflow)?;
        committed = committed
            .checked_sub(remainder)
            .ok_or(Error::ArithmeticOverflow)?;
        schedule.revoked = true;

        storage::set_schedule(&env, &schedule);
        storage::set_committed(&env, committed);

        if vested_due > 0 {
            token::Client::new(&env, &config.token).transfer(
                &env.current_contract_address(),
                &schedule.beneficiary,
                &vested_due,
            );
        }

        env.events().publish(
            (symbol_short!("revoked"), schedule.beneficiary),
            (id, vested_due, remainder),
        );
        release_op_lock(&env);
        Ok(())
    }

    /// Withdraws custodied tokens in excess of the committed-outstanding
    /// total to the admin.
    pub fn withdraw_surplus(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        acquire_op_lock(&env)?;
        let config = storage::get_config(&env)?;
        caller.require_auth();
        if caller != config.admin {
            return Err(Error::Unauthorized);
        }
        if amount <= 0 {
            return Err(Error::InvalidParameters);
        }
        if amount > free_balance(&env, &config)? {
            return Err(Error::InsufficientReserve);
        }

        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &config.admin,
            &amount,
        );

        env.events()
            .publish((symbol_short!("withdrawn"),), (config.admin, amount));
        release_op_lock(&env);
        Ok(())
    }

    // Read-only queries.

    pub fn get_schedule(env: Env, id: BytesN<32>) -> Result<Schedule, Error> {
        storage::get_schedule(&env, &id)
    }

    pub fn get_schedule_by_holder(
        env: Env,
        beneficiary: Address,
        index: u64,
    ) -> Result<Schedule, Error> {
        let id = schedule_id_for(&env, &beneficiary, index);
        storage::get_schedule(&env, &id)
    }

    pub fn schedule_count(env: Env) -> u32 {
        storage::schedule_ids(&env).len()
    }

    pub fn schedule_id_at(env: Env, index: u32) -> Result<BytesN<32>, Error> {
        storage::schedule_ids(&env)
            .get(index)
            .ok_or(Error::IndexOutOfBounds)
    }

    pub fn holder_schedule_count(env: Env, beneficiary: Address) -> u64 {
        storage::holder_count(&env, &beneficiary)
    }

    /// Id the next `create_schedule` for this beneficiary will be assigned.
    pub fn next_schedule_id(env: Env, beneficiary: Address) -> BytesN<32> {
        let sequence = storage::holder_count(&env, &beneficiary);
        schedule_id_for(&env, &beneficiary, sequence)
    }

    pub fn releasable(env: Env, id: BytesN<32>) -> Result<i128, Error> {
        let schedule = storage::get_schedule(&env, &id)?;
        accrual::releasable_amount(&schedule, env.ledger().timestamp())
    }

    pub fn committed_total(env: Env) -> i128 {
        storage::get_committed(&env)
    }

    pub fn withdrawable(env: Env) -> Result<i128, Error> {
        let config = storage::get_config(&env)?;
        free_balance(&env, &config)
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, Error> {
        storage::get_config(&env)
    }

    pub fn get_operator(env: Env) -> Option<Address> {
        storage::get_operator(&env)
    }
}
