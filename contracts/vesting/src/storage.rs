use soroban_sdk::{Address, BytesN, Env, Vec};

use crate::errors::Error;
use crate::types::{DataKey, LedgerConfig, Schedule};

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<LedgerConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_operator(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Operator)
}

pub fn set_operator(env: &Env, operator: &Address) {
    env.storage().instance().set(&DataKey::Operator, operator);
}

/// Committed-outstanding total: sum of (total_amount - released) over all
/// non-revoked schedules.
pub fn get_committed(env: &Env) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Committed)
        .unwrap_or(0)
}

pub fn set_committed(env: &Env, amount: i128) {
    env.storage().persistent().set(&DataKey::Committed, &amount);
}

pub fn get_schedule(env: &Env, id: &BytesN<32>) -> Result<Schedule, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Schedule(id.clone()))
        .ok_or(Error::ScheduleNotFound)
}

pub fn set_schedule(env: &Env, schedule: &Schedule) {
    env.storage()
        .persistent()
        .set(&DataKey::Schedule(schedule.id.clone()), schedule);
}

pub fn schedule_ids(env: &Env) -> Vec<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&DataKey::ScheduleIds)
        .unwrap_or(Vec::new(env))
}

pub fn push_schedule_id(env: &Env, id: &BytesN<32>) {
    let mut ids = schedule_ids(env);
    ids.push_back(id.clone());
    env.storage().persistent().set(&DataKey::ScheduleIds, &ids);
}

/// Next sequence number for a beneficiary; sequences are gapless from 0.
pub fn holder_count(env: &Env, beneficiary: &Address) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::HolderCount(beneficiary.clone()))
        .unwrap_or(0)
}

pub fn set_holder_count(env: &Env, beneficiary: &Address, count: u64) {
    env.storage()
        .persistent()
        .set(&DataKey::HolderCount(beneficiary.clone()), &count);
}
