use soroban_sdk::Env;

use crate::{DataKey, Error, SaleConfig};

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<SaleConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_tokens_sold(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TokensSold)
        .unwrap_or(0)
}

pub fn set_tokens_sold(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TokensSold, &amount);
}
