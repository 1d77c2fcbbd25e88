use soroban_sdk::{
    contract, contractimpl, contractmeta, symbol_short, token, vec, Address, BytesN, Env, IntoVal,
    Symbol,
};

use crate::storage;
use crate::{Error, SaleConfig};

contractmeta!(
    key = "Description",
    val = "Capped token sale with vested delivery"
);

#[contract]
pub struct TokenSaleContract;

#[contractimpl]
impl TokenSaleContract {
    pub fn initialize(
        env: Env,
        admin: Address,
        payment_token: Address,
        manager: Address,
        treasury: Address,
        price: i128,
        tokens_cap: i128,
    ) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        if price <= 0 || tokens_cap <= 0 {
            return Err(Error::InvalidParameters);
        }

        storage::set_config(
            &env,
            &SaleConfig {
                admin: admin.clone(),
                payment_token: payment_token.clone(),
                manager,
                treasury,
                price,
                tokens_cap,
                ended: false,
            },
        );
        storage::set_tokens_sold(&env, 0);

        env.events().publish(
            (symbol_short!("saleinit"),),
            (admin, payment_token, price, tokens_cap),
        );
        Ok(())
    }

    /// Purchases `number_of_tokens`, pulling `number_of_tokens * price` of
    /// the payment token from the buyer's allowance and opening a
    /// private-sale vesting schedule for the buyer starting now.
    pub fn buy_tokens(
        env: Env,
        buyer: Address,
        number_of_tokens: i128,
    ) -> Result<BytesN<32>, Error> {
        let config = storage::get_config(&env)?;
        buyer.require_auth();

        if number_of_tokens <= 0 {
            return Err(Error::InvalidParameters);
        }
        if config.ended {
            return Err(Error::SaleExhausted);
        }
        let sold = storage::get_tokens_sold(&env);
        let new_sold = sold
            .checked_add(number_of_tokens)
            .ok_or(Error::ArithmeticOverflow)?;
        if new_sold > config.tokens_cap {
            return Err(Error::SaleExhausted);
        }

        let amount = number_of_tokens
            .checked_mul(config.price)
            .ok_or(Error::ArithmeticOverflow)?;

        let payment = token::Client::new(&env, &config.payment_token);
        let sale_address = env.current_contract_address();
        if payment.allowance(&buyer, &sale_address) < amount {
            return Err(Error::PaymentNotApproved);
        }
        if payment
            .try_transfer_from(&sale_address, &buyer, &config.treasury, &amount)
            .is_err()
        {
            return Err(Error::PaymentTransferFailed);
        }

        storage::set_tokens_sold(&env, new_sold);

        let now = env.ledger().timestamp();
        let id: BytesN<32> = env.invoke_contract(
            &config.manager,
            &Symbol::new(&env, "create_sale_allocation"),
            vec![
                &env,
                sale_address.into_val(&env),
                buyer.into_val(&env),
                now.into_val(&env),
                number_of_tokens.into_val(&env),
            ],
        );

        env.events().publish(
            (symbol_short!("purchase"), buyer),
            (id.clone(), number_of_tokens, amount),
        );
        Ok(id)
    }

    /// Irreversibly closes the sale: the remaining sellable amount drops to
    /// zero.
    pub fn end_sale(env: Env, caller: Address) -> Result<(), Error> {
        let mut config = storage::get_config(&env)?;
        caller.require_auth();
        if caller != config.admin {
            return Err(Error::Unauthorized);
        }
        if config.ended {
            return Err(Error::SaleEnded);
        }

        config.ended = true;
        config.tokens_cap = storage::get_tokens_sold(&env);
        storage::set_config(&env, &config);

        env.events()
            .publish((symbol_short!("ended"),), (config.tokens_cap,));
        Ok(())
    }

    // Read-only queries.

    pub fn get_sale(env: Env) -> Result<SaleConfig, Error> {
        storage::get_config(&env)
    }

    pub fn tokens_sold(env: Env) -> i128 {
        storage::get_tokens_sold(&env)
    }

    pub fn tokens_remaining(env: Env) -> Result<i128, Error> {
        let config = storage::get_config(&env)?;
        Ok(config.tokens_cap - storage::get_tokens_sold(&env))
    }
}
