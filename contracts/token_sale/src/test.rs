#![allow(clippy::unwrap_used)]

use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{token, Address, Env};
use vesting::{TokenVestingLedger, TokenVestingLedgerClient};
use vesting_manager::{Category, VestingManager, VestingManagerClient, TERM_DURATION};

use crate::{Error, TokenSaleContract, TokenSaleContractClient};

const T0: u64 = 1_700_000_000;
const PRICE: i128 = 2;
const CAP: i128 = 1_000;

fn setup() -> (
    Env,
    TokenSaleContractClient<'static>,
    TokenVestingLedgerClient<'static>,
    VestingManagerClient<'static>,
    Address,
    Address,
    Address,
    token::Client<'static>,
) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|l| l.timestamp = T0);

    let admin = Address::generate(&env);
    let buyer = Address::generate(&env);
    let treasury = Address::generate(&env);
    let token_admin = Address::generate(&env);

    let vested_token = env
        .register_stellar_asset_contract_v2(token_admin.clone())
        .address();
    let vested_sac = token::StellarAssetClient::new(&env, &vested_token);

    let payment_token = env
        .register_stellar_asset_contract_v2(token_admin.clone())
        .address();
    let payment_sac = token::StellarAssetClient::new(&env, &payment_token);
    let payment_client = token::Client::new(&env, &payment_token);

    let ledger_id = env.register_contract(None, TokenVestingLedger);
    let ledger = TokenVestingLedgerClient::new(&env, &ledger_id);
    ledger.initialize(&admin, &vested_token, &0u64);
    vested_sac.mint(&ledger_id, &100_000);

    let manager_id = env.register_contract(None, VestingManager);
    let manager = VestingManagerClient::new(&env, &manager_id);
    manager.initialize(&admin, &ledger_id);
    ledger.set_operator(&admin, &manager_id);

    let sale_id = env.register_contract(None, TokenSaleContract);
    let sale = TokenSaleContractClient::new(&env, &sale_id);
    sale.initialize(&admin, &payment_token, &manager_id, &treasury, &PRICE, &CAP);
    manager.grant_role(&admin, &Category::PrivateSale, &sale_id);

    payment_sac.mint(&buyer, &1_000_000);

    (
        env,
        sale,
        ledger,
        manager,
        admin,
        buyer,
        treasury,
        payment_client,
    )
}

#[test]
fn purchase_end_to_end() {
    let (env, sale, ledger, _, _, buyer, treasury, payment) = setup();

    payment.approve(&buyer, &sale.address, &800i128, &200u32);
    let id = sale.buy_tokens(&buyer, &400i128);

    assert_eq!(payment.balance(&treasury), 800);
    assert_eq!(payment.balance(&buyer), 1_000_000 - 800);
    assert_eq!(sale.tokens_sold(), 400);
    assert_eq!(sale.tokens_remaining(), 600);

    // The purchase opened a non-revocable private-sale schedule at 10% per
    // term, starting at the purchase instant.
    let schedule = ledger.get_schedule(&id);
    assert_eq!(schedule.beneficiary, buyer);
    assert_eq!(schedule.total_amount, 400);
    assert_eq!(schedule.amount_per_term, 40);
    assert_eq!(schedule.term_duration, TERM_DURATION);
    assert_eq!(schedule.start, T0);
    assert!(!schedule.revocable);
    assert_eq!(ledger.committed_total(), 400);
    assert_eq!(ledger.holder_schedule_count(&buyer), 1);

    // One term later the first tranche is claimable.
    env.ledger().with_mut(|l| l.timestamp = T0 + TERM_DURATION);
    assert_eq!(ledger.releasable(&id), 40);
    ledger.release(&buyer, &id, &40i128);
    let vested_token = token::Client::new(&env, &ledger.get_config().token);
    assert_eq!(vested_token.balance(&buyer), 40);
}

#[test]
fn purchase_requires_allowance() {
    let (_env, sale, _, _, _, buyer, _, payment) = setup();

    assert_eq!(
        sale.try_buy_tokens(&buyer, &400i128),
        Err(Ok(Error::PaymentNotApproved))
    );

    // An allowance below the purchase price is not enough either.
    payment.approve(&buyer, &sale.address, &799i128, &200u32);
    assert_eq!(
        sale.try_buy_tokens(&buyer, &400i128),
        Err(Ok(Error::PaymentNotApproved))
    );
    assert_eq!(sale.tokens_sold(), 0);
}

#[test]
fn purchase_is_capped() {
    let (_env, sale, _, _, _, buyer, _, payment) = setup();
    payment.approve(&buyer, &sale.address, &1_000_000i128, &200u32);

    sale.buy_tokens(&buyer, &600i128);
    assert_eq!(
        sale.try_buy_tokens(&buyer, &500i128),
        Err(Ok(Error::SaleExhausted))
    );
    assert_eq!(sale.tokens_sold(), 600);

    // Buying exactly up to the cap is allowed.
    sale.buy_tokens(&buyer, &400i128);
    assert_eq!(sale.tokens_sold(), CAP);
    assert_eq!(sale.tokens_remaining(), 0);
    assert_eq!(
        sale.try_buy_tokens(&buyer, &1i128),
        Err(Ok(Error::SaleExhausted))
    );
}

#[test]
fn purchase_rejects_non_positive_quantities() {
    let (_env, sale, _, _, _, buyer, _, _) = setup();
    assert_eq!(
        sale.try_buy_tokens(&buyer, &0i128),
        Err(Ok(Error::InvalidParameters))
    );
    assert_eq!(
        sale.try_buy_tokens(&buyer, &-10i128),
        Err(Ok(Error::InvalidParameters))
    );
}

#[test]
fn price_multiplication_overflow_fails_loudly() {
    let (env, _, _, manager, admin, buyer, treasury, payment) = setup();

    let payment_token = payment.address.clone();
    let sale_id = env.register_contract(None, TokenSaleContract);
    let sale = TokenSaleContractClient::new(&env, &sale_id);
    sale.initialize(
        &admin,
        &payment_token,
        &manager.address,
        &treasury,
        &i128::MAX,
        &10i128,
    );

    assert_eq!(
        sale.try_buy_tokens(&buyer, &2i128),
        Err(Ok(Error::ArithmeticOverflow))
    );
}

#[test]
fn end_sale_is_admin_only_and_irreversible() {
    let (env, sale, _, _, admin, buyer, _, payment) = setup();

    assert_eq!(
        sale.try_end_sale(&Address::generate(&env)),
        Err(Ok(Error::Unauthorized))
    );

    sale.end_sale(&admin);
    assert!(sale.get_sale().ended);
    assert_eq!(sale.tokens_remaining(), 0);

    payment.approve(&buyer, &sale.address, &1_000i128, &200u32);
    assert_eq!(
        sale.try_buy_tokens(&buyer, &1i128),
        Err(Ok(Error::SaleExhausted))
    );
    assert_eq!(sale.try_end_sale(&admin), Err(Ok(Error::SaleEnded)));
}

#[test]
fn initialize_guards() {
    let (env, sale, _, manager, admin, _, treasury, payment) = setup();

    assert_eq!(
        sale.try_initialize(
            &admin,
            &payment.address,
            &manager.address,
            &treasury,
            &PRICE,
            &CAP
        ),
        Err(Ok(Error::AlreadyInitialized))
    );

    let fresh_id = env.register_contract(None, TokenSaleContract);
    let fresh = TokenSaleContractClient::new(&env, &fresh_id);
    assert_eq!(
        fresh.try_initialize(
            &admin,
            &payment.address,
            &manager.address,
            &treasury,
            &0i128,
            &CAP
        ),
        Err(Ok(Error::InvalidParameters))
    );
    assert_eq!(
        fresh.try_initialize(
            &admin,
            &payment.address,
            &manager.address,
            &treasury,
            &PRICE,
            &0i128
        ),
        Err(Ok(Error::InvalidParameters))
    );
}
