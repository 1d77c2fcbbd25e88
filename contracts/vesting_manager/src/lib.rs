#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, contracttype, symbol_short, vec, Address,
    BytesN, Env, IntoVal, Symbol,
};

contractmeta!(
    key = "Description",
    val = "Role-gated vesting schedule facade with per-category terms"
);

/// One vesting term: 91 days in seconds. Shared by every category.
pub const TERM_DURATION: u64 = 7_862_400;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidParameters = 4,
    ArithmeticOverflow = 5,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum Category {
    Advisor,
    Team,
    PrivateSale,
    InitialInvestor,
    Community,
}

/// Fixed creation parameters applied to every schedule of a category.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct CategoryTerms {
    pub term_duration: u64,
    /// Basis points of the total unlocked per term.
    pub per_term_bps: u32,
    pub revocable: bool,
}

#[contracttype]
pub enum DataKey {
    Admin,
    Ledger,
    Role(Category, Address),
}

/// Purchased allocations are the only non-revocable category: tokens bought
/// in the sale cannot be cancelled out from under the buyer.
fn terms(category: &Category) -> CategoryTerms {
    match category {
        Category::Advisor => CategoryTerms {
            term_duration: TERM_DURATION,
            per_term_bps: 1_000,
            revocable: true,
        },
        Category::Team => CategoryTerms {
            term_duration: TERM_DURATION,
            per_term_bps: 750,
            revocable: true,
        },
        Category::PrivateSale => CategoryTerms {
            term_duration: TERM_DURATION,
            per_term_bps: 1_000,
            revocable: false,
        },
        Category::InitialInvestor => CategoryTerms {
            term_duration: TERM_DURATION,
            per_term_bps: 272,
            revocable: true,
        },
        Category::Community => CategoryTerms {
            term_duration: TERM_DURATION,
            per_term_bps: 100,
            revocable: true,
        },
    }
}

fn get_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

fn get_ledger_address(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Ledger)
        .ok_or(Error::NotInitialized)
}

fn has_role(env: &Env, category: &Category, member: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Role(*category, member.clone()))
        .unwrap_or(false)
}

#[contract]
pub struct VestingManager;

#[contractimpl]
impl VestingManager {
    pub fn initialize(env: Env, admin: Address, ledger: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Ledger, &ledger);
        env.events()
            .publish((symbol_short!("init"),), (admin, ledger));
        Ok(())
    }

    pub fn grant_role(
        env: Env,
        caller: Address,
        category: Category,
        member: Address,
    ) -> Result<(), Error> {
        let admin = get_admin(&env)?;
        caller.require_auth();
        if caller != admin {
            return Err(Error::Unauthorized);
        }
        env.storage()
            .persistent()
            .set(&DataKey::Role(category, member.clone()), &true);
        env.events()
            .publish((symbol_short!("role"),), (category, member, true));
        Ok(())
    }

    pub fn revoke_role(
        env: Env,
        caller: Address,
        category: Category,
        member: Address,
    ) -> Result<(), Error> {
        let admin = get_admin(&env)?;
        caller.require_auth();
        if caller != admin {
            return Err(Error::Unauthorized);
        }
        env.storage()
            .persistent()
            .set(&DataKey::Role(category, member.clone()), &false);
        env.events()
            .publish((symbol_short!("role"),), (category, member, false));
        Ok(())
    }

    /// Creates a schedule on the ledger with the category's fixed terms.
    /// Callable by the admin or any member holding the category's role.
    pub fn create_allocation(
        env: Env,
        caller: Address,
        category: Category,
        beneficiary: Address,
        start: u64,
        total_amount: i128,
    ) -> Result<BytesN<32>, Error> {
        let admin = get_admin(&env)?;
        caller.require_auth();
        if caller != admin && !has_role(&env, &category, &caller) {
            return Err(Error::Unauthorized);
        }
        if total_amount <= 0 {
            return Err(Error::InvalidParameters);
        }

        let terms = terms(&category);
        let amount_per_term = total_amount
            .checked_mul(terms.per_term_bps as i128)
            .ok_or(Error::ArithmeticOverflow)?
            / 10_000;
        // A total too small for its category fraction would never unlock.
        if amount_per_term <= 0 {
            return Err(Error::InvalidParameters);
        }

        let ledger = get_ledger_address(&env)?;
        let id: BytesN<32> = env.invoke_contract(
            &ledger,
            &Symbol::new(&env, "create_schedule"),
            vec![
                &env,
                env.current_contract_address().into_val(&env),
                beneficiary.into_val(&env),
                start.into_val(&env),
                amount_per_term.into_val(&env),
                terms.term_duration.into_val(&env),
                total_amount.into_val(&env),
                terms.revocable.into_val(&env),
            ],
        );

        env.events().publish(
            (symbol_short!("alloc"), beneficiary),
            (category, id.clone(), total_amount),
        );
        Ok(id)
    }

    /// Private-sale entry for the sale contract: fixed category, start at
    /// the purchase instant supplied by the caller.
    pub fn create_sale_allocation(
        env: Env,
        caller: Address,
        buyer: Address,
        start: u64,
        total_amount: i128,
    ) -> Result<BytesN<32>, Error> {
        Self::create_allocation(env, caller, Category::PrivateSale, buyer, start, total_amount)
    }

    // Read-only queries.

    pub fn terms_for(_env: Env, category: Category) -> CategoryTerms {
        terms(&category)
    }

    pub fn is_member(env: Env, category: Category, member: Address) -> bool {
        has_role(&env, &category, &member)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        get_admin(&env)
    }

    pub fn get_ledger(env: Env) -> Result<Address, Error> {
        get_ledger_address(&env)
    }
}
