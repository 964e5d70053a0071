use soroban_sdk::{Address, Env, Symbol};
use vault_types::{FeeRates, TickRange};

pub fn initialized(env: &Env, pool: &Address, manager: &Address) {
    env.events().publish(
        (Symbol::new(env, "initialized"),),
        (pool.clone(), manager.clone()),
    );
}

pub fn minted(env: &Env, to: &Address, shares: u128, amount0: u128, amount1: u128) {
    env.events().publish(
        (Symbol::new(env, "minted"), to.clone()),
        (shares, amount0, amount1),
    );
}

pub fn burned(env: &Env, from: &Address, shares: u128, amount0: u128, amount1: u128) {
    env.events().publish(
        (Symbol::new(env, "burned"), from.clone()),
        (shares, amount0, amount1),
    );
}

pub fn transfer(env: &Env, from: &Address, to: &Address, amount: u128) {
    env.events().publish(
        (Symbol::new(env, "transfer"), from.clone(), to.clone()),
        amount,
    );
}

pub fn approve(env: &Env, from: &Address, spender: &Address, amount: i128, expiration_ledger: u32) {
    env.events().publish(
        (Symbol::new(env, "approve"), from.clone(), spender.clone()),
        (amount, expiration_ledger),
    );
}

pub fn range_updated(env: &Env, range: &TickRange) {
    env.events().publish(
        (Symbol::new(env, "range_updated"),),
        (range.lower, range.upper),
    );
}

pub fn liquidity_added(env: &Env, range: &TickRange, liquidity: u128, amount0: u128, amount1: u128) {
    env.events().publish(
        (Symbol::new(env, "liquidity_added"),),
        (range.lower, range.upper, liquidity, amount0, amount1),
    );
}

pub fn liquidity_removed(
    env: &Env,
    range: &TickRange,
    liquidity: u128,
    amount0: u128,
    amount1: u128,
) {
    env.events().publish(
        (Symbol::new(env, "liquidity_removed"),),
        (range.lower, range.upper, liquidity, amount0, amount1),
    );
}

/// Realized pool fees and the portions skimmed for the manager and the
/// secondary recipient
pub fn fees_earned(env: &Env, fee0: u128, fee1: u128, manager: (u128, u128), other: (u128, u128)) {
    env.events().publish(
        (Symbol::new(env, "fees_earned"),),
        (fee0, fee1, manager.0, manager.1, other.0, other.1),
    );
}

pub fn fees_updated(env: &Env, fees: &FeeRates) {
    env.events().publish(
        (Symbol::new(env, "fees_updated"),),
        (fees.managing_bps, fees.performance_bps, fees.other_bps),
    );
}

pub fn manager_collected(env: &Env, manager: &Address, amount0: u128, amount1: u128) {
    env.events().publish(
        (Symbol::new(env, "manager_collected"), manager.clone()),
        (amount0, amount1),
    );
}

pub fn other_collected(env: &Env, recipient: &Address, amount0: u128, amount1: u128) {
    env.events().publish(
        (Symbol::new(env, "other_collected"), recipient.clone()),
        (amount0, amount1),
    );
}

pub fn swapped(env: &Env, zero_for_one: bool, amount_in: u128, amount_out: u128) {
    env.events().publish(
        (Symbol::new(env, "swapped"),),
        (zero_for_one, amount_in, amount_out),
    );
}

pub fn rebalanced(env: &Env, venue: &Address, zero_for_one: bool, spent: u128, received: u128) {
    env.events().publish(
        (Symbol::new(env, "rebalanced"), venue.clone()),
        (zero_for_one, spent, received),
    );
}

pub fn venue_allowed(env: &Env, venue: &Address, allowed: bool) {
    env.events().publish(
        (Symbol::new(env, "venue_allowed"), venue.clone()),
        allowed,
    );
}

pub fn paused(env: &Env, paused: bool) {
    env.events().publish((Symbol::new(env, "paused"),), paused);
}

pub fn manager_set(env: &Env, manager: &Address) {
    env.events()
        .publish((Symbol::new(env, "manager_set"),), manager.clone());
}

pub fn owner_set(env: &Env, owner: &Address) {
    env.events()
        .publish((Symbol::new(env, "owner_set"),), owner.clone());
}
