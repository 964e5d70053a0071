//! Per-holder notional ledger and known-user index.
//!
//! Notional records each holder's historical token contribution. It moves
//! proportionally with shares on mint, burn and transfer, and is never read
//! by redemption math.

use crate::error::VaultError;
use crate::storage;
use soroban_sdk::{Address, Env, Vec};
use vault_math::mul_div_floor;
use vault_types::{TokenPair, MAX_PAGE_SIZE};

pub fn get(env: &Env, user: &Address) -> TokenPair {
    storage::get_notional(env, user)
}

/// Record a deposit of `amount0`/`amount1` by `user`
pub fn add(env: &Env, user: &Address, amount0: u128, amount1: u128) -> Result<(), VaultError> {
    let mut notional = storage::get_notional(env, user);
    notional.amount0 = notional
        .amount0
        .checked_add(amount0)
        .ok_or(VaultError::ArithmeticOverflow)?;
    notional.amount1 = notional
        .amount1
        .checked_add(amount1)
        .ok_or(VaultError::ArithmeticOverflow)?;
    storage::set_notional(env, user, &notional);
    Ok(())
}

/// Portion of `user`'s notional that follows `shares` out of a balance of
/// `balance_before`
fn portion(
    env: &Env,
    notional: &TokenPair,
    shares: u128,
    balance_before: u128,
) -> Result<TokenPair, VaultError> {
    Ok(TokenPair::new(
        mul_div_floor(env, notional.amount0, shares, balance_before)?,
        mul_div_floor(env, notional.amount1, shares, balance_before)?,
    ))
}

/// Drop the fraction `shares / balance_before` of `user`'s notional
pub fn reduce(
    env: &Env,
    user: &Address,
    shares: u128,
    balance_before: u128,
) -> Result<(), VaultError> {
    let notional = storage::get_notional(env, user);
    if notional.is_zero() {
        return Ok(());
    }
    let removed = portion(env, &notional, shares, balance_before)?;
    storage::set_notional(
        env,
        user,
        &TokenPair::new(
            notional.amount0 - removed.amount0,
            notional.amount1 - removed.amount1,
        ),
    );
    Ok(())
}

/// Move the fraction `amount / from_balance` of `from`'s notional to `to`.
/// The pair sum is preserved exactly.
pub fn on_transfer(
    env: &Env,
    from: &Address,
    to: &Address,
    amount: u128,
    from_balance: u128,
) -> Result<(), VaultError> {
    let notional = storage::get_notional(env, from);
    if !notional.is_zero() {
        let moved = portion(env, &notional, amount, from_balance)?;
        storage::set_notional(
            env,
            from,
            &TokenPair::new(
                notional.amount0 - moved.amount0,
                notional.amount1 - moved.amount1,
            ),
        );
        add(env, to, moved.amount0, moved.amount1)?;
    }
    register(env, to);
    Ok(())
}

/// Append `user` to the known-user index if it is new
pub fn register(env: &Env, user: &Address) {
    if !storage::is_known_user(env, user) {
        storage::push_known_user(env, user);
    }
}

pub fn known_user_count(env: &Env) -> u32 {
    storage::get_known_user_count(env)
}

/// Known users in insertion order, paginated (limit capped at 50)
pub fn known_users(env: &Env, start: u32, limit: u32) -> Vec<Address> {
    let count = storage::get_known_user_count(env);
    let end = start.saturating_add(limit.min(MAX_PAGE_SIZE)).min(count);

    let mut users = Vec::new(env);
    for index in start..end {
        if let Some(user) = storage::get_known_user_at(env, index) {
            users.push_back(user);
        }
    }
    users
}
