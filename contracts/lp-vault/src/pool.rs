//! Cross-contract calls into the liquidity pool.
//!
//! The pool keys positions by `(owner, tick_lower, tick_upper)` with the vault
//! as owner, so only the vault can burn or collect its own liquidity.

use crate::error::{to_i128, VaultError};
use crate::settlement;
use soroban_sdk::{token, Address, Env, IntoVal, Symbol};
use vault_types::{PoolState, PositionInfo, PositionKey, TickInfo, TickRange, VaultConfig};

pub fn get_state(env: &Env, pool: &Address) -> PoolState {
    env.invoke_contract(pool, &Symbol::new(env, "get_state"), ().into_val(env))
}

pub fn get_tick(env: &Env, pool: &Address, tick: i32) -> TickInfo {
    env.invoke_contract(pool, &Symbol::new(env, "get_tick"), (tick,).into_val(env))
}

pub fn position_key(env: &Env, range: &TickRange) -> PositionKey {
    PositionKey {
        owner: env.current_contract_address(),
        tick_lower: range.lower,
        tick_upper: range.upper,
    }
}

/// The vault's own position at `range`
pub fn get_position(env: &Env, pool: &Address, range: &TickRange) -> PositionInfo {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "get_position"),
        (env.current_contract_address(), range.lower, range.upper).into_val(env),
    )
}

pub fn token0(env: &Env, pool: &Address) -> Address {
    env.invoke_contract(pool, &Symbol::new(env, "token0"), ().into_val(env))
}

pub fn token1(env: &Env, pool: &Address) -> Address {
    env.invoke_contract(pool, &Symbol::new(env, "token1"), ().into_val(env))
}

pub fn tick_spacing(env: &Env, pool: &Address) -> i32 {
    env.invoke_contract(pool, &Symbol::new(env, "tick_spacing"), ().into_val(env))
}

/// Add `liquidity` at `range`, paying at most `max0`/`max1`.
/// Returns the amounts the pool pulled.
pub fn mint(
    env: &Env,
    config: &VaultConfig,
    range: &TickRange,
    liquidity: u128,
    max0: u128,
    max1: u128,
) -> Result<(u128, u128), VaultError> {
    let (paid0, paid1) = settlement::settle_with_pool(env, config, max0, max1, || {
        let (owed0, owed1): (u128, u128) = env.invoke_contract(
            &config.pool,
            &Symbol::new(env, "mint"),
            (env.current_contract_address(), range.lower, range.upper, liquidity).into_val(env),
        );
        (
            i128::try_from(owed0).unwrap_or(i128::MAX),
            i128::try_from(owed1).unwrap_or(i128::MAX),
        )
    })?;
    Ok((paid0 as u128, paid1 as u128))
}

/// Remove `liquidity` at `range`. The principal is credited to the
/// position's owed balances and must be collected separately.
pub fn burn(env: &Env, pool: &Address, range: &TickRange, liquidity: u128) -> (u128, u128) {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "burn"),
        (env.current_contract_address(), range.lower, range.upper, liquidity).into_val(env),
    )
}

/// Collect everything owed to the vault's position at `range`
pub fn collect_all(
    env: &Env,
    config: &VaultConfig,
    range: &TickRange,
) -> Result<(u128, u128), VaultError> {
    let vault = env.current_contract_address();
    let token0 = token::Client::new(env, &config.token0);
    let token1 = token::Client::new(env, &config.token1);
    let before0 = token0.balance(&vault);
    let before1 = token1.balance(&vault);

    let (collected0, collected1): (u128, u128) = env.invoke_contract(
        &config.pool,
        &Symbol::new(env, "collect"),
        (
            vault.clone(),
            vault.clone(),
            range.lower,
            range.upper,
            u128::MAX,
            u128::MAX,
        )
            .into_val(env),
    );

    if token0.balance(&vault) - before0 != to_i128(collected0)?
        || token1.balance(&vault) - before1 != to_i128(collected1)?
    {
        return Err(VaultError::SettlementMismatch);
    }
    Ok((collected0, collected1))
}

/// Exact-input swap of `amount_in` against the pool. Returns the amount
/// received.
pub fn swap(
    env: &Env,
    config: &VaultConfig,
    zero_for_one: bool,
    amount_in: u128,
    sqrt_price_limit_x96: u128,
) -> Result<u128, VaultError> {
    let (max0, max1) = if zero_for_one {
        (amount_in, 0)
    } else {
        (0, amount_in)
    };
    let amount_specified = to_i128(amount_in)?;

    let (delta0, delta1) = settlement::settle_with_pool(env, config, max0, max1, || {
        env.invoke_contract(
            &config.pool,
            &Symbol::new(env, "swap"),
            (
                env.current_contract_address(),
                zero_for_one,
                amount_specified,
                sqrt_price_limit_x96,
            )
                .into_val(env),
        )
    })?;

    let received = if zero_for_one { -delta1 } else { -delta0 };
    Ok(u128::try_from(received).unwrap_or(0))
}
