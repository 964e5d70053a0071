//! Manager-driven trades: pool swaps and external venue rebalances.

use crate::accounting::passive_balances;
use crate::error::{non_negative, positive, VaultError};
use crate::settlement::{grant, revoke};
use crate::{access, events, pool, storage};
use soroban_sdk::{log, token, Address, Env, IntoVal, Symbol, Val, Vec};
use vault_math::mul_div_floor;
use vault_types::{
    RebalanceGuard, VaultConfig, BPS_DENOMINATOR, MAX_ALLOWED_VENUES, MAX_SQRT_RATIO,
    MIN_SQRT_RATIO, ORACLE_DEVIATION_BPS,
};

fn input_output(config: &VaultConfig, zero_for_one: bool) -> (Address, Address) {
    if zero_for_one {
        (config.token0.clone(), config.token1.clone())
    } else {
        (config.token1.clone(), config.token0.clone())
    }
}

fn require_passive(
    env: &Env,
    config: &VaultConfig,
    zero_for_one: bool,
    amount_in: u128,
) -> Result<(), VaultError> {
    let (passive0, passive1) = passive_balances(env, config);
    let available = if zero_for_one { passive0 } else { passive1 };
    if amount_in > available {
        return Err(VaultError::InsufficientPassiveBalance);
    }
    Ok(())
}

/// Exact-input swap of passive balance against the pool. A zero price
/// limit means no limit.
pub fn swap(
    env: &Env,
    zero_for_one: bool,
    amount_in: i128,
    sqrt_price_limit_x96: u128,
    min_out: i128,
) -> Result<u128, VaultError> {
    let amount_in = positive(amount_in)?;
    let min_out = non_negative(min_out)?;
    access::require_mint_started(env)?;
    let config = storage::get_config(env)?;
    require_passive(env, &config, zero_for_one, amount_in)?;

    let limit = match sqrt_price_limit_x96 {
        0 if zero_for_one => MIN_SQRT_RATIO + 1,
        0 => MAX_SQRT_RATIO - 1,
        limit => limit,
    };

    let amount_out = pool::swap(env, &config, zero_for_one, amount_in, limit)?;
    if amount_out < min_out {
        return Err(VaultError::SlippageExceeded);
    }

    events::swapped(env, zero_for_one, amount_in, amount_out);
    Ok(amount_out)
}

/// Trade `amount_in` of passive balance through an arbitrary venue call.
/// The venue may pull at most `amount_in` and must send the output to the
/// vault. Returns `(spent, received)`.
pub fn rebalance(
    env: &Env,
    venue: &Address,
    venue_fn: &Symbol,
    venue_args: Vec<Val>,
    zero_for_one: bool,
    amount_in: i128,
) -> Result<(u128, u128), VaultError> {
    let now = env.ledger().timestamp();
    if let Some(last) = storage::get_last_rebalance(env) {
        if now < last.saturating_add(storage::get_min_rebalance_interval(env)) {
            return Err(VaultError::RebalanceCooldown);
        }
    }
    let amount_in = positive(amount_in)?;
    let config = storage::get_config(env)?;
    require_passive(env, &config, zero_for_one, amount_in)?;

    if config.rebalance_guard == RebalanceGuard::Allowlist && !is_venue_allowed(env, venue) {
        return Err(VaultError::VenueNotAllowed);
    }

    let vault = env.current_contract_address();
    let (token_in, token_out) = input_output(&config, zero_for_one);
    let client_in = token::Client::new(env, &token_in);
    let client_out = token::Client::new(env, &token_out);
    let before_in = client_in.balance(&vault);
    let before_out = client_out.balance(&vault);

    grant(env, &client_in, venue, amount_in)?;
    let result = env.try_invoke_contract::<Val, soroban_sdk::Error>(venue, venue_fn, venue_args);
    revoke(env, &client_in, venue, amount_in);

    if !matches!(result, Ok(Ok(_))) {
        log!(env, "venue call failed", venue.clone());
        return Err(VaultError::VenueCallFailed);
    }

    let received = client_out.balance(&vault) - before_out;
    if received <= 0 {
        return Err(VaultError::NoOutputReceived);
    }
    let received = received as u128;
    let spent = u128::try_from(before_in - client_in.balance(&vault)).unwrap_or(0);

    if let RebalanceGuard::OracleCheck(oracle) = &config.rebalance_guard {
        check_oracle_rate(env, &oracle.oracle, &token_in, spent, &token_out, received)?;
    }

    storage::set_last_rebalance(env, now);
    events::rebalanced(env, venue, zero_for_one, spent, received);
    Ok((spent, received))
}

fn latest_price(env: &Env, oracle: &Address, asset: &Address) -> Result<(u128, u32), VaultError> {
    let result = env.try_invoke_contract::<(i128, u32), soroban_sdk::Error>(
        oracle,
        &Symbol::new(env, "latest_price"),
        (asset.clone(),).into_val(env),
    );
    match result {
        Ok(Ok((price, decimals))) if price > 0 => Ok((price as u128, decimals)),
        _ => Err(VaultError::OracleUnavailable),
    }
}

fn pow10(exponent: u32) -> Result<u128, VaultError> {
    10u128
        .checked_pow(exponent)
        .ok_or(VaultError::ArithmeticOverflow)
}

/// Oracle value of `amount` of `asset`, expressed with `decimals` decimals
fn oracle_value(
    env: &Env,
    oracle: &Address,
    asset: &Address,
    amount: u128,
    decimals: u32,
) -> Result<u128, VaultError> {
    let (price, price_decimals) = latest_price(env, oracle, asset)?;
    let token_decimals = token::Client::new(env, asset).decimals();

    let value = mul_div_floor(env, amount, price, pow10(price_decimals)?)?;
    value
        .checked_mul(pow10(decimals.saturating_sub(token_decimals))?)
        .ok_or(VaultError::ArithmeticOverflow)
}

/// Reject trades whose realized rate strays more than
/// `ORACLE_DEVIATION_BPS` from the oracle in either direction
fn check_oracle_rate(
    env: &Env,
    oracle: &Address,
    token_in: &Address,
    spent: u128,
    token_out: &Address,
    received: u128,
) -> Result<(), VaultError> {
    let decimals = token::Client::new(env, token_in)
        .decimals()
        .max(token::Client::new(env, token_out).decimals());
    let value_in = oracle_value(env, oracle, token_in, spent, decimals)?;
    let value_out = oracle_value(env, oracle, token_out, received, decimals)?;

    let tolerance = mul_div_floor(
        env,
        value_in,
        ORACLE_DEVIATION_BPS as u128,
        BPS_DENOMINATOR as u128,
    )?;
    if value_out.abs_diff(value_in) > tolerance {
        log!(env, "oracle deviation", value_in, value_out);
        return Err(VaultError::PriceDeviation);
    }
    Ok(())
}

// === Venue allow-list ===

pub fn is_venue_allowed(env: &Env, venue: &Address) -> bool {
    storage::get_allowed_venues(env).contains(venue)
}

pub fn set_venue_allowed(env: &Env, venue: &Address, allowed: bool) -> Result<(), VaultError> {
    let mut venues = storage::get_allowed_venues(env);
    let position = venues.first_index_of(venue);

    match (allowed, position) {
        (true, None) => {
            if venues.len() >= MAX_ALLOWED_VENUES {
                return Err(VaultError::VenueListFull);
            }
            venues.push_back(venue.clone());
        }
        (false, Some(index)) => {
            venues.remove(index);
        }
        _ => return Ok(()),
    }

    storage::set_allowed_venues(env, &venues);
    events::venue_allowed(env, venue, allowed);
    Ok(())
}

pub fn set_min_rebalance_interval(env: &Env, seconds: u64) {
    storage::set_min_rebalance_interval(env, seconds);
}

