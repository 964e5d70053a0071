//! Share pricing, fee netting and the pool-facing deposit/withdraw paths.
//!
//! Rounding always favors the vault: amounts owed to the vault or its
//! existing holders round up, amounts paid out round down.

use crate::error::{non_negative, positive, to_i128, VaultError};
use crate::{access, events, notional, pool, shares, storage};
use soroban_sdk::{token, Address, Env};
use vault_math::{
    amounts_for_liquidity, fee_growth_inside, fees_earned, liquidity_for_amounts, mul_div_ceil,
    mul_div_floor, sqrt_ratio_at_tick,
};
use vault_types::{
    FeeRates, PoolState, PositionInfo, TickRange, TokenPair, VaultConfig, BPS_DENOMINATOR,
    MAX_MANAGING_FEE_BPS, MAX_OTHER_FEE_BPS, MAX_PERFORMANCE_FEE_BPS,
};

/// Principal and fees realized by pulling liquidity out of the pool
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Withdrawal {
    pub burned0: u128,
    pub burned1: u128,
    pub fee0: u128,
    pub fee1: u128,
}

/// Value of the vault's position at the current pool price
#[derive(Clone, Copy, Debug, Default)]
struct PositionValue {
    principal0: u128,
    principal1: u128,
    fee0: u128,
    fee1: u128,
}

pub fn sqrt_ratios(env: &Env, range: &TickRange) -> Result<(u128, u128), VaultError> {
    Ok((
        sqrt_ratio_at_tick(env, range.lower)?,
        sqrt_ratio_at_tick(env, range.upper)?,
    ))
}

fn token_balance(env: &Env, token: &Address) -> u128 {
    let balance = token::Client::new(env, token).balance(&env.current_contract_address());
    u128::try_from(balance).unwrap_or(0)
}

/// Idle token balances not earmarked for the manager or the secondary
/// recipient, floored at zero
pub fn passive_balances(env: &Env, config: &VaultConfig) -> (u128, u128) {
    let manager = storage::get_manager_accrued(env);
    let other = storage::get_other_accrued(env);
    (
        token_balance(env, &config.token0)
            .saturating_sub(manager.amount0.saturating_add(other.amount0)),
        token_balance(env, &config.token1)
            .saturating_sub(manager.amount1.saturating_add(other.amount1)),
    )
}

fn checked_add(a: u128, b: u128) -> Result<u128, VaultError> {
    a.checked_add(b).ok_or(VaultError::ArithmeticOverflow)
}

// === Fee netting ===

/// Performance and secondary cuts of a realized fee amount. Both round up;
/// the secondary cut is capped so the two never exceed `fee`.
pub fn fee_split(env: &Env, fee: u128, rates: &FeeRates) -> Result<(u128, u128), VaultError> {
    let bps = BPS_DENOMINATOR as u128;
    let performance = mul_div_ceil(env, fee, rates.performance_bps as u128, bps)?.min(fee);
    let other = mul_div_ceil(env, fee, rates.other_bps as u128, bps)?.min(fee - performance);
    Ok((performance, other))
}

fn net_of_skim(env: &Env, fee: u128, rates: &FeeRates) -> Result<u128, VaultError> {
    let (performance, other) = fee_split(env, fee, rates)?;
    Ok(fee - performance - other)
}

/// Book the performance and secondary cuts of realized pool fees
pub fn apply_fees(env: &Env, fee0: u128, fee1: u128) -> Result<(), VaultError> {
    if fee0 == 0 && fee1 == 0 {
        return Ok(());
    }
    let rates = storage::get_fees(env);
    let (performance0, other0) = fee_split(env, fee0, &rates)?;
    let (performance1, other1) = fee_split(env, fee1, &rates)?;

    let mut manager = storage::get_manager_accrued(env);
    manager.amount0 = checked_add(manager.amount0, performance0)?;
    manager.amount1 = checked_add(manager.amount1, performance1)?;
    storage::set_manager_accrued(env, &manager);

    if other0 > 0 || other1 > 0 {
        let mut other = storage::get_other_accrued(env);
        other.amount0 = checked_add(other.amount0, other0)?;
        other.amount1 = checked_add(other.amount1, other1)?;
        storage::set_other_accrued(env, &other);
    }

    events::fees_earned(
        env,
        fee0,
        fee1,
        (performance0, performance1),
        (other0, other1),
    );
    Ok(())
}

/// Fees owed to the position that the pool has not paid out: amounts already
/// credited plus growth inside the range since the last checkpoint
fn uncollected_fees(
    env: &Env,
    config: &VaultConfig,
    range: &TickRange,
    state: &PoolState,
    position: &PositionInfo,
) -> Result<(u128, u128), VaultError> {
    let lower = pool::get_tick(env, &config.pool, range.lower);
    let upper = pool::get_tick(env, &config.pool, range.upper);

    let inside0 = fee_growth_inside(
        range.lower,
        range.upper,
        state.tick,
        state.fee_growth_global_0_x128,
        lower.fee_growth_outside_0_x128,
        upper.fee_growth_outside_0_x128,
    );
    let inside1 = fee_growth_inside(
        range.lower,
        range.upper,
        state.tick,
        state.fee_growth_global_1_x128,
        lower.fee_growth_outside_1_x128,
        upper.fee_growth_outside_1_x128,
    );

    Ok((
        checked_add(
            fees_earned(
                env,
                inside0,
                position.fee_growth_inside_0_last_x128,
                position.liquidity,
            )?,
            position.tokens_owed_0,
        )?,
        checked_add(
            fees_earned(
                env,
                inside1,
                position.fee_growth_inside_1_last_x128,
                position.liquidity,
            )?,
            position.tokens_owed_1,
        )?,
    ))
}

fn position_value(
    env: &Env,
    config: &VaultConfig,
    range: &TickRange,
) -> Result<PositionValue, VaultError> {
    let state = pool::get_state(env, &config.pool);
    let position = pool::get_position(env, &config.pool, range);
    let (sqrt_lower, sqrt_upper) = sqrt_ratios(env, range)?;

    let (principal0, principal1) = amounts_for_liquidity(
        env,
        state.sqrt_price_x96,
        sqrt_lower,
        sqrt_upper,
        position.liquidity,
    )?;
    let (fee0, fee1) = uncollected_fees(env, config, range, &state, &position)?;

    Ok(PositionValue {
        principal0,
        principal1,
        fee0,
        fee1,
    })
}

// === Views ===

/// Total value attributable to share holders: position principal, net
/// uncollected fees and passive balances
pub fn get_underlying_balances(env: &Env) -> Result<(u128, u128), VaultError> {
    let config = storage::get_config(env)?;
    let (mut amount0, mut amount1) = passive_balances(env, &config);

    if storage::in_position(env) {
        let range = storage::get_active_range(env)?;
        let value = position_value(env, &config, &range)?;
        let rates = storage::get_fees(env);

        amount0 = checked_add(amount0, value.principal0)?;
        amount0 = checked_add(amount0, net_of_skim(env, value.fee0, &rates)?)?;
        amount1 = checked_add(amount1, value.principal1)?;
        amount1 = checked_add(amount1, net_of_skim(env, value.fee1, &rates)?)?;
    }

    Ok((amount0, amount1))
}

/// Uncollected pool fees net of the performance and secondary cuts
pub fn get_current_fees(env: &Env) -> Result<(u128, u128), VaultError> {
    if !storage::in_position(env) {
        return Ok((0, 0));
    }
    let config = storage::get_config(env)?;
    let range = storage::get_active_range(env)?;
    let value = position_value(env, &config, &range)?;
    let rates = storage::get_fees(env);

    Ok((
        net_of_skim(env, value.fee0, &rates)?,
        net_of_skim(env, value.fee1, &rates)?,
    ))
}

/// Token amounts required to mint `shares`
fn mint_amounts(
    env: &Env,
    config: &VaultConfig,
    shares: u128,
    supply: u128,
) -> Result<(u128, u128), VaultError> {
    if supply > 0 {
        let (underlying0, underlying1) = get_underlying_balances(env)?;
        return Ok((
            mul_div_ceil(env, underlying0, shares, supply)?,
            mul_div_ceil(env, underlying1, shares, supply)?,
        ));
    }

    // First mint: one share per unit of liquidity at the seeded range
    if !storage::in_position(env) {
        return Err(VaultError::NoMintBasis);
    }
    let range = storage::get_active_range(env)?;
    let state = pool::get_state(env, &config.pool);
    let (sqrt_lower, sqrt_upper) = sqrt_ratios(env, &range)?;
    Ok(amounts_for_liquidity(
        env,
        state.sqrt_price_x96,
        sqrt_lower,
        sqrt_upper,
        shares,
    )?)
}

/// Largest mint the given maxima allow: (amount0, amount1, shares)
pub fn get_mint_amounts(
    env: &Env,
    max0: i128,
    max1: i128,
) -> Result<(u128, u128, u128), VaultError> {
    let max0 = non_negative(max0)?;
    let max1 = non_negative(max1)?;
    access::require_mint_started(env)?;
    let config = storage::get_config(env)?;
    let supply = shares::total_supply(env);

    let shares = if supply > 0 {
        let (underlying0, underlying1) = get_underlying_balances(env)?;
        let by_token0 = match underlying0 {
            0 => None,
            _ => Some(mul_div_floor(env, max0, supply, underlying0)?),
        };
        let by_token1 = match underlying1 {
            0 => None,
            _ => Some(mul_div_floor(env, max1, supply, underlying1)?),
        };
        match (by_token0, by_token1) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => return Err(VaultError::NoMintBasis),
        }
    } else if storage::in_position(env) {
        let range = storage::get_active_range(env)?;
        let state = pool::get_state(env, &config.pool);
        let (sqrt_lower, sqrt_upper) = sqrt_ratios(env, &range)?;
        liquidity_for_amounts(
            env,
            state.sqrt_price_x96,
            sqrt_lower,
            sqrt_upper,
            max0,
            max1,
        )?
    } else {
        return Err(VaultError::NoMintBasis);
    };

    if shares == 0 {
        return Ok((0, 0, 0));
    }
    let (amount0, amount1) = mint_amounts(env, &config, shares, supply)?;
    Ok((amount0, amount1, shares))
}

// === Pool deposit / withdraw ===

/// Burn `liquidity` from the position and collect everything it is owed.
/// Whatever exceeds the burned principal is realized fees.
pub fn withdraw(
    env: &Env,
    config: &VaultConfig,
    range: &TickRange,
    liquidity: u128,
) -> Result<Withdrawal, VaultError> {
    let (burned0, burned1) = pool::burn(env, &config.pool, range, liquidity);
    let (collected0, collected1) = pool::collect_all(env, config, range)?;

    Ok(Withdrawal {
        burned0,
        burned1,
        fee0: collected0
            .checked_sub(burned0)
            .ok_or(VaultError::SettlementMismatch)?,
        fee1: collected1
            .checked_sub(burned1)
            .ok_or(VaultError::SettlementMismatch)?,
    })
}

fn transfer_in(env: &Env, token: &Address, from: &Address, amount: u128) -> Result<(), VaultError> {
    if amount > 0 {
        token::Client::new(env, token).transfer(
            from,
            &env.current_contract_address(),
            &to_i128(amount)?,
        );
    }
    Ok(())
}

pub fn transfer_out(env: &Env, token: &Address, to: &Address, amount: u128) -> Result<(), VaultError> {
    if amount > 0 {
        token::Client::new(env, token).transfer(
            &env.current_contract_address(),
            to,
            &to_i128(amount)?,
        );
    }
    Ok(())
}

// === Mint / burn ===

pub fn mint(
    env: &Env,
    to: &Address,
    shares: i128,
    max0: i128,
    max1: i128,
) -> Result<(u128, u128), VaultError> {
    let shares = positive(shares)?;
    let max0 = non_negative(max0)?;
    let max1 = non_negative(max1)?;
    access::require_not_paused(env)?;
    access::require_mint_started(env)?;

    let config = storage::get_config(env)?;
    let supply = shares::total_supply(env);
    let (amount0, amount1) = mint_amounts(env, &config, shares, supply)?;

    if amount0 == 0 && amount1 == 0 {
        return Err(VaultError::NoMintBasis);
    }
    if amount0 > max0 || amount1 > max1 {
        return Err(VaultError::SlippageExceeded);
    }

    transfer_in(env, &config.token0, to, amount0)?;
    transfer_in(env, &config.token1, to, amount1)?;
    notional::add(env, to, amount0, amount1)?;
    shares::mint(env, to, shares)?;

    if storage::in_position(env) {
        let range = storage::get_active_range(env)?;
        let state = pool::get_state(env, &config.pool);
        let (sqrt_lower, sqrt_upper) = sqrt_ratios(env, &range)?;
        let liquidity = liquidity_for_amounts(
            env,
            state.sqrt_price_x96,
            sqrt_lower,
            sqrt_upper,
            amount0,
            amount1,
        )?;
        // Whatever the pool does not take stays passive
        if liquidity > 0 {
            pool::mint(env, &config, &range, liquidity, amount0, amount1)?;
        }
    }

    events::minted(env, to, shares, amount0, amount1);
    Ok((amount0, amount1))
}

pub fn burn(
    env: &Env,
    from: &Address,
    shares: i128,
    min0: i128,
    min1: i128,
) -> Result<(u128, u128), VaultError> {
    let shares = positive(shares)?;
    let min0 = non_negative(min0)?;
    let min1 = non_negative(min1)?;
    access::require_not_paused(env)?;
    access::require_mint_started(env)?;

    let config = storage::get_config(env)?;
    let balance_before = shares::balance(env, from);
    if balance_before < shares {
        return Err(VaultError::InsufficientShares);
    }
    let supply = shares::total_supply(env);
    shares::burn(env, from, shares)?;

    let (gross0, gross1) = if storage::in_position(env) {
        let range = storage::get_active_range(env)?;
        let position = pool::get_position(env, &config.pool, &range);
        let liquidity = mul_div_floor(env, shares, position.liquidity, supply)?;

        let withdrawal = if liquidity > 0 {
            withdraw(env, &config, &range, liquidity)?
        } else {
            Withdrawal::default()
        };
        apply_fees(env, withdrawal.fee0, withdrawal.fee1)?;

        let (passive0, passive1) = passive_balances(env, &config);
        (
            checked_add(
                withdrawal.burned0,
                mul_div_floor(
                    env,
                    passive0.saturating_sub(withdrawal.burned0),
                    shares,
                    supply,
                )?,
            )?,
            checked_add(
                withdrawal.burned1,
                mul_div_floor(
                    env,
                    passive1.saturating_sub(withdrawal.burned1),
                    shares,
                    supply,
                )?,
            )?,
        )
    } else {
        let (underlying0, underlying1) = get_underlying_balances(env)?;
        (
            mul_div_floor(env, underlying0, shares, supply)?,
            mul_div_floor(env, underlying1, shares, supply)?,
        )
    };

    if gross0 < min0 || gross1 < min1 {
        return Err(VaultError::SlippageExceeded);
    }

    let rates = storage::get_fees(env);
    let bps = BPS_DENOMINATOR as u128;
    let managing0 = mul_div_ceil(env, gross0, rates.managing_bps as u128, bps)?;
    let managing1 = mul_div_ceil(env, gross1, rates.managing_bps as u128, bps)?;
    if managing0 > 0 || managing1 > 0 {
        let mut manager = storage::get_manager_accrued(env);
        manager.amount0 = checked_add(manager.amount0, managing0)?;
        manager.amount1 = checked_add(manager.amount1, managing1)?;
        storage::set_manager_accrued(env, &manager);
    }

    let net0 = gross0 - managing0;
    let net1 = gross1 - managing1;
    transfer_out(env, &config.token0, from, net0)?;
    transfer_out(env, &config.token1, from, net1)?;
    notional::reduce(env, from, shares, balance_before)?;

    events::burned(env, from, shares, net0, net1);
    Ok((net0, net1))
}

// === Manager operations ===

/// Pull all liquidity out of the pool and leave the vault out of position.
/// The range collapses to `(upper, upper)`.
pub fn remove_liquidity(env: &Env, min0: i128, min1: i128) -> Result<(u128, u128), VaultError> {
    let min0 = non_negative(min0)?;
    let min1 = non_negative(min1)?;
    let config = storage::get_config(env)?;
    let range = storage::get_active_range(env)?;
    let position = pool::get_position(env, &config.pool, &range);

    let withdrawal = if position.liquidity > 0 {
        withdraw(env, &config, &range, position.liquidity)?
    } else {
        Withdrawal::default()
    };
    if withdrawal.burned0 < min0 || withdrawal.burned1 < min1 {
        return Err(VaultError::SlippageExceeded);
    }
    apply_fees(env, withdrawal.fee0, withdrawal.fee1)?;

    storage::set_in_position(env, false);
    storage::set_range(
        env,
        &TickRange {
            lower: range.upper,
            upper: range.upper,
        },
    );

    events::liquidity_removed(
        env,
        &range,
        position.liquidity,
        withdrawal.burned0,
        withdrawal.burned1,
    );
    Ok((withdrawal.burned0, withdrawal.burned1))
}

/// Deploy passive balances into a new range. Returns the unused part of
/// the maxima.
pub fn add_liquidity(
    env: &Env,
    range: TickRange,
    max0: i128,
    max1: i128,
    min0: i128,
    min1: i128,
) -> Result<(u128, u128), VaultError> {
    let max0 = non_negative(max0)?;
    let max1 = non_negative(max1)?;
    let min0 = non_negative(min0)?;
    let min1 = non_negative(min1)?;
    access::require_mint_started(env)?;
    if storage::in_position(env) {
        return Err(VaultError::AlreadyInPosition);
    }

    let config = storage::get_config(env)?;
    crate::range::validate(&range, config.tick_spacing)?;

    let (passive0, passive1) = passive_balances(env, &config);
    if max0 > passive0 || max1 > passive1 {
        return Err(VaultError::InsufficientPassiveBalance);
    }

    let state = pool::get_state(env, &config.pool);
    let (sqrt_lower, sqrt_upper) = sqrt_ratios(env, &range)?;
    let liquidity = liquidity_for_amounts(
        env,
        state.sqrt_price_x96,
        sqrt_lower,
        sqrt_upper,
        max0,
        max1,
    )?;
    if liquidity == 0 {
        return Err(VaultError::ZeroLiquidity);
    }

    let (used0, used1) = pool::mint(env, &config, &range, liquidity, max0, max1)?;
    if used0 < min0 || used1 < min1 || used0 > max0 || used1 > max1 {
        return Err(VaultError::SlippageExceeded);
    }

    storage::set_range(env, &range);
    storage::set_in_position(env, true);

    events::range_updated(env, &range);
    events::liquidity_added(env, &range, liquidity, used0, used1);
    Ok((max0 - used0, max1 - used1))
}

/// Change fee rates. Fees already earned in the pool are realized at the
/// old rates first.
pub fn update_fees(
    env: &Env,
    managing_bps: u32,
    performance_bps: u32,
    other_bps: u32,
) -> Result<(), VaultError> {
    if managing_bps > MAX_MANAGING_FEE_BPS
        || performance_bps > MAX_PERFORMANCE_FEE_BPS
        || other_bps > MAX_OTHER_FEE_BPS
    {
        return Err(VaultError::FeeTooHigh);
    }
    let config = storage::get_config(env)?;
    if other_bps > 0 && config.other_fee.is_none() {
        return Err(VaultError::OtherFeeDisabled);
    }

    if storage::in_position(env) {
        let range = storage::get_active_range(env)?;
        let position = pool::get_position(env, &config.pool, &range);
        if position.liquidity > 0 {
            let withdrawal = withdraw(env, &config, &range, 0)?;
            apply_fees(env, withdrawal.fee0, withdrawal.fee1)?;
        }
    }

    let fees = FeeRates {
        managing_bps,
        performance_bps,
        other_bps,
    };
    storage::set_fees(env, &fees);
    events::fees_updated(env, &fees);
    Ok(())
}

pub fn collect_manager(env: &Env, manager: &Address) -> Result<(u128, u128), VaultError> {
    let accrued = storage::get_manager_accrued(env);
    if accrued.is_zero() {
        return Ok((0, 0));
    }
    let config = storage::get_config(env)?;
    storage::set_manager_accrued(env, &TokenPair::default());

    transfer_out(env, &config.token0, manager, accrued.amount0)?;
    transfer_out(env, &config.token1, manager, accrued.amount1)?;
    events::manager_collected(env, manager, accrued.amount0, accrued.amount1);
    Ok((accrued.amount0, accrued.amount1))
}

pub fn collect_other_fee(env: &Env) -> Result<(u128, u128), VaultError> {
    let config = storage::get_config(env)?;
    let other_fee = config
        .other_fee
        .clone()
        .ok_or(VaultError::OtherFeeDisabled)?;
    other_fee.claimer.require_auth();

    let accrued = storage::get_other_accrued(env);
    if accrued.is_zero() {
        return Ok((0, 0));
    }
    storage::set_other_accrued(env, &TokenPair::default());

    transfer_out(env, &config.token0, &other_fee.recipient, accrued.amount0)?;
    transfer_out(env, &config.token1, &other_fee.recipient, accrued.amount1)?;
    events::other_collected(env, &other_fee.recipient, accrued.amount0, accrued.amount1);
    Ok((accrued.amount0, accrued.amount1))
}
