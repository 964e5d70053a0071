use crate::MathError;
use soroban_sdk::{Env, U256};

/// Fee growth per unit of liquidity inside [tick_lower, tick_upper).
///
/// Counters are Q128.128 accumulators that wrap at 2^128, so every
/// difference is taken modulo 2^128.
pub fn fee_growth_inside(
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_x128: u128,
    fee_growth_outside_lower_x128: u128,
    fee_growth_outside_upper_x128: u128,
) -> u128 {
    let fee_growth_below = if tick_current >= tick_lower {
        fee_growth_outside_lower_x128
    } else {
        fee_growth_global_x128.wrapping_sub(fee_growth_outside_lower_x128)
    };

    let fee_growth_above = if tick_current < tick_upper {
        fee_growth_outside_upper_x128
    } else {
        fee_growth_global_x128.wrapping_sub(fee_growth_outside_upper_x128)
    };

    fee_growth_global_x128
        .wrapping_sub(fee_growth_below)
        .wrapping_sub(fee_growth_above)
}

/// Fees earned by `liquidity` since the `fee_growth_inside_last_x128` checkpoint
/// floor(liquidity * (inside - last) / 2^128)
pub fn fees_earned(
    env: &Env,
    fee_growth_inside_x128: u128,
    fee_growth_inside_last_x128: u128,
    liquidity: u128,
) -> Result<u128, MathError> {
    let delta = fee_growth_inside_x128.wrapping_sub(fee_growth_inside_last_x128);
    if delta == 0 || liquidity == 0 {
        return Ok(0);
    }

    U256::from_u128(env, liquidity)
        .mul(&U256::from_u128(env, delta))
        .shr(128)
        .to_u128()
        .ok_or(MathError::Overflow)
}
