use crate::full_math::{div_u256, mul_div_ceil, mul_div_floor, to_u128};
use crate::MathError;
use soroban_sdk::{Env, U256};
use vault_types::Q96;

fn sorted(sqrt_ratio_a_x96: u128, sqrt_ratio_b_x96: u128) -> (u128, u128) {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    }
}

/// Token0 amount for a price move between two sqrt ratios
/// delta_x = L * (sqrt_pb - sqrt_pa) / (sqrt_pa * sqrt_pb)
pub fn amount0_delta(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, MathError> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sqrt_ratio_lower == 0 {
        return Err(MathError::InvalidPrice);
    }

    let upper = U256::from_u128(env, sqrt_ratio_upper);
    let product = U256::from_u128(env, liquidity)
        .mul(&U256::from_u128(env, sqrt_ratio_upper - sqrt_ratio_lower));

    // (L * diff) << 96 can exceed 256 bits, so divide by the upper ratio in
    // two parts: q << 96 is exact, only the remainder term is rounded.
    let quotient = product.div(&upper);
    let remainder = product.rem_euclid(&upper);
    let scaled = quotient
        .shl(96)
        .add(&div_u256(env, &remainder.shl(96), &upper, round_up));

    to_u128(&div_u256(
        env,
        &scaled,
        &U256::from_u128(env, sqrt_ratio_lower),
        round_up,
    ))
}

/// Token1 amount for a price move between two sqrt ratios
/// delta_y = L * (sqrt_pb - sqrt_pa)
pub fn amount1_delta(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, MathError> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let diff = sqrt_ratio_upper - sqrt_ratio_lower;

    if round_up {
        mul_div_ceil(env, liquidity, diff, Q96)
    } else {
        mul_div_floor(env, liquidity, diff, Q96)
    }
}

/// Token amounts held by `liquidity` over a range at the given price.
/// The price is clamped to the range; both amounts round down.
pub fn amounts_for_liquidity(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> Result<(u128, u128), MathError> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        let amount0 = amount0_delta(env, sqrt_ratio_lower, sqrt_ratio_upper, liquidity, false)?;
        Ok((amount0, 0))
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let amount0 = amount0_delta(env, sqrt_ratio_x96, sqrt_ratio_upper, liquidity, false)?;
        let amount1 = amount1_delta(env, sqrt_ratio_lower, sqrt_ratio_x96, liquidity, false)?;
        Ok((amount0, amount1))
    } else {
        let amount1 = amount1_delta(env, sqrt_ratio_lower, sqrt_ratio_upper, liquidity, false)?;
        Ok((0, amount1))
    }
}

/// Maximum liquidity that the given amounts can back at the given price.
/// Inside the range the scarcer token is the binding constraint.
pub fn liquidity_for_amounts(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
    amount1: u128,
) -> Result<u128, MathError> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        liquidity_for_amount0(env, sqrt_ratio_lower, sqrt_ratio_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let liquidity0 = liquidity_for_amount0(env, sqrt_ratio_x96, sqrt_ratio_upper, amount0)?;
        let liquidity1 = liquidity_for_amount1(env, sqrt_ratio_lower, sqrt_ratio_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        liquidity_for_amount1(env, sqrt_ratio_lower, sqrt_ratio_upper, amount1)
    }
}

/// amount0 * (sqrt_pa * sqrt_pb / Q96) / (sqrt_pb - sqrt_pa)
fn liquidity_for_amount0(
    env: &Env,
    sqrt_ratio_lower: u128,
    sqrt_ratio_upper: u128,
    amount0: u128,
) -> Result<u128, MathError> {
    if sqrt_ratio_upper == sqrt_ratio_lower {
        return Err(MathError::DivisionByZero);
    }
    if amount0 == 0 {
        return Ok(0);
    }

    let intermediate = U256::from_u128(env, sqrt_ratio_lower)
        .mul(&U256::from_u128(env, sqrt_ratio_upper))
        .shr(96);
    let diff = U256::from_u128(env, sqrt_ratio_upper - sqrt_ratio_lower);
    let amount0 = U256::from_u128(env, amount0);

    // intermediate may exceed u128, split it as q * diff + r
    let quotient = to_u128(&intermediate.div(&diff))?;
    let remainder = intermediate.rem_euclid(&diff);

    let whole = to_u128(&amount0.mul(&U256::from_u128(env, quotient)))?;
    let part = to_u128(&amount0.mul(&remainder).div(&diff))?;
    whole.checked_add(part).ok_or(MathError::Overflow)
}

/// amount1 * Q96 / (sqrt_pb - sqrt_pa)
fn liquidity_for_amount1(
    env: &Env,
    sqrt_ratio_lower: u128,
    sqrt_ratio_upper: u128,
    amount1: u128,
) -> Result<u128, MathError> {
    mul_div_floor(env, amount1, Q96, sqrt_ratio_upper - sqrt_ratio_lower)
}
