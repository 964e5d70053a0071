use crate::MathError;
use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns floor((a * b) / denominator)
pub fn mul_div_floor(env: &Env, a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    to_u128(&product.div(&U256::from_u128(env, denominator)))
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_ceil(env: &Env, a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }

    let denominator = U256::from_u128(env, denominator);
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    to_u128(&div_u256(env, &product, &denominator, true))
}

/// Divide two U256 values, optionally rounding up. `denominator` must be non-zero.
pub(crate) fn div_u256(env: &Env, numerator: &U256, denominator: &U256, round_up: bool) -> U256 {
    let quotient = numerator.div(denominator);
    if round_up && numerator.rem_euclid(denominator) > U256::from_u32(env, 0) {
        quotient.add(&U256::from_u32(env, 1))
    } else {
        quotient
    }
}

/// Narrow a U256 to u128
pub(crate) fn to_u128(value: &U256) -> Result<u128, MathError> {
    value.to_u128().ok_or(MathError::Overflow)
}
