//! Position range validation and the initial range seed.
//!
//! A range is usable when it is ordered, inside the tick bounds, aligned to
//! the pool's tick spacing and no wider than `MAX_RANGE_WIDTH`. Only an empty
//! vault may seed one; later moves go through `remove_liquidity` and
//! `add_liquidity`.

use crate::error::VaultError;
use crate::{events, shares, storage};
use soroban_sdk::Env;
use vault_types::{TickRange, MAX_RANGE_WIDTH, MAX_TICK, MIN_TICK};

/// Check that `range` is a usable position range for a pool with
/// `tick_spacing`
pub fn validate(range: &TickRange, tick_spacing: i32) -> Result<(), VaultError> {
    if tick_spacing <= 0 {
        return Err(VaultError::InvalidRange);
    }
    if range.lower >= range.upper {
        return Err(VaultError::InvalidRange);
    }
    if range.lower < MIN_TICK || range.upper > MAX_TICK {
        return Err(VaultError::InvalidRange);
    }
    if range.lower % tick_spacing != 0 || range.upper % tick_spacing != 0 {
        return Err(VaultError::InvalidRange);
    }
    // i64 so extreme ticks cannot overflow the width
    if (range.upper as i64) - (range.lower as i64) > MAX_RANGE_WIDTH as i64 {
        return Err(VaultError::InvalidRange);
    }
    Ok(())
}

/// Seed the range of an empty vault. Enables minting from here on.
pub fn update_range(env: &Env, range: TickRange) -> Result<(), VaultError> {
    if shares::total_supply(env) > 0 || storage::in_position(env) {
        return Err(VaultError::RangeLocked);
    }
    let config = storage::get_config(env)?;
    validate(&range, config.tick_spacing)?;

    storage::set_range(env, &range);
    storage::set_in_position(env, true);
    storage::set_mint_started(env);

    events::range_updated(env, &range);
    Ok(())
}
