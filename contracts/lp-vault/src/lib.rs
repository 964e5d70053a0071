#![no_std]

//! Actively managed concentrated-liquidity vault.
//!
//! Holders deposit a token pair and receive fungible shares. A manager keeps
//! the pooled funds in a single pool position and may reposition, swap and
//! rebalance them; holders redeem shares for their pro-rata part of the
//! position, the passive balances and the uncollected fees.

mod access;
mod accounting;
mod error;
mod events;
mod notional;
mod pool;
mod range;
mod rebalance;
mod settlement;
mod shares;
mod storage;

#[cfg(test)]
mod test;

pub use error::VaultError;

use error::to_i128;
use settlement::guarded;
use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol, Val, Vec};
use vault_types::{
    FeeRates, InitParams, OperationState, PositionKey, RebalanceGuard, TickRange, TokenPair,
    VaultConfig, MAX_MANAGING_FEE_BPS, MAX_OTHER_FEE_BPS, MAX_PERFORMANCE_FEE_BPS,
    SHARE_DECIMALS,
};

#[contract]
pub struct LpVault;

fn pair(amount0: u128, amount1: u128) -> Result<(i128, i128), VaultError> {
    Ok((to_i128(amount0)?, to_i128(amount1)?))
}

#[contractimpl]
impl LpVault {
    /// Bind the vault to `params.pool`. Tokens and tick spacing are read
    /// from the pool and fixed for the life of the vault.
    pub fn initialize(env: Env, params: InitParams) -> Result<(), VaultError> {
        if storage::is_initialized(&env) {
            return Err(VaultError::AlreadyInitialized);
        }
        if params.managing_fee_bps > MAX_MANAGING_FEE_BPS
            || params.performance_fee_bps > MAX_PERFORMANCE_FEE_BPS
            || params.other_fee_bps > MAX_OTHER_FEE_BPS
        {
            return Err(VaultError::FeeTooHigh);
        }
        if params.other_fee.is_none() && params.other_fee_bps > 0 {
            return Err(VaultError::OtherFeeDisabled);
        }

        let token0 = pool::token0(&env, &params.pool);
        let token1 = pool::token1(&env, &params.pool);
        let tick_spacing = pool::tick_spacing(&env, &params.pool);
        if tick_spacing <= 0 {
            return Err(VaultError::InvalidRange);
        }

        storage::set_config(
            &env,
            &VaultConfig {
                pool: params.pool.clone(),
                token0,
                token1,
                tick_spacing,
                name: params.name,
                symbol: params.symbol,
                other_fee: params.other_fee,
                rebalance_guard: params.rebalance_guard,
            },
        );
        storage::set_owner(&env, &params.owner);
        storage::set_manager(&env, &params.manager);
        storage::set_fees(
            &env,
            &FeeRates {
                managing_bps: params.managing_fee_bps,
                performance_bps: params.performance_fee_bps,
                other_bps: params.other_fee_bps,
            },
        );
        storage::set_min_rebalance_interval(&env, params.min_rebalance_interval);
        storage::set_operation(&env, &OperationState::Idle);

        events::initialized(&env, &params.pool, &params.manager);
        Ok(())
    }

    // ========================================================================
    // Holder operations
    // ========================================================================

    /// Mint `shares` to `to`, paying at most `max0`/`max1`.
    /// Returns the amounts pulled from `to`.
    pub fn mint(
        env: Env,
        to: Address,
        shares: i128,
        max0: i128,
        max1: i128,
    ) -> Result<(i128, i128), VaultError> {
        to.require_auth();
        let (amount0, amount1) =
            guarded(&env, || accounting::mint(&env, &to, shares, max0, max1))?;
        pair(amount0, amount1)
    }

    /// Redeem `shares` held by `from`. Returns the net amounts paid out.
    pub fn burn(
        env: Env,
        from: Address,
        shares: i128,
        min0: i128,
        min1: i128,
    ) -> Result<(i128, i128), VaultError> {
        from.require_auth();
        let (amount0, amount1) =
            guarded(&env, || accounting::burn(&env, &from, shares, min0, min1))?;
        pair(amount0, amount1)
    }

    /// Largest mint the maxima allow: (amount0, amount1, shares)
    pub fn get_mint_amounts(
        env: Env,
        max0: i128,
        max1: i128,
    ) -> Result<(i128, i128, i128), VaultError> {
        let (amount0, amount1, shares) = accounting::get_mint_amounts(&env, max0, max1)?;
        Ok((to_i128(amount0)?, to_i128(amount1)?, to_i128(shares)?))
    }

    pub fn get_underlying_balances(env: Env) -> Result<(i128, i128), VaultError> {
        let (amount0, amount1) = accounting::get_underlying_balances(&env)?;
        pair(amount0, amount1)
    }

    /// Uncollected pool fees net of the manager and secondary cuts
    pub fn get_current_fees(env: Env) -> Result<(i128, i128), VaultError> {
        let (fee0, fee1) = accounting::get_current_fees(&env)?;
        pair(fee0, fee1)
    }

    // ========================================================================
    // Manager operations
    // ========================================================================

    /// Seed the range of an empty vault
    pub fn update_range(env: Env, lower: i32, upper: i32) -> Result<(), VaultError> {
        access::require_manager(&env)?;
        range::update_range(&env, TickRange { lower, upper })
    }

    /// Withdraw the whole position. Returns the burned principal.
    pub fn remove_liquidity(env: Env, min0: i128, min1: i128) -> Result<(i128, i128), VaultError> {
        access::require_manager(&env)?;
        let (amount0, amount1) =
            guarded(&env, || accounting::remove_liquidity(&env, min0, min1))?;
        pair(amount0, amount1)
    }

    /// Deploy passive balances at a new range. Returns the unused amounts.
    pub fn add_liquidity(
        env: Env,
        lower: i32,
        upper: i32,
        max0: i128,
        max1: i128,
        min0: i128,
        min1: i128,
    ) -> Result<(i128, i128), VaultError> {
        access::require_manager(&env)?;
        let (leftover0, leftover1) = guarded(&env, || {
            accounting::add_liquidity(&env, TickRange { lower, upper }, max0, max1, min0, min1)
        })?;
        pair(leftover0, leftover1)
    }

    pub fn update_fees(
        env: Env,
        managing_bps: u32,
        performance_bps: u32,
        other_bps: u32,
    ) -> Result<(), VaultError> {
        access::require_manager(&env)?;
        guarded(&env, || {
            accounting::update_fees(&env, managing_bps, performance_bps, other_bps)
        })
    }

    /// Exact-input pool swap of passive balance. Returns the amount received.
    pub fn swap(
        env: Env,
        zero_for_one: bool,
        amount_in: i128,
        sqrt_price_limit_x96: u128,
        min_out: i128,
    ) -> Result<i128, VaultError> {
        access::require_manager(&env)?;
        let amount_out = guarded(&env, || {
            rebalance::swap(&env, zero_for_one, amount_in, sqrt_price_limit_x96, min_out)
        })?;
        to_i128(amount_out)
    }

    /// Trade passive balance through `venue.venue_fn(venue_args)`.
    /// Returns (spent, received).
    pub fn rebalance(
        env: Env,
        venue: Address,
        venue_fn: Symbol,
        venue_args: Vec<Val>,
        zero_for_one: bool,
        amount_in: i128,
    ) -> Result<(i128, i128), VaultError> {
        access::require_manager(&env)?;
        let (spent, received) = guarded(&env, || {
            rebalance::rebalance(&env, &venue, &venue_fn, venue_args, zero_for_one, amount_in)
        })?;
        pair(spent, received)
    }

    pub fn collect_manager(env: Env) -> Result<(i128, i128), VaultError> {
        let manager = access::require_manager(&env)?;
        let (amount0, amount1) = guarded(&env, || accounting::collect_manager(&env, &manager))?;
        pair(amount0, amount1)
    }

    /// Pay accrued secondary fees to their recipient (claimer only)
    pub fn collect_other_fee(env: Env) -> Result<(i128, i128), VaultError> {
        let (amount0, amount1) = guarded(&env, || accounting::collect_other_fee(&env))?;
        pair(amount0, amount1)
    }

    pub fn set_venue_allowed(env: Env, venue: Address, allowed: bool) -> Result<(), VaultError> {
        access::require_manager(&env)?;
        rebalance::set_venue_allowed(&env, &venue, allowed)
    }

    pub fn set_min_rebalance_interval(env: Env, seconds: u64) -> Result<(), VaultError> {
        access::require_manager(&env)?;
        rebalance::set_min_rebalance_interval(&env, seconds);
        Ok(())
    }

    // ========================================================================
    // Owner operations
    // ========================================================================

    pub fn set_manager(env: Env, manager: Address) -> Result<(), VaultError> {
        access::require_owner(&env)?;
        storage::set_manager(&env, &manager);
        events::manager_set(&env, &manager);
        Ok(())
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), VaultError> {
        access::require_owner(&env)?;
        storage::set_owner(&env, &new_owner);
        events::owner_set(&env, &new_owner);
        Ok(())
    }

    /// Pause or resume mint and burn
    pub fn set_paused(env: Env, paused: bool) -> Result<(), VaultError> {
        access::require_owner(&env)?;
        storage::set_paused(&env, paused);
        events::paused(&env, paused);
        Ok(())
    }

    // ========================================================================
    // Share token
    // ========================================================================

    pub fn name(env: Env) -> Result<String, VaultError> {
        Ok(storage::get_config(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, VaultError> {
        Ok(storage::get_config(&env)?.symbol)
    }

    pub fn decimals(_env: Env) -> u32 {
        SHARE_DECIMALS
    }

    pub fn total_supply(env: Env) -> Result<i128, VaultError> {
        to_i128(shares::total_supply(&env))
    }

    pub fn balance(env: Env, id: Address) -> Result<i128, VaultError> {
        to_i128(shares::balance(&env, &id))
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), VaultError> {
        from.require_auth();
        shares::transfer(&env, &from, &to, amount)
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), VaultError> {
        from.require_auth();
        shares::approve(&env, &from, &spender, amount, expiration_ledger)
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        shares::allowance(&env, &from, &spender)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), VaultError> {
        spender.require_auth();
        shares::transfer_from(&env, &spender, &from, &to, amount)
    }

    // ========================================================================
    // Views
    // ========================================================================

    pub fn get_config(env: Env) -> Result<VaultConfig, VaultError> {
        storage::get_config(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, VaultError> {
        storage::get_owner(&env)
    }

    pub fn get_manager(env: Env) -> Result<Address, VaultError> {
        storage::get_manager(&env)
    }

    /// Last range set. After `remove_liquidity` this is `(upper, upper)`.
    pub fn get_range(env: Env) -> Option<TickRange> {
        storage::get_range(&env)
    }

    pub fn in_position(env: Env) -> bool {
        storage::in_position(&env)
    }

    pub fn mint_started(env: Env) -> bool {
        storage::mint_started(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    pub fn get_fees(env: Env) -> FeeRates {
        storage::get_fees(&env)
    }

    pub fn manager_balances(env: Env) -> TokenPair {
        storage::get_manager_accrued(&env)
    }

    pub fn other_fee_balances(env: Env) -> TokenPair {
        storage::get_other_accrued(&env)
    }

    pub fn user_notional(env: Env, user: Address) -> TokenPair {
        notional::get(&env, &user)
    }

    pub fn known_user_count(env: Env) -> u32 {
        notional::known_user_count(&env)
    }

    /// Known users in first-seen order, at most 50 per page
    pub fn known_users(env: Env, start: u32, limit: u32) -> Vec<Address> {
        notional::known_users(&env, start, limit)
    }

    /// Pool position identity of the active range
    pub fn position_key(env: Env) -> Result<PositionKey, VaultError> {
        let range = storage::get_active_range(&env)?;
        Ok(pool::position_key(&env, &range))
    }

    pub fn last_rebalance(env: Env) -> Option<u64> {
        storage::get_last_rebalance(&env)
    }

    pub fn min_rebalance_interval(env: Env) -> u64 {
        storage::get_min_rebalance_interval(&env)
    }

    pub fn is_venue_allowed(env: Env, venue: Address) -> bool {
        rebalance::is_venue_allowed(&env, &venue)
    }

    pub fn rebalance_guard(env: Env) -> Result<RebalanceGuard, VaultError> {
        Ok(storage::get_config(&env)?.rebalance_guard)
    }

    pub fn operation_state(env: Env) -> OperationState {
        storage::get_operation(&env)
    }
}
