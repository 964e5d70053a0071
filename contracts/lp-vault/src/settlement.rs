//! Operation guard and pool settlement.
//!
//! Every mutating vault operation runs `Idle -> InFlight -> Idle`. A pool
//! call that must be paid opens a [`SettlementTicket`]
//! (`InFlight -> AwaitingSettlement`): the vault grants the configured pool an
//! allowance bounded by the ticket, the pool pulls what it is owed, and the
//! ticket is closed (`AwaitingSettlement -> InFlight`) only if the measured
//! balance deltas match what the pool reported and stay within the ticket.

use crate::error::{to_i128, VaultError};
use crate::storage;
use soroban_sdk::{log, token, Address, Env};
use vault_types::{OperationState, SettlementTicket, VaultConfig};

/// Run `op` as a top-level vault operation
pub fn guarded<T>(
    env: &Env,
    op: impl FnOnce() -> Result<T, VaultError>,
) -> Result<T, VaultError> {
    if storage::get_operation(env) != OperationState::Idle {
        return Err(VaultError::Reentrant);
    }
    storage::set_operation(env, &OperationState::InFlight);
    let result = op();
    storage::set_operation(env, &OperationState::Idle);
    result
}

/// Execute a pool call that may pull up to `max0`/`max1` from the vault.
///
/// `call` returns the deltas the pool reports from the vault's side
/// (positive = paid by the vault, negative = received). Returns the
/// measured deltas once they are verified against the ticket.
pub fn settle_with_pool(
    env: &Env,
    config: &VaultConfig,
    max0: u128,
    max1: u128,
    call: impl FnOnce() -> (i128, i128),
) -> Result<(i128, i128), VaultError> {
    if storage::get_operation(env) != OperationState::InFlight {
        return Err(VaultError::Reentrant);
    }
    let ticket = SettlementTicket {
        pool: config.pool.clone(),
        max0,
        max1,
    };
    storage::set_operation(env, &OperationState::AwaitingSettlement(ticket));

    let vault = env.current_contract_address();
    let token0 = token::Client::new(env, &config.token0);
    let token1 = token::Client::new(env, &config.token1);
    let before0 = token0.balance(&vault);
    let before1 = token1.balance(&vault);

    grant(env, &token0, &config.pool, max0)?;
    grant(env, &token1, &config.pool, max1)?;

    let (owed0, owed1) = call();

    revoke(env, &token0, &config.pool, max0);
    revoke(env, &token1, &config.pool, max1);

    let paid0 = before0 - token0.balance(&vault);
    let paid1 = before1 - token1.balance(&vault);
    close(env, &config.pool, (paid0, paid1), (owed0, owed1))?;

    log!(env, "pool settled", paid0, paid1);
    Ok((paid0, paid1))
}

fn close(
    env: &Env,
    pool: &Address,
    paid: (i128, i128),
    owed: (i128, i128),
) -> Result<(), VaultError> {
    let OperationState::AwaitingSettlement(ticket) = storage::get_operation(env) else {
        return Err(VaultError::SettlementMismatch);
    };

    if ticket.pool != *pool
        || paid != owed
        || paid.0 > to_i128(ticket.max0)?
        || paid.1 > to_i128(ticket.max1)?
    {
        return Err(VaultError::SettlementMismatch);
    }

    storage::set_operation(env, &OperationState::InFlight);
    Ok(())
}

/// Allow `spender` to pull `amount` from the vault within this ledger
pub fn grant(
    env: &Env,
    token: &token::Client,
    spender: &Address,
    amount: u128,
) -> Result<(), VaultError> {
    if amount == 0 {
        return Ok(());
    }
    token.approve(
        &env.current_contract_address(),
        spender,
        &to_i128(amount)?,
        &env.ledger().sequence(),
    );
    Ok(())
}

/// Reset an allowance granted with [`grant`] back to zero
pub fn revoke(env: &Env, token: &token::Client, spender: &Address, granted: u128) {
    if granted == 0 {
        return;
    }
    token.approve(
        &env.current_contract_address(),
        spender,
        &0,
        &env.ledger().sequence(),
    );
}
