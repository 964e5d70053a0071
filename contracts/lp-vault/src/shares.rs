//! Vault share token: supply, balances and allowances.

use crate::error::{non_negative, VaultError};
use crate::{events, notional, storage};
use soroban_sdk::{Address, Env};
use vault_types::AllowanceValue;

pub fn total_supply(env: &Env) -> u128 {
    storage::get_total_supply(env)
}

pub fn balance(env: &Env, holder: &Address) -> u128 {
    storage::get_balance(env, holder)
}

/// Issue new shares to `to`
pub fn mint(env: &Env, to: &Address, amount: u128) -> Result<(), VaultError> {
    let supply = storage::get_total_supply(env)
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let balance = storage::get_balance(env, to)
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;

    storage::set_total_supply(env, supply);
    storage::set_balance(env, to, balance);
    notional::register(env, to);
    Ok(())
}

/// Destroy `amount` of `from`'s shares
pub fn burn(env: &Env, from: &Address, amount: u128) -> Result<(), VaultError> {
    let balance = storage::get_balance(env, from);
    if balance < amount {
        return Err(VaultError::InsufficientShares);
    }
    let supply = storage::get_total_supply(env);

    storage::set_balance(env, from, balance - amount);
    storage::set_total_supply(env, supply.saturating_sub(amount));
    Ok(())
}

/// Move shares between holders. Notional follows the shares.
pub fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), VaultError> {
    let amount = non_negative(amount)?;
    if amount == 0 || from == to {
        return Ok(());
    }

    let from_balance = storage::get_balance(env, from);
    if from_balance < amount {
        return Err(VaultError::InsufficientShares);
    }
    let to_balance = storage::get_balance(env, to)
        .checked_add(amount)
        .ok_or(VaultError::ArithmeticOverflow)?;

    notional::on_transfer(env, from, to, amount, from_balance)?;
    storage::set_balance(env, from, from_balance - amount);
    storage::set_balance(env, to, to_balance);

    events::transfer(env, from, to, amount);
    Ok(())
}

pub fn allowance(env: &Env, from: &Address, spender: &Address) -> i128 {
    match storage::get_allowance(env, from, spender) {
        Some(allowance) if allowance.expiration_ledger >= env.ledger().sequence() => {
            allowance.amount
        }
        _ => 0,
    }
}

pub fn approve(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) -> Result<(), VaultError> {
    non_negative(amount)?;
    if amount > 0 && expiration_ledger < env.ledger().sequence() {
        return Err(VaultError::InvalidAmount);
    }

    storage::set_allowance(
        env,
        from,
        spender,
        &AllowanceValue {
            amount,
            expiration_ledger,
        },
    );
    events::approve(env, from, spender, amount, expiration_ledger);
    Ok(())
}

/// Spend `spender`'s allowance over `from`'s shares
pub fn transfer_from(
    env: &Env,
    spender: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), VaultError> {
    non_negative(amount)?;
    let available = allowance(env, from, spender);
    if available < amount {
        return Err(VaultError::AllowanceExceeded);
    }

    if amount > 0 {
        let expiration_ledger = storage::get_allowance(env, from, spender)
            .map(|allowance| allowance.expiration_ledger)
            .unwrap_or(0);
        storage::set_allowance(
            env,
            from,
            spender,
            &AllowanceValue {
                amount: available - amount,
                expiration_ledger,
            },
        );
    }
    transfer(env, from, to, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::with_contract;
    use soroban_sdk::testutils::{Address as _, Ledger};

    #[test]
    fn test_mint_and_burn_track_supply() {
        let env = Env::default();
        with_contract(&env, || {
            let holder = Address::generate(&env);
            mint(&env, &holder, 1_000).unwrap();
            mint(&env, &holder, 500).unwrap();
            assert_eq!(total_supply(&env), 1_500);
            assert_eq!(balance(&env, &holder), 1_500);

            burn(&env, &holder, 1_500).unwrap();
            assert_eq!(total_supply(&env), 0);
            assert_eq!(balance(&env, &holder), 0);
        });
    }

    #[test]
    fn test_burn_more_than_balance() {
        let env = Env::default();
        with_contract(&env, || {
            let holder = Address::generate(&env);
            mint(&env, &holder, 10).unwrap();
            assert_eq!(burn(&env, &holder, 11), Err(VaultError::InsufficientShares));
        });
    }

    #[test]
    fn test_self_and_zero_transfers_are_noops() {
        let env = Env::default();
        with_contract(&env, || {
            let holder = Address::generate(&env);
            let other = Address::generate(&env);
            mint(&env, &holder, 10).unwrap();

            transfer(&env, &holder, &holder, 10).unwrap();
            transfer(&env, &holder, &other, 0).unwrap();
            assert_eq!(balance(&env, &holder), 10);
            assert_eq!(balance(&env, &other), 0);
            assert_eq!(transfer(&env, &holder, &other, -1), Err(VaultError::InvalidAmount));
        });
    }

    #[test]
    fn test_allowance_expires() {
        let env = Env::default();
        with_contract(&env, || {
            let from = Address::generate(&env);
            let spender = Address::generate(&env);
            let expiration = env.ledger().sequence() + 10;

            approve(&env, &from, &spender, 100, expiration).unwrap();
            assert_eq!(allowance(&env, &from, &spender), 100);

            env.ledger().with_mut(|li| li.sequence_number = expiration + 1);
            assert_eq!(allowance(&env, &from, &spender), 0);
        });
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let env = Env::default();
        with_contract(&env, || {
            let from = Address::generate(&env);
            let spender = Address::generate(&env);
            let to = Address::generate(&env);
            mint(&env, &from, 100).unwrap();
            approve(&env, &from, &spender, 60, env.ledger().sequence() + 100).unwrap();

            transfer_from(&env, &spender, &from, &to, 40).unwrap();
            assert_eq!(allowance(&env, &from, &spender), 20);
            assert_eq!(balance(&env, &to), 40);

            assert_eq!(
                transfer_from(&env, &spender, &from, &to, 21),
                Err(VaultError::AllowanceExceeded)
            );
        });
    }
}
