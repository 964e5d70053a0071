use crate::error::VaultError;
use crate::storage;
use soroban_sdk::{Address, Env};

/// Require the stored owner's authorization
pub fn require_owner(env: &Env) -> Result<Address, VaultError> {
    let owner = storage::get_owner(env)?;
    owner.require_auth();
    Ok(owner)
}

/// Require the stored manager's authorization
pub fn require_manager(env: &Env) -> Result<Address, VaultError> {
    let manager = storage::get_manager(env)?;
    manager.require_auth();
    Ok(manager)
}

pub fn require_not_paused(env: &Env) -> Result<(), VaultError> {
    if storage::is_paused(env) {
        return Err(VaultError::Paused);
    }
    Ok(())
}

pub fn require_mint_started(env: &Env) -> Result<(), VaultError> {
    if !storage::mint_started(env) {
        return Err(VaultError::MintNotStarted);
    }
    Ok(())
}
