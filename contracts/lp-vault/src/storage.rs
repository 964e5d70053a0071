use crate::error::VaultError;
use soroban_sdk::{contracttype, Address, Env, Vec};
use vault_types::{
    AllowanceValue, FeeRates, OperationState, TickRange, TokenPair, VaultConfig,
};

// ============================================================================
// SOROBAN RESOURCE LIMITS - Storage layout for the vault:
// ============================================================================
// - Instance storage holds the singleton vault state (config, range, fees,
//   accrued balances, supply, throttle). It is loaded with every invocation,
//   so it must stay small: the venue allow-list is capped at
//   MAX_ALLOWED_VENUES entries.
// - Share balances, notional records and the known-user index are
//   per-address persistent entries (count + indexed entries) instead of a
//   Vec, so the holder set can grow without bloating a single entry.
// - Allowances live in temporary storage and expire with their ledger.
// ============================================================================

/// Storage keys for the vault contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Vault configuration (Instance storage)
    Config,
    /// Owner address (Instance)
    Owner,
    /// Manager address (Instance)
    Manager,
    /// Pause flag gating mint and burn (Instance)
    Paused,
    /// Active tick range (Instance)
    Range,
    /// Position held at `Range` (Instance)
    InPosition,
    /// One-way latch set by the first range update (Instance)
    MintStarted,
    /// Fee rates (Instance)
    Fees,
    /// Fees owed to the manager (Instance)
    ManagerAccrued,
    /// Fees owed to the secondary recipient (Instance)
    OtherAccrued,
    /// Total share supply (Instance)
    TotalSupply,
    /// Timestamp of the last venue rebalance (Instance)
    LastRebalance,
    /// Minimum seconds between venue rebalances (Instance)
    MinRebalanceInterval,
    /// Venue allow-list (Instance, bounded)
    AllowedVenues,
    /// Re-entrancy and settlement state (Instance)
    Operation,
    /// Number of known users (Instance)
    KnownUserCount,
    /// Share balance per holder (Persistent)
    Balance(Address),
    /// Historical contribution per holder (Persistent)
    Notional(Address),
    /// Index -> known user (Persistent)
    KnownUserAt(u32),
    /// Known-user membership flag (Persistent)
    IsKnownUser(Address),
    /// Share allowance (Temporary)
    Allowance(Address, Address),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

fn get_instance<T>(env: &Env, key: &DataKey) -> Option<T>
where
    T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    extend_instance_ttl(env);
    env.storage().instance().get(key)
}

fn set_instance<T>(env: &Env, key: &DataKey, value: &T)
where
    T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().instance().set(key, value);
    extend_instance_ttl(env);
}

// === Config and roles ===

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<VaultConfig, VaultError> {
    get_instance(env, &DataKey::Config).ok_or(VaultError::NotInitialized)
}

pub fn set_config(env: &Env, config: &VaultConfig) {
    set_instance(env, &DataKey::Config, config);
}

pub fn get_owner(env: &Env) -> Result<Address, VaultError> {
    get_instance(env, &DataKey::Owner).ok_or(VaultError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    set_instance(env, &DataKey::Owner, owner);
}

pub fn get_manager(env: &Env) -> Result<Address, VaultError> {
    get_instance(env, &DataKey::Manager).ok_or(VaultError::NotInitialized)
}

pub fn set_manager(env: &Env, manager: &Address) {
    set_instance(env, &DataKey::Manager, manager);
}

pub fn is_paused(env: &Env) -> bool {
    get_instance(env, &DataKey::Paused).unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    set_instance(env, &DataKey::Paused, &paused);
}

// === Position state ===

pub fn get_range(env: &Env) -> Option<TickRange> {
    get_instance(env, &DataKey::Range)
}

pub fn set_range(env: &Env, range: &TickRange) {
    set_instance(env, &DataKey::Range, range);
}

pub fn in_position(env: &Env) -> bool {
    get_instance(env, &DataKey::InPosition).unwrap_or(false)
}

pub fn set_in_position(env: &Env, in_position: bool) {
    set_instance(env, &DataKey::InPosition, &in_position);
}

/// Active range, only while the vault holds a position
pub fn get_active_range(env: &Env) -> Result<TickRange, VaultError> {
    if !in_position(env) {
        return Err(VaultError::NotInPosition);
    }
    get_range(env).ok_or(VaultError::NotInPosition)
}

pub fn mint_started(env: &Env) -> bool {
    get_instance(env, &DataKey::MintStarted).unwrap_or(false)
}

pub fn set_mint_started(env: &Env) {
    set_instance(env, &DataKey::MintStarted, &true);
}

// === Fees ===

pub fn get_fees(env: &Env) -> FeeRates {
    get_instance(env, &DataKey::Fees).unwrap_or_default()
}

pub fn set_fees(env: &Env, fees: &FeeRates) {
    set_instance(env, &DataKey::Fees, fees);
}

pub fn get_manager_accrued(env: &Env) -> TokenPair {
    get_instance(env, &DataKey::ManagerAccrued).unwrap_or_default()
}

pub fn set_manager_accrued(env: &Env, accrued: &TokenPair) {
    set_instance(env, &DataKey::ManagerAccrued, accrued);
}

pub fn get_other_accrued(env: &Env) -> TokenPair {
    get_instance(env, &DataKey::OtherAccrued).unwrap_or_default()
}

pub fn set_other_accrued(env: &Env, accrued: &TokenPair) {
    set_instance(env, &DataKey::OtherAccrued, accrued);
}

// === Shares ===

pub fn get_total_supply(env: &Env) -> u128 {
    get_instance(env, &DataKey::TotalSupply).unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: u128) {
    set_instance(env, &DataKey::TotalSupply, &supply);
}

pub fn get_balance(env: &Env, holder: &Address) -> u128 {
    let key = DataKey::Balance(holder.clone());
    let balance = env.storage().persistent().get(&key);
    if balance.is_some() {
        extend_persistent_ttl(env, &key);
    }
    balance.unwrap_or(0)
}

pub fn set_balance(env: &Env, holder: &Address, balance: u128) {
    let key = DataKey::Balance(holder.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
        extend_persistent_ttl(env, &key);
    }
}

pub fn get_allowance(env: &Env, from: &Address, spender: &Address) -> Option<AllowanceValue> {
    env.storage()
        .temporary()
        .get(&DataKey::Allowance(from.clone(), spender.clone()))
}

pub fn set_allowance(env: &Env, from: &Address, spender: &Address, value: &AllowanceValue) {
    let key = DataKey::Allowance(from.clone(), spender.clone());
    if value.amount == 0 {
        env.storage().temporary().remove(&key);
        return;
    }
    env.storage().temporary().set(&key, value);
    let live_for = value
        .expiration_ledger
        .saturating_sub(env.ledger().sequence());
    if live_for > 0 {
        env.storage().temporary().extend_ttl(&key, live_for, live_for);
    }
}

// === Notional and known users ===

pub fn get_notional(env: &Env, user: &Address) -> TokenPair {
    let key = DataKey::Notional(user.clone());
    let notional = env.storage().persistent().get(&key);
    if notional.is_some() {
        extend_persistent_ttl(env, &key);
    }
    notional.unwrap_or_default()
}

pub fn set_notional(env: &Env, user: &Address, notional: &TokenPair) {
    let key = DataKey::Notional(user.clone());
    if notional.is_zero() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, notional);
        extend_persistent_ttl(env, &key);
    }
}

pub fn get_known_user_count(env: &Env) -> u32 {
    get_instance(env, &DataKey::KnownUserCount).unwrap_or(0)
}

pub fn is_known_user(env: &Env, user: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::IsKnownUser(user.clone()))
}

/// Append `user` to the known-user index
pub fn push_known_user(env: &Env, user: &Address) {
    let index = get_known_user_count(env);

    let at_key = DataKey::KnownUserAt(index);
    env.storage().persistent().set(&at_key, user);
    extend_persistent_ttl(env, &at_key);

    let flag_key = DataKey::IsKnownUser(user.clone());
    env.storage().persistent().set(&flag_key, &index);
    extend_persistent_ttl(env, &flag_key);

    set_instance(env, &DataKey::KnownUserCount, &(index + 1));
}

pub fn get_known_user_at(env: &Env, index: u32) -> Option<Address> {
    let key = DataKey::KnownUserAt(index);
    let user = env.storage().persistent().get(&key);
    if user.is_some() {
        extend_persistent_ttl(env, &key);
    }
    user
}

// === Rebalance throttle ===

pub fn get_last_rebalance(env: &Env) -> Option<u64> {
    get_instance(env, &DataKey::LastRebalance)
}

pub fn set_last_rebalance(env: &Env, timestamp: u64) {
    set_instance(env, &DataKey::LastRebalance, &timestamp);
}

pub fn get_min_rebalance_interval(env: &Env) -> u64 {
    get_instance(env, &DataKey::MinRebalanceInterval).unwrap_or(0)
}

pub fn set_min_rebalance_interval(env: &Env, interval: u64) {
    set_instance(env, &DataKey::MinRebalanceInterval, &interval);
}

pub fn get_allowed_venues(env: &Env) -> Vec<Address> {
    get_instance(env, &DataKey::AllowedVenues).unwrap_or_else(|| Vec::new(env))
}

pub fn set_allowed_venues(env: &Env, venues: &Vec<Address>) {
    set_instance(env, &DataKey::AllowedVenues, venues);
}

// === Operation state ===

pub fn get_operation(env: &Env) -> OperationState {
    get_instance(env, &DataKey::Operation).unwrap_or(OperationState::Idle)
}

pub fn set_operation(env: &Env, state: &OperationState) {
    set_instance(env, &DataKey::Operation, state);
}
