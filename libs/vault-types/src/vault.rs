use soroban_sdk::{contracttype, Address, String};

/// Tick range of the vault's pool position
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TickRange {
    pub lower: i32,
    pub upper: i32,
}

/// An (amount0, amount1) pair in token units
#[contracttype]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TokenPair {
    pub amount0: u128,
    pub amount1: u128,
}

impl TokenPair {
    pub fn new(amount0: u128, amount1: u128) -> Self {
        Self { amount0, amount1 }
    }

    pub fn is_zero(&self) -> bool {
        self.amount0 == 0 && self.amount1 == 0
    }
}

/// Fee rates in basis points
#[contracttype]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FeeRates {
    /// Charged on gross burn payouts, paid to the manager
    pub managing_bps: u32,
    /// Charged on realized pool fees, paid to the manager
    pub performance_bps: u32,
    /// Charged on realized pool fees, paid to the secondary recipient
    pub other_bps: u32,
}

/// Secondary fee recipient. `claimer` may trigger collection, `recipient`
/// receives the funds.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OtherFeeConfig {
    pub recipient: Address,
    pub claimer: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleConfig {
    /// Contract exposing `latest_price(asset) -> (i128, u32)`
    pub oracle: Address,
}

/// Post-trade guard applied to venue rebalances
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RebalanceGuard {
    /// Venue must be on the manager-maintained allow-list
    Allowlist,
    /// Realized rate must stay within the oracle tolerance band
    OracleCheck(OracleConfig),
}

/// Vault creation parameters
#[contracttype]
#[derive(Clone, Debug)]
pub struct InitParams {
    pub pool: Address,
    pub owner: Address,
    pub manager: Address,
    pub name: String,
    pub symbol: String,
    pub managing_fee_bps: u32,
    pub performance_fee_bps: u32,
    pub other_fee: Option<OtherFeeConfig>,
    pub other_fee_bps: u32,
    pub rebalance_guard: RebalanceGuard,
    pub min_rebalance_interval: u64,
}

/// Immutable vault configuration, fixed at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    pub pool: Address,
    /// Lower-ordered pool token
    pub token0: Address,
    /// Higher-ordered pool token
    pub token1: Address,
    pub tick_spacing: i32,
    pub name: String,
    pub symbol: String,
    pub other_fee: Option<OtherFeeConfig>,
    pub rebalance_guard: RebalanceGuard,
}

/// Amounts a pool call may pull from the vault while a settlement is open
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementTicket {
    pub pool: Address,
    pub max0: u128,
    pub max1: u128,
}

/// Re-entrancy and settlement state
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OperationState {
    Idle,
    InFlight,
    AwaitingSettlement(SettlementTicket),
}

/// Share allowance with expiration ledger
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}
