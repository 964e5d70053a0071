use soroban_sdk::{contracttype, Address};

/// Identity of a pool position. The pool keys positions by owner and range,
/// so only the owner can move the liquidity behind a key.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Position info as reported by the pool's `get_position`
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionInfo {
    /// Liquidity in this position
    pub liquidity: u128,
    /// Fee growth inside at last update (token0)
    pub fee_growth_inside_0_last_x128: u128,
    /// Fee growth inside at last update (token1)
    pub fee_growth_inside_1_last_x128: u128,
    /// Uncollected token0 (fees plus burned principal)
    pub tokens_owed_0: u128,
    /// Uncollected token1 (fees plus burned principal)
    pub tokens_owed_1: u128,
}
