use soroban_sdk::contracttype;

/// Boundary tick data as reported by the pool's `get_tick`
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TickInfo {
    /// Total liquidity referencing this tick
    pub liquidity_gross: u128,
    /// Net liquidity change when tick is crossed (+ when moving right)
    pub liquidity_net: i128,
    /// Fee growth per unit liquidity on the other side of this tick (token0)
    pub fee_growth_outside_0_x128: u128,
    /// Fee growth per unit liquidity on the other side of this tick (token1)
    pub fee_growth_outside_1_x128: u128,
    /// True if tick has been initialized
    pub initialized: bool,
}
