#![no_std]

mod pool;
mod position;
mod tick;
mod vault;

pub use pool::*;
pub use position::*;
pub use tick::*;
pub use vault::*;

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Bounded so sqrt prices fit in a u128
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
/// Bounded so sqrt prices fit in a u128
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (at MIN_TICK)
/// sqrt(1.0001^-443636) * 2^96
pub const MIN_SQRT_RATIO: u128 = 18447090764788882728;

/// Maximum sqrt price (at MAX_TICK)
/// sqrt(1.0001^443636) * 2^96, bounded by u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Widest range the vault will hold, in ticks
pub const MAX_RANGE_WIDTH: i32 = 200_000;

/// 1 bp = 1 / BPS_DENOMINATOR
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Managing fee cap (10% of withdrawn notional)
pub const MAX_MANAGING_FEE_BPS: u32 = 1_000;

/// Performance fee cap (50% of realized pool fees)
pub const MAX_PERFORMANCE_FEE_BPS: u32 = 5_000;

/// Secondary recipient fee cap (20% of realized pool fees)
pub const MAX_OTHER_FEE_BPS: u32 = 2_000;

/// Allowed deviation between a venue trade and oracle prices (1%)
pub const ORACLE_DEVIATION_BPS: u32 = 100;

/// Upper bound on the rebalance venue allow-list
pub const MAX_ALLOWED_VENUES: u32 = 16;

/// Page size cap for enumerating views
pub const MAX_PAGE_SIZE: u32 = 50;

/// Share token decimals
pub const SHARE_DECIMALS: u32 = 7;
