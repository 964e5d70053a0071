#![no_std]

mod error;
pub mod fee_growth;
pub mod full_math;
pub mod liquidity_amounts;
pub mod tick_math;

pub use error::MathError;
pub use fee_growth::*;
pub use full_math::*;
pub use liquidity_amounts::*;
pub use tick_math::*;
