use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MathError {
    DivisionByZero = 1,
    /// Result does not fit the target integer width
    Overflow = 2,
    TickOutOfBounds = 3,
    /// A sqrt price of zero was supplied
    InvalidPrice = 4,
}
