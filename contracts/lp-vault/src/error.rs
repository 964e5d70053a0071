use soroban_sdk::contracterror;
use vault_math::MathError;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    // Input validation
    ZeroAmount = 1,
    InvalidAmount = 2,
    InvalidRange = 3,
    FeeTooHigh = 4,
    InsufficientShares = 5,
    InsufficientPassiveBalance = 6,
    ZeroLiquidity = 7,
    AllowanceExceeded = 8,
    VenueListFull = 9,
    OtherFeeDisabled = 10,

    // Slippage
    SlippageExceeded = 20,

    // State guards
    AlreadyInitialized = 30,
    NotInitialized = 31,
    MintNotStarted = 32,
    NoMintBasis = 33,
    RangeLocked = 34,
    AlreadyInPosition = 35,
    NotInPosition = 36,
    RebalanceCooldown = 37,
    Paused = 38,
    Reentrant = 39,
    SettlementMismatch = 40,

    // External calls
    VenueCallFailed = 50,
    NoOutputReceived = 51,
    VenueNotAllowed = 52,
    PriceDeviation = 53,
    OracleUnavailable = 54,

    // Arithmetic
    DivisionByZero = 60,
    ArithmeticOverflow = 61,
    TickOutOfBounds = 62,
    InvalidPrice = 63,
}

impl From<MathError> for VaultError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DivisionByZero => VaultError::DivisionByZero,
            MathError::Overflow => VaultError::ArithmeticOverflow,
            MathError::TickOutOfBounds => VaultError::TickOutOfBounds,
            MathError::InvalidPrice => VaultError::InvalidPrice,
        }
    }
}

/// Validate a public amount: negative values are rejected
pub fn non_negative(amount: i128) -> Result<u128, VaultError> {
    u128::try_from(amount).map_err(|_| VaultError::InvalidAmount)
}

/// Validate a public amount that must be strictly positive
pub fn positive(amount: i128) -> Result<u128, VaultError> {
    match non_negative(amount)? {
        0 => Err(VaultError::ZeroAmount),
        value => Ok(value),
    }
}

/// Narrow an internal amount back to the token interface width
pub fn to_i128(amount: u128) -> Result<i128, VaultError> {
    i128::try_from(amount).map_err(|_| VaultError::ArithmeticOverflow)
}
