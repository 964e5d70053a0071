use soroban_sdk::{contract, contracterror, contractimpl, contracttype, Address, Env};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum OracleError {
    NoPrice = 1,
}

#[contracttype]
#[derive(Clone)]
enum OracleKey {
    Price(Address),
}

#[contract]
pub struct MockOracle;

#[contractimpl]
impl MockOracle {
    pub fn set_price(env: Env, asset: Address, price: i128, decimals: u32) {
        env.storage()
            .instance()
            .set(&OracleKey::Price(asset), &(price, decimals));
    }

    /// (price, price decimals) of one whole unit of `asset`
    pub fn latest_price(env: Env, asset: Address) -> Result<(i128, u32), OracleError> {
        env.storage()
            .instance()
            .get(&OracleKey::Price(asset))
            .ok_or(OracleError::NoPrice)
    }
}
