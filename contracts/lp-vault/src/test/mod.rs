mod mock_oracle;

mod test_mint_burn;

use crate::{LpVault, LpVaultClient};
use mock_oracle::{MockOracle, MockOracleClient};
use mock_pool::{MockPool, MockPoolClient};
use mock_venue::{MockVenue, MockVenueClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Env, String};
use vault_types::{InitParams, OracleConfig, RebalanceGuard};

/// Run `f` inside a freshly registered vault contract
pub(crate) fn with_contract<F, R>(env: &Env, f: F) -> R
where
    F: FnOnce() -> R,
{
    let contract_id = env.register(LpVault, ());
    env.as_contract(&contract_id, f)
}

pub(crate) const TICK_SPACING: i32 = 10;
pub(crate) const REBALANCE_INTERVAL: u64 = 3_600;
/// Liquidity of the seeding mint in most scenarios
pub(crate) const SEED_LIQUIDITY: i128 = 1_000_000_000_000;
pub(crate) const USER_FUNDS: i128 = 1_000_000_000_000_000;

pub(crate) struct Setup<'a> {
    pub env: Env,
    pub vault: LpVaultClient<'a>,
    pub pool: MockPoolClient<'a>,
    pub token0: TokenClient<'a>,
    pub token1: TokenClient<'a>,
    pub admin0: StellarAssetClient<'a>,
    pub admin1: StellarAssetClient<'a>,
    pub owner: Address,
    pub manager: Address,
}

fn create_token(env: &Env, admin: &Address) -> Address {
    env.register_stellar_asset_contract_v2(admin.clone()).address()
}

fn base_params(env: &Env, pool: &Address, owner: &Address, manager: &Address) -> InitParams {
    InitParams {
        pool: pool.clone(),
        owner: owner.clone(),
        manager: manager.clone(),
        name: String::from_str(env, "Vault Share"),
        symbol: String::from_str(env, "VLP"),
        managing_fee_bps: 0,
        performance_fee_bps: 0,
        other_fee: None,
        other_fee_bps: 0,
        rebalance_guard: RebalanceGuard::Allowlist,
        min_rebalance_interval: REBALANCE_INTERVAL,
    }
}

pub(crate) fn setup<'a>(env: &Env) -> Setup<'a> {
    setup_with(env, |_| {})
}

/// Deploy tokens, a pool at tick 0 and a vault initialized with
/// `configure`d parameters
pub(crate) fn setup_with<'a>(env: &Env, configure: impl FnOnce(&mut InitParams)) -> Setup<'a> {
    env.mock_all_auths();

    let token_admin = Address::generate(env);
    let a = create_token(env, &token_admin);
    let b = create_token(env, &token_admin);
    let (t0, t1) = if a < b { (a, b) } else { (b, a) };

    let pool_id = env.register(MockPool, ());
    let pool = MockPoolClient::new(env, &pool_id);
    pool.initialize(&t0, &t1, &TICK_SPACING, &0);

    let owner = Address::generate(env);
    let manager = Address::generate(env);
    let mut params = base_params(env, &pool_id, &owner, &manager);
    configure(&mut params);

    let vault_id = env.register(LpVault, ());
    let vault = LpVaultClient::new(env, &vault_id);
    vault.initialize(&params);

    Setup {
        env: env.clone(),
        vault,
        pool,
        token0: TokenClient::new(env, &t0),
        token1: TokenClient::new(env, &t1),
        admin0: StellarAssetClient::new(env, &t0),
        admin1: StellarAssetClient::new(env, &t1),
        owner,
        manager,
    }
}

impl<'a> Setup<'a> {
    /// A new account holding `USER_FUNDS` of both tokens
    pub fn user(&self) -> Address {
        let user = Address::generate(&self.env);
        self.admin0.mint(&user, &USER_FUNDS);
        self.admin1.mint(&user, &USER_FUNDS);
        user
    }

    pub fn seed_range(&self, lower: i32, upper: i32) {
        self.vault.update_range(&lower, &upper);
    }

    /// Seed [-200, 200] and make the first mint of `SEED_LIQUIDITY` shares
    pub fn seeded(&self) -> Address {
        self.seed_range(-200, 200);
        let user = self.user();
        self.vault
            .mint(&user, &SEED_LIQUIDITY, &USER_FUNDS, &USER_FUNDS);
        user
    }

    /// Fund the pool and credit `amount0`/`amount1` of fees to in-range
    /// liquidity
    pub fn accrue_fees(&self, amount0: i128, amount1: i128) {
        self.admin0.mint(&self.pool.address, &amount0);
        self.admin1.mint(&self.pool.address, &amount1);
        self.pool.accrue_fees(&(amount0 as u128), &(amount1 as u128));
    }

    /// Send tokens straight to the vault as passive balance
    pub fn donate(&self, amount0: i128, amount1: i128) {
        self.admin0.mint(&self.vault.address, &amount0);
        self.admin1.mint(&self.vault.address, &amount1);
    }

    pub fn position_liquidity(&self) -> u128 {
        let range = self.vault.get_range().unwrap();
        self.pool
            .get_position(&self.vault.address, &range.lower, &range.upper)
            .liquidity
    }

    pub fn venue(&self) -> MockVenueClient<'a> {
        let venue_id = self.env.register(MockVenue, ());
        let venue = MockVenueClient::new(&self.env, &venue_id);
        self.admin0.mint(&venue_id, &USER_FUNDS);
        self.admin1.mint(&venue_id, &USER_FUNDS);
        venue
    }

    pub fn advance_time(&self, seconds: u64) {
        use soroban_sdk::testutils::Ledger;
        self.env
            .ledger()
            .with_mut(|li| li.timestamp = li.timestamp.saturating_add(seconds));
    }
}

/// Setup whose rebalances are checked against a fresh oracle
pub(crate) fn setup_with_oracle<'a>(env: &Env) -> (Setup<'a>, MockOracleClient<'a>) {
    let oracle_id = env.register(MockOracle, ());
    let oracle = MockOracleClient::new(env, &oracle_id);
    let s = setup_with(env, |params| {
        params.rebalance_guard = RebalanceGuard::OracleCheck(OracleConfig {
            oracle: oracle_id.clone(),
        });
    });
    (s, oracle)
}
