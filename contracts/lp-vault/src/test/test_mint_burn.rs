use super::*;
use crate::VaultError;

// === Initialization ===

#[test]
fn test_initialize_reads_pool() {
    let env = Env::default();
    let s = setup(&env);

    let config = s.vault.get_config();
    assert_eq!(config.pool, s.pool.address);
    assert_eq!(config.token0, s.token0.address);
    assert_eq!(config.token1, s.token1.address);
    assert_eq!(config.tick_spacing, TICK_SPACING);
    assert_eq!(s.vault.get_owner(), s.owner);
    assert_eq!(s.vault.get_manager(), s.manager);

    assert_eq!(s.vault.name(), String::from_str(&env, "Vault Share"));
    assert_eq!(s.vault.decimals(), 7);
    assert_eq!(s.vault.total_supply(), 0);
    assert!(!s.vault.in_position());
    assert!(!s.vault.mint_started());
    assert_eq!(s.vault.get_range(), None);
}

#[test]
fn test_initialize_twice_fails() {
    let env = Env::default();
    let s = setup(&env);
    let params = base_params(&env, &s.pool.address, &s.owner, &s.manager);

    assert_eq!(
        s.vault.try_initialize(&params),
        Err(Ok(VaultError::AlreadyInitialized))
    );
}

#[test]
fn test_initialize_rejects_excess_fees() {
    let env = Env::default();
    let s = setup(&env);
    let vault = LpVaultClient::new(&env, &env.register(LpVault, ()));

    let mut params = base_params(&env, &s.pool.address, &s.owner, &s.manager);
    params.performance_fee_bps = 5_001;
    assert_eq!(vault.try_initialize(&params), Err(Ok(VaultError::FeeTooHigh)));

    let mut params = base_params(&env, &s.pool.address, &s.owner, &s.manager);
    params.other_fee_bps = 100;
    assert_eq!(
        vault.try_initialize(&params),
        Err(Ok(VaultError::OtherFeeDisabled))
    );
}

// === Minting ===

#[test]
fn test_mint_requires_range() {
    let env = Env::default();
    let s = setup(&env);
    let user = s.user();

    assert_eq!(
        s.vault.try_mint(&user, &1_000, &USER_FUNDS, &USER_FUNDS),
        Err(Ok(VaultError::MintNotStarted))
    );
    assert_eq!(
        s.vault.try_get_mint_amounts(&1_000, &1_000),
        Err(Ok(VaultError::MintNotStarted))
    );
}

#[test]
fn test_first_mint_prices_shares_as_liquidity() {
    let env = Env::default();
    let s = setup(&env);
    s.seed_range(-200, 200);
    assert!(s.vault.mint_started());
    assert!(s.vault.in_position());

    let user = s.user();
    let (amount0, amount1) = s
        .vault
        .mint(&user, &SEED_LIQUIDITY, &USER_FUNDS, &USER_FUNDS);

    assert_eq!((amount0, amount1), (9_949_671_258, 9_949_671_258));
    assert_eq!(s.token0.balance(&user), USER_FUNDS - amount0);
    assert_eq!(s.token1.balance(&user), USER_FUNDS - amount1);
    assert_eq!(s.vault.balance(&user), SEED_LIQUIDITY);
    assert_eq!(s.vault.total_supply(), SEED_LIQUIDITY);

    // Liquidity is deposited, nothing is left passive
    assert_eq!(s.position_liquidity(), 999_999_999_920);
    assert_eq!(s.token0.balance(&s.vault.address), 0);
    assert_eq!(s.token1.balance(&s.vault.address), 0);
    assert_eq!(
        s.vault.get_underlying_balances(),
        (9_949_671_257, 9_949_671_257)
    );
    assert_eq!(s.vault.operation_state(), vault_types::OperationState::Idle);
}

#[test]
fn test_mint_slippage() {
    let env = Env::default();
    let s = setup(&env);
    s.seed_range(-200, 200);
    let user = s.user();

    assert_eq!(
        s.vault
            .try_mint(&user, &SEED_LIQUIDITY, &9_949_671_257, &USER_FUNDS),
        Err(Ok(VaultError::SlippageExceeded))
    );
    assert_eq!(
        s.vault.try_mint(&user, &0, &USER_FUNDS, &USER_FUNDS),
        Err(Ok(VaultError::ZeroAmount))
    );
    assert_eq!(
        s.vault.try_mint(&user, &-5, &USER_FUNDS, &USER_FUNDS),
        Err(Ok(VaultError::InvalidAmount))
    );
}

#[test]
fn test_second_mint_is_pro_rata() {
    let env = Env::default();
    let s = setup(&env);
    let first = s.seeded();
    let second = s.user();

    let (amount0, amount1) = s
        .vault
        .mint(&second, &(SEED_LIQUIDITY / 2), &USER_FUNDS, &USER_FUNDS);
    assert_eq!((amount0, amount1), (4_974_835_629, 4_974_835_629));
    assert_eq!(s.vault.total_supply(), SEED_LIQUIDITY * 3 / 2);
    assert_eq!(s.vault.balance(&first), SEED_LIQUIDITY);
    assert_eq!(s.vault.known_user_count(), 2);
}

#[test]
fn test_mint_does_not_dilute_holders() {
    let env = Env::default();
    let s = setup(&env);
    let first = s.seeded();
    s.accrue_fees(12_345, 6_789);

    let value_per_share = |s: &Setup| {
        let (u0, u1) = s.vault.get_underlying_balances();
        let supply = s.vault.total_supply();
        let scale = 1_000_000_000_000_000_000i128;
        (u0 * scale / supply, u1 * scale / supply)
    };
    let before = value_per_share(&s);

    let second = s.user();
    s.vault.mint(&second, &123_456_789, &USER_FUNDS, &USER_FUNDS);
    let after = value_per_share(&s);

    assert!(after.0 >= before.0);
    assert!(after.1 >= before.1);
    assert_eq!(s.vault.balance(&first), SEED_LIQUIDITY);
}

#[test]
fn test_get_mint_amounts_first_mint() {
    let env = Env::default();
    let s = setup(&env);
    s.seed_range(-200, 200);

    assert_eq!(
        s.vault.get_mint_amounts(&9_949_671_258, &9_949_671_258),
        (9_949_671_257, 9_949_671_257, 999_999_999_920)
    );
}

#[test]
fn test_get_mint_amounts_respects_maxima() {
    let env = Env::default();
    let s = setup(&env);
    s.seeded();

    let (max0, max1) = (4_974_835_629, 1_000_000_000_000);
    let (amount0, amount1, shares) = s.vault.get_mint_amounts(&max0, &max1);
    assert!(shares > 0);
    assert!(amount0 <= max0);
    assert!(amount1 <= max1);

    let user = s.user();
    assert_eq!(s.vault.mint(&user, &shares, &max0, &max1), (amount0, amount1));
}

// === Burning ===

#[test]
fn test_full_exit_returns_deposit() {
    let env = Env::default();
    let s = setup(&env);
    let user = s.seeded();

    let (amount0, amount1) = s.vault.burn(&user, &SEED_LIQUIDITY, &0, &0);
    assert_eq!((amount0, amount1), (9_949_671_257, 9_949_671_257));
    assert_eq!(s.token0.balance(&user), USER_FUNDS - 1);
    assert_eq!(s.token1.balance(&user), USER_FUNDS - 1);
    assert_eq!(s.vault.total_supply(), 0);
    assert_eq!(s.vault.balance(&user), 0);
    assert_eq!(s.vault.user_notional(&user), vault_types::TokenPair::default());
}

#[test]
fn test_burn_charges_managing_fee() {
    let env = Env::default();
    let s = setup_with(&env, |params| params.managing_fee_bps = 100);
    let user = s.seeded();
    let before0 = s.token0.balance(&user);

    let (amount0, amount1) = s.vault.burn(&user, &(SEED_LIQUIDITY / 2), &0, &0);
    // gross 4_974_835_628, 1% rounded up stays with the manager
    assert_eq!((amount0, amount1), (4_925_087_271, 4_925_087_271));
    assert_eq!(s.token0.balance(&user), before0 + amount0);

    let accrued = s.vault.manager_balances();
    assert_eq!((accrued.amount0, accrued.amount1), (49_748_357, 49_748_357));

    // Manager balances are not holder value
    assert_eq!(
        s.vault.get_underlying_balances(),
        (4_974_835_628, 4_974_835_628)
    );
}

#[test]
fn test_burn_slippage_checked_on_gross() {
    let env = Env::default();
    let s = setup_with(&env, |params| params.managing_fee_bps = 100);
    let user = s.seeded();

    assert_eq!(
        s.vault
            .try_burn(&user, &(SEED_LIQUIDITY / 2), &4_974_835_629, &0),
        Err(Ok(VaultError::SlippageExceeded))
    );
    // Net is below the minimum but gross is not
    s.vault
        .burn(&user, &(SEED_LIQUIDITY / 2), &4_974_835_628, &4_974_835_628);
}

#[test]
fn test_burn_more_than_balance() {
    let env = Env::default();
    let s = setup(&env);
    let user = s.seeded();

    assert_eq!(
        s.vault.try_burn(&user, &(SEED_LIQUIDITY + 1), &0, &0),
        Err(Ok(VaultError::InsufficientShares))
    );
    assert_eq!(
        s.vault.try_burn(&user, &0, &0, &0),
        Err(Ok(VaultError::ZeroAmount))
    );
}

#[test]
fn test_burn_out_of_position_is_pro_rata() {
    let env = Env::default();
    let s = setup(&env);
    let user = s.seeded();
    s.vault.remove_liquidity(&0, &0);

    let (u0, u1) = s.vault.get_underlying_balances();
    let (amount0, amount1) = s.vault.burn(&user, &(SEED_LIQUIDITY / 4), &0, &0);
    assert_eq!(amount0, u0 / 4);
    assert_eq!(amount1, u1 / 4);
}

#[test]
fn test_no_mint_basis_after_exit_out_of_position() {
    let env = Env::default();
    let s = setup(&env);
    let user = s.seeded();
    s.vault.remove_liquidity(&0, &0);
    s.vault.burn(&user, &SEED_LIQUIDITY, &0, &0);
    assert_eq!(s.vault.total_supply(), 0);

    assert_eq!(
        s.vault.try_mint(&user, &1_000, &USER_FUNDS, &USER_FUNDS),
        Err(Ok(VaultError::NoMintBasis))
    );

    // An empty vault can be seeded again
    s.seed_range(-100, 100);
    s.vault.mint(&user, &1_000_000, &USER_FUNDS, &USER_FUNDS);
    assert_eq!(s.vault.total_supply(), 1_000_000);
}

#[test]
fn test_paused_blocks_mint_and_burn() {
    let env = Env::default();
    let s = setup(&env);
    let user = s.seeded();

    s.vault.set_paused(&true);
    assert!(s.vault.is_paused());
    assert_eq!(
        s.vault.try_mint(&user, &1_000, &USER_FUNDS, &USER_FUNDS),
        Err(Ok(VaultError::Paused))
    );
    assert_eq!(
        s.vault.try_burn(&user, &1_000, &0, &0),
        Err(Ok(VaultError::Paused))
    );

    s.vault.set_paused(&false);
    s.vault.burn(&user, &1_000, &0, &0);
}
