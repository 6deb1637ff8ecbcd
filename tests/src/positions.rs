use crate::fixture::*;
use dsc_engine_contracts::errors::DscError;
use dsc_engine_contracts::events::EngineEvent;
use dsc_engine_contracts::testing::addr;
use dsc_engine_contracts::types::{AccountInformation, PRECISION};
use odra::casper_types::U256;
use pretty_assertions::assert_eq;

#[test]
fn test_usd_value_of_deposit() {
    let mut engine = engine(2000, 30_000);
    engine.deposit_collateral(user(), weth(), ether(15)).unwrap();

    assert_eq!(engine.usd_value(weth(), ether(15)).unwrap(), ether(30_000));
    assert_eq!(engine.account_collateral_value_usd(user()).unwrap(), ether(30_000));
}

#[test]
fn test_mint_up_to_health_boundary() {
    let mut engine = engine(2000, 30_000);
    engine.deposit_collateral(user(), weth(), ether(15)).unwrap();
    engine.mint_dsc(user(), ether(15_000)).unwrap();

    assert_eq!(engine.health_factor(user()).unwrap(), U256::from(PRECISION));
    assert!(!engine.is_liquidatable(user()).unwrap());

    let result = engine.mint_dsc(user(), U256::one());
    match result {
        Err(DscError::HealthFactorBroken { health_factor }) => {
            assert!(health_factor < U256::from(PRECISION));
        }
        other => panic!("expected HealthFactorBroken, got {:?}", other),
    }
    assert!(matches!(
        engine.mint_dsc(user(), ether(1)),
        Err(DscError::HealthFactorBroken { .. })
    ));
    assert_eq!(engine.debt_of(user()), ether(15_000));
}

#[test]
fn test_deposit_and_mint_in_one_transition() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(10), ether(100))
        .unwrap();

    assert_eq!(
        engine.account_information(user()).unwrap(),
        AccountInformation {
            total_dsc_minted: ether(100),
            collateral_value_usd: ether(20_000),
        }
    );
    assert_eq!(engine.issuer().balance_of(user()), ether(100));
    assert_eq!(engine.issuer().total_supply(), ether(100));
    assert_eq!(
        engine.take_events(),
        vec![
            EngineEvent::CollateralDeposited { user: user(), token: weth(), amount: ether(10) },
            EngineEvent::DscMinted { user: user(), amount: ether(100) },
        ]
    );
}

#[test]
fn test_deposit_and_mint_rolls_back_deposit_when_unhealthy() {
    let mut engine = engine(2000, 30_000);
    let before = snapshot(&mut engine);

    // 1 WETH = $2000 backs at most 1000 DSC
    let result = engine.deposit_collateral_and_mint_dsc(user(), weth(), ether(1), ether(1_001));
    assert!(matches!(result, Err(DscError::HealthFactorBroken { .. })));
    assert_unchanged(&mut engine, &before);
}

#[test]
fn test_collateral_value_sums_assets() {
    let mut engine = engine(2000, 30_000);
    engine.deposit_collateral(user(), weth(), ether(2)).unwrap();
    engine.deposit_collateral(user(), wbtc(), tenths(5)).unwrap();

    // 2 * 2000 + 0.5 * 30000
    assert_eq!(engine.account_collateral_value_usd(user()).unwrap(), ether(19_000));
    assert_eq!(engine.collateral_balance_of(user(), wbtc()).unwrap(), tenths(5));
}

#[test]
fn test_token_amount_from_usd() {
    let engine = engine(2000, 30_000);
    assert_eq!(engine.token_amount_from_usd(weth(), ether(100)).unwrap(), U256::from(PRECISION / 20));
    assert_eq!(engine.token_amount_from_usd(wbtc(), ether(30_000)).unwrap(), ether(1));
}

#[test]
fn test_redeem_returns_collateral() {
    let mut engine = engine(2000, 30_000);
    engine.deposit_collateral(user(), weth(), ether(10)).unwrap();
    engine.take_events();

    engine.redeem_collateral(user(), weth(), ether(4)).unwrap();
    assert_eq!(engine.collateral_balance_of(user(), weth()).unwrap(), ether(6));
    assert_eq!(
        engine.transfers().balance_of(weth(), user()),
        ether(STARTING_BALANCE) - ether(6)
    );
    assert_eq!(
        engine.take_events(),
        vec![EngineEvent::CollateralRedeemed {
            from: user(),
            to: user(),
            token: weth(),
            amount: ether(4),
        }]
    );
}

#[test]
fn test_redeem_into_unsafe_position_fails() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(10), ether(5_000))
        .unwrap();
    let before = snapshot(&mut engine);

    // 5 WETH left would back 5000 exactly; 5.1 removed breaks it
    let result = engine.redeem_collateral(user(), weth(), tenths(51));
    assert!(matches!(result, Err(DscError::HealthFactorBroken { .. })));
    assert_unchanged(&mut engine, &before);

    engine.redeem_collateral(user(), weth(), ether(5)).unwrap();
    assert_eq!(engine.health_factor(user()).unwrap(), U256::from(PRECISION));
}

#[test]
fn test_redeem_more_than_deposited() {
    let mut engine = engine(2000, 30_000);
    engine.deposit_collateral(user(), weth(), ether(1)).unwrap();
    let before = snapshot(&mut engine);

    assert_eq!(
        engine.redeem_collateral(user(), weth(), ether(2)),
        Err(DscError::InsufficientCollateral)
    );
    assert_unchanged(&mut engine, &before);
}

#[test]
fn test_burn_lowers_debt() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(1), ether(500))
        .unwrap();
    engine.take_events();

    engine.burn_dsc(user(), ether(200)).unwrap();
    assert_eq!(engine.debt_of(user()), ether(300));
    assert_eq!(engine.issuer().balance_of(user()), ether(300));
    assert_eq!(engine.issuer().total_supply(), ether(300));
    assert_eq!(
        engine.take_events(),
        vec![EngineEvent::DscBurned { on_behalf_of: user(), payer: user(), amount: ether(200) }]
    );
}

#[test]
fn test_redeem_collateral_for_dsc() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(10), ether(10_000))
        .unwrap();

    // Redeeming alone would break the position; burning first keeps it whole
    assert!(matches!(
        engine.redeem_collateral(user(), weth(), ether(5)),
        Err(DscError::HealthFactorBroken { .. })
    ));
    engine
        .redeem_collateral_for_dsc(user(), weth(), ether(5), ether(5_000))
        .unwrap();

    assert_eq!(engine.debt_of(user()), ether(5_000));
    assert_eq!(engine.collateral_balance_of(user(), weth()).unwrap(), ether(5));
    assert_eq!(engine.health_factor(user()).unwrap(), U256::from(PRECISION));
}

#[test]
fn test_full_exit_leaves_zero_position() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(3), ether(1_000))
        .unwrap();
    engine
        .redeem_collateral_for_dsc(user(), weth(), ether(3), ether(1_000))
        .unwrap();

    assert_eq!(engine.debt_of(user()), U256::zero());
    assert_eq!(engine.collateral_balance_of(user(), weth()).unwrap(), U256::zero());
    assert_eq!(engine.health_factor(user()).unwrap(), U256::MAX);
    assert_eq!(engine.transfers().balance_of(weth(), user()), ether(STARTING_BALANCE));
}

#[test]
fn test_zero_amounts_rejected() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(1), ether(10))
        .unwrap();
    let before = snapshot(&mut engine);

    let zero = U256::zero();
    assert_eq!(engine.deposit_collateral(user(), weth(), zero), Err(DscError::InvalidAmount));
    assert_eq!(engine.redeem_collateral(user(), weth(), zero), Err(DscError::InvalidAmount));
    assert_eq!(engine.mint_dsc(user(), zero), Err(DscError::InvalidAmount));
    assert_eq!(engine.burn_dsc(user(), zero), Err(DscError::InvalidAmount));
    assert_eq!(
        engine.deposit_collateral_and_mint_dsc(user(), weth(), ether(1), zero),
        Err(DscError::InvalidAmount)
    );
    assert_eq!(
        engine.redeem_collateral_for_dsc(user(), weth(), zero, ether(1)),
        Err(DscError::InvalidAmount)
    );
    assert_eq!(
        engine.liquidate(liquidator(), weth(), user(), zero),
        Err(DscError::InvalidAmount)
    );
    assert_unchanged(&mut engine, &before);
}

#[test]
fn test_unlisted_asset_rejected_everywhere() {
    let mut engine = engine(2000, 30_000);
    let unlisted = addr(UNLISTED);
    let before = snapshot(&mut engine);

    assert_eq!(engine.deposit_collateral(user(), unlisted, ether(1)), Err(DscError::UnsupportedAsset));
    assert_eq!(engine.redeem_collateral(user(), unlisted, ether(1)), Err(DscError::UnsupportedAsset));
    assert_eq!(
        engine.liquidate(liquidator(), unlisted, user(), ether(1)),
        Err(DscError::UnsupportedAsset)
    );
    assert_eq!(engine.usd_value(unlisted, ether(1)), Err(DscError::UnsupportedAsset));
    assert_eq!(engine.collateral_balance_of(user(), unlisted), Err(DscError::UnsupportedAsset));
    assert_eq!(engine.collateral_price_feed(unlisted), Err(DscError::UnsupportedAsset));
    assert_unchanged(&mut engine, &before);
}

#[test]
fn test_burn_beyond_debt_is_accounting_error() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(1), ether(10))
        .unwrap();
    let before = snapshot(&mut engine);

    assert_eq!(engine.burn_dsc(user(), ether(11)), Err(DscError::InternalAccountingError));
    assert_unchanged(&mut engine, &before);
}

#[test]
fn test_transfer_failure_keeps_ledger() {
    let mut engine = engine(2000, 30_000);
    engine.deposit_collateral(user(), weth(), ether(5)).unwrap();
    engine.transfers_mut().fail_transfers(true);
    let before = snapshot(&mut engine);

    assert_eq!(engine.deposit_collateral(user(), weth(), ether(1)), Err(DscError::TransferFailed));
    assert_eq!(engine.redeem_collateral(user(), weth(), ether(1)), Err(DscError::TransferFailed));
    assert_unchanged(&mut engine, &before);
}

#[test]
fn test_stable_unit_failures() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(1), ether(100))
        .unwrap();

    engine.issuer_mut().fail_mints(true);
    let before = snapshot(&mut engine);
    assert_eq!(engine.mint_dsc(user(), ether(1)), Err(DscError::MintFailed));
    assert_unchanged(&mut engine, &before);

    engine.issuer_mut().fail_mints(false);
    engine.issuer_mut().fail_transfers(true);
    let before = snapshot(&mut engine);
    assert_eq!(engine.burn_dsc(user(), ether(1)), Err(DscError::TransferFailed));
    assert_unchanged(&mut engine, &before);
}

#[test]
fn test_failed_mint_returns_deposited_collateral() {
    let mut engine = engine(2000, 30_000);
    engine.deposit_collateral(user(), weth(), ether(1)).unwrap();
    engine.issuer_mut().fail_mints(true);
    let before = snapshot(&mut engine);

    // The collateral pull succeeds, then the mint fails
    assert_eq!(
        engine.deposit_collateral_and_mint_dsc(user(), weth(), ether(1), ether(100)),
        Err(DscError::MintFailed)
    );
    assert_unchanged(&mut engine, &before);
    assert_eq!(engine.transfers().balance_of(weth(), addr(ENGINE)), ether(1));
    assert_eq!(engine.collateral_balance_of(user(), weth()).unwrap(), ether(1));
}

#[test]
fn test_failed_payout_restores_burned_stable_units() {
    let mut engine = engine(2000, 30_000);
    engine
        .deposit_collateral_and_mint_dsc(user(), weth(), ether(2), ether(100))
        .unwrap();
    engine.transfers_mut().fail_transfers(true);
    let before = snapshot(&mut engine);

    // Stable units are pulled and burned before the collateral payout fails
    assert_eq!(
        engine.redeem_collateral_for_dsc(user(), weth(), ether(1), ether(50)),
        Err(DscError::TransferFailed)
    );
    assert_unchanged(&mut engine, &before);
    assert_eq!(engine.issuer().balance_of(user()), ether(100));
    assert_eq!(engine.issuer().total_supply(), ether(100));
}

#[test]
fn test_missing_price_aborts_solvency_checks() {
    let mut engine = engine(2000, 30_000);
    engine.deposit_collateral(user(), weth(), ether(1)).unwrap();
    engine.prices_mut().remove(addr(WETH_FEED));
    let before = snapshot(&mut engine);

    assert_eq!(engine.mint_dsc(user(), ether(1)), Err(DscError::PriceUnavailable));
    assert_eq!(engine.health_factor(user()), Ok(U256::MAX));
    assert_eq!(engine.account_collateral_value_usd(user()), Err(DscError::PriceUnavailable));
    assert_unchanged(&mut engine, &before);
}

#[test]
fn test_zero_price_cannot_be_inverted() {
    let mut engine = engine(2000, 30_000);
    set_eth_price(&mut engine, 0);

    assert_eq!(engine.usd_value(weth(), ether(1)), Ok(U256::zero()));
    assert_eq!(engine.token_amount_from_usd(weth(), ether(1)), Err(DscError::PriceUnavailable));
}

#[test]
fn test_read_surface() {
    let engine = engine(2000, 30_000);
    assert_eq!(engine.collateral_tokens(), vec![weth(), wbtc()]);
    assert_eq!(engine.collateral_price_feed(wbtc()), Ok(addr(WBTC_FEED)));
    assert_eq!(engine.stable_unit(), addr(DSC));
    assert_eq!(engine.engine_address(), addr(ENGINE));
    assert_eq!(engine.config().liquidation_threshold, 50);
    assert_eq!(engine.config().liquidation_bonus, 10);
    assert_eq!(engine.config().liquidation_precision, 100);
    assert_eq!(
        engine.calculate_health_factor(ether(100), ether(300)),
        Ok(ether(1) + tenths(5))
    );
    assert_eq!(engine.calculate_health_factor(U256::zero(), ether(300)), Ok(U256::MAX));
}
