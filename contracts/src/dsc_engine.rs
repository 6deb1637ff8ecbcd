//! DSC Engine Contract
//!
//! On-chain entry points of the engine. Each mutating call:
//! - takes the reentrancy lock
//! - wraps contract storage into a ledger store and wires the cross-contract
//!   adapters into an [`Engine`]
//! - runs one engine transition for the caller
//! - emits the committed events, or reverts the whole call with the error
//!
//! Users approve the engine on the collateral token before depositing and on
//! the stable unit before burning or liquidating.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::engine::{Engine, EngineParams};
use crate::errors::DscError;
use crate::events::{self, CollateralDeposited, CollateralRedeemed, DscBurned, DscMinted, Liquidated};
use crate::interfaces::EngineResult;
use crate::ledger::{LedgerStore, LedgerView};
use crate::oracle_adapter::FeedPriceResolver;
use crate::registry::AssetRegistry;
use crate::solvency::{self, Solvency};
use crate::token_adapter::{Cep18Transfers, StableUnitClient};
use crate::types::{
    AccountInformation, EngineConfig, LiquidationOutcome, ADDITIONAL_FEED_PRECISION, PRECISION,
};

type ContractEngine<'a> =
    Engine<MappingLedger<'a>, FeedPriceResolver<'a>, Cep18Transfers<'a>, StableUnitClient<'a>>;

type ContractSolvency<'a> = Solvency<'a, MappingView<'a>, FeedPriceResolver<'a>>;

/// DSC Engine Contract
#[odra::module(events = [CollateralDeposited, CollateralRedeemed, DscMinted, DscBurned, Liquidated])]
pub struct DscEngine {
    /// Registered collateral tokens, in registration order
    collateral_tokens: Var<Vec<Address>>,
    /// Price feed of each collateral token (same order)
    price_feeds: Var<Vec<Address>>,
    /// Stable unit contract
    dsc: Var<Address>,
    /// Solvency parameters
    config: Var<EngineConfig>,
    /// Collateral deposits: (user, token) -> amount
    collateral_deposited: Mapping<(Address, Address), U256>,
    /// Stable units minted per user
    dsc_minted: Mapping<Address, U256>,
    /// Set while a mutating call is in flight
    locked: Var<bool>,
}

#[odra::module]
impl DscEngine {
    /// Initialize with parallel token / feed lists and the stable unit address
    pub fn init(&mut self, token_addresses: Vec<Address>, price_feed_addresses: Vec<Address>, dsc_address: Address) {
        if let Err(err) = AssetRegistry::new(&token_addresses, &price_feed_addresses) {
            self.env().revert(err);
        }

        self.collateral_tokens.set(token_addresses);
        self.price_feeds.set(price_feed_addresses);
        self.dsc.set(dsc_address);
        self.config.set(EngineConfig::default());
        self.locked.set(false);
    }

    // ========== Position Operations ==========

    pub fn deposit_collateral_and_mint_dsc(
        &mut self,
        token_collateral_address: Address,
        amount_collateral: U256,
        amount_dsc_to_mint: U256,
    ) {
        let user = self.env().caller();
        self.transition(|engine| {
            engine.deposit_collateral_and_mint_dsc(user, token_collateral_address, amount_collateral, amount_dsc_to_mint)
        })
    }

    pub fn deposit_collateral(&mut self, token_collateral_address: Address, amount_collateral: U256) {
        let user = self.env().caller();
        self.transition(|engine| engine.deposit_collateral(user, token_collateral_address, amount_collateral))
    }

    pub fn redeem_collateral_for_dsc(
        &mut self,
        token_collateral_address: Address,
        amount_collateral: U256,
        amount_dsc_to_burn: U256,
    ) {
        let user = self.env().caller();
        self.transition(|engine| {
            engine.redeem_collateral_for_dsc(user, token_collateral_address, amount_collateral, amount_dsc_to_burn)
        })
    }

    pub fn redeem_collateral(&mut self, token_collateral_address: Address, amount_collateral: U256) {
        let user = self.env().caller();
        self.transition(|engine| engine.redeem_collateral(user, token_collateral_address, amount_collateral))
    }

    pub fn mint_dsc(&mut self, amount_dsc_to_mint: U256) {
        let user = self.env().caller();
        self.transition(|engine| engine.mint_dsc(user, amount_dsc_to_mint))
    }

    pub fn burn_dsc(&mut self, amount: U256) {
        let user = self.env().caller();
        self.transition(|engine| engine.burn_dsc(user, amount))
    }

    // ========== Liquidation ==========

    /// Cover `debt_to_cover` of `user`'s debt and receive `collateral` plus the bonus
    pub fn liquidate(&mut self, collateral: Address, user: Address, debt_to_cover: U256) -> LiquidationOutcome {
        let liquidator = self.env().caller();
        self.transition(|engine| engine.liquidate(liquidator, collateral, user, debt_to_cover))
    }

    // ========== Query Functions ==========

    pub fn get_health_factor(&self, user: Address) -> U256 {
        self.read(|solvency| solvency.health_factor(user))
    }

    pub fn is_liquidatable(&self, user: Address) -> bool {
        self.read(|solvency| solvency.is_liquidatable(user))
    }

    pub fn get_account_collateral_value(&self, user: Address) -> U256 {
        self.read(|solvency| solvency.account_collateral_value(user))
    }

    pub fn get_account_information(&self, user: Address) -> AccountInformation {
        self.read(|solvency| solvency.account_information(user))
    }

    pub fn get_usd_value(&self, token: Address, amount: U256) -> U256 {
        self.read(|solvency| solvency.usd_value(token, amount))
    }

    pub fn get_token_amount_from_usd(&self, token: Address, usd_amount_in_wei: U256) -> U256 {
        self.read(|solvency| solvency.token_amount_from_usd(token, usd_amount_in_wei))
    }

    pub fn calculate_health_factor(&self, total_dsc_minted: U256, collateral_value_in_usd: U256) -> U256 {
        let config = self.engine_config();
        self.unwrap_or_revert(solvency::calculate_health_factor(&config, total_dsc_minted, collateral_value_in_usd))
    }

    pub fn get_collateral_balance_of_user(&self, user: Address, token: Address) -> U256 {
        let registry = self.unwrap_or_revert(self.registry());
        self.unwrap_or_revert(registry.require_supported(token));
        self.collateral_deposited.get(&(user, token)).unwrap_or_default()
    }

    pub fn get_collateral_tokens(&self) -> Vec<Address> {
        self.collateral_tokens.get().unwrap_or_default()
    }

    pub fn get_collateral_token_price_feed(&self, token: Address) -> Address {
        let registry = self.unwrap_or_revert(self.registry());
        self.unwrap_or_revert(registry.price_feed(token))
    }

    pub fn get_dsc(&self) -> Option<Address> {
        self.dsc.get()
    }

    pub fn get_precision(&self) -> U256 {
        U256::from(PRECISION)
    }

    pub fn get_additional_feed_precision(&self) -> U256 {
        U256::from(ADDITIONAL_FEED_PRECISION)
    }

    pub fn get_liquidation_threshold(&self) -> u32 {
        self.engine_config().liquidation_threshold
    }

    pub fn get_liquidation_bonus(&self) -> u32 {
        self.engine_config().liquidation_bonus
    }

    pub fn get_liquidation_precision(&self) -> u32 {
        self.engine_config().liquidation_precision
    }

    pub fn get_min_health_factor(&self) -> U256 {
        self.engine_config().min_health_factor
    }

}

impl DscEngine {
    fn engine_config(&self) -> EngineConfig {
        self.config.get().unwrap_or_default()
    }

    fn registry(&self) -> EngineResult<AssetRegistry> {
        let tokens = self.collateral_tokens.get().unwrap_or_default();
        let feeds = self.price_feeds.get().unwrap_or_default();
        AssetRegistry::new(&tokens, &feeds)
    }

    fn stable_unit(&self) -> EngineResult<Address> {
        self.dsc.get().ok_or(DscError::InvalidConfig)
    }

    fn unwrap_or_revert<T>(&self, result: EngineResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => self.env().revert(err),
        }
    }

    /// Run one engine transition under the reentrancy lock
    fn transition<R>(&mut self, op: impl FnOnce(&mut ContractEngine<'_>) -> EngineResult<R>) -> R {
        if self.locked.get().unwrap_or(false) {
            self.env().revert(DscError::ReentrantCall);
        }
        self.locked.set(true);

        let env = self.env();
        let params = self.registry().and_then(|registry| {
            Ok(EngineParams {
                registry,
                config: self.engine_config(),
                engine_address: env.self_address(),
                stable_unit: self.stable_unit()?,
            })
        });

        let result = params.and_then(|params| {
            let stable_unit = params.stable_unit;
            let ledger = MappingLedger {
                collateral: &mut self.collateral_deposited,
                debt: &mut self.dsc_minted,
            };
            let mut engine = Engine::new(
                params,
                ledger,
                FeedPriceResolver::new(&env),
                Cep18Transfers::new(&env),
                StableUnitClient::new(&env, stable_unit),
            )?;
            let value = op(&mut engine)?;
            Ok((value, engine.take_events()))
        });

        match result {
            Ok((value, committed)) => {
                for event in committed {
                    events::emit(&env, event);
                }
                self.locked.set(false);
                value
            }
            Err(err) => env.revert(err),
        }
    }

    /// Evaluate a read against current storage and live prices
    fn read<R>(&self, query: impl FnOnce(&ContractSolvency<'_>) -> EngineResult<R>) -> R {
        let env = self.env();
        let registry = self.unwrap_or_revert(self.registry());
        let config = self.engine_config();
        let prices = FeedPriceResolver::new(&env);
        let view = MappingView {
            collateral: &self.collateral_deposited,
            debt: &self.dsc_minted,
        };
        let solvency = Solvency::new(&view, &registry, &prices, &config);
        self.unwrap_or_revert(query(&solvency))
    }
}

/// Contract storage as a ledger store
struct MappingLedger<'a> {
    collateral: &'a mut Mapping<(Address, Address), U256>,
    debt: &'a mut Mapping<Address, U256>,
}

impl LedgerView for MappingLedger<'_> {
    fn collateral_of(&self, user: Address, asset: Address) -> U256 {
        self.collateral.get(&(user, asset)).unwrap_or_default()
    }

    fn debt_of(&self, user: Address) -> U256 {
        self.debt.get(&user).unwrap_or_default()
    }
}

impl LedgerStore for MappingLedger<'_> {
    fn set_collateral(&mut self, user: Address, asset: Address, amount: U256) {
        self.collateral.set(&(user, asset), amount);
    }

    fn set_debt(&mut self, user: Address, amount: U256) {
        self.debt.set(&user, amount);
    }
}

/// Read-only view over contract storage
struct MappingView<'a> {
    collateral: &'a Mapping<(Address, Address), U256>,
    debt: &'a Mapping<Address, U256>,
}

impl LedgerView for MappingView<'_> {
    fn collateral_of(&self, user: Address, asset: Address) -> U256 {
        self.collateral.get(&(user, asset)).unwrap_or_default()
    }

    fn debt_of(&self, user: Address) -> U256 {
        self.debt.get(&user).unwrap_or_default()
    }
}
