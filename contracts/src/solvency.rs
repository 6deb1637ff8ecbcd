//! Solvency engine: account valuation and the health factor gate.
//!
//! `health_factor = (collateral_usd * threshold / precision) * 1e18 / debt`
//!
//! A zero-debt account is always safe and its factor is `U256::MAX`; the
//! division never runs for it.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DscError;
use crate::interfaces::{EngineResult, PriceResolver};
use crate::ledger::LedgerView;
use crate::math::{checked_add, mul_div};
use crate::oracle_adapter;
use crate::registry::AssetRegistry;
use crate::types::{AccountInformation, EngineConfig, PriceQuote, PRECISION};

/// Pure health factor formula.
pub fn calculate_health_factor(
    config: &EngineConfig,
    total_dsc_minted: U256,
    collateral_value_usd: U256,
) -> EngineResult<U256> {
    if total_dsc_minted.is_zero() {
        return Ok(U256::MAX);
    }
    let adjusted = mul_div(
        collateral_value_usd,
        U256::from(config.liquidation_threshold),
        U256::from(config.liquidation_precision),
    )?;
    mul_div(adjusted, U256::from(PRECISION), total_dsc_minted)
}

/// Read-only valuation over a ledger view, the registry and a price source.
pub struct Solvency<'a, L: ?Sized, P: ?Sized> {
    ledger: &'a L,
    registry: &'a AssetRegistry,
    prices: &'a P,
    config: &'a EngineConfig,
}

impl<'a, L, P> Solvency<'a, L, P>
where
    L: LedgerView + ?Sized,
    P: PriceResolver + ?Sized,
{
    pub fn new(
        ledger: &'a L,
        registry: &'a AssetRegistry,
        prices: &'a P,
        config: &'a EngineConfig,
    ) -> Self {
        Self { ledger, registry, prices, config }
    }

    /// Latest quote for a registered asset
    pub fn quote(&self, asset: Address) -> EngineResult<PriceQuote> {
        let feed = self.registry.price_feed(asset)?;
        self.prices.latest_price(feed)
    }

    pub fn usd_value(&self, asset: Address, amount: U256) -> EngineResult<U256> {
        oracle_adapter::usd_value(&self.quote(asset)?, amount)
    }

    pub fn token_amount_from_usd(&self, asset: Address, usd_amount: U256) -> EngineResult<U256> {
        oracle_adapter::token_amount_from_usd(&self.quote(asset)?, usd_amount)
    }

    /// Sum of every registered deposit valued in USD.
    ///
    /// Assets with a zero balance are skipped without consulting their feed.
    pub fn account_collateral_value(&self, user: Address) -> EngineResult<U256> {
        let mut total = U256::zero();
        for asset in self.registry.assets() {
            let balance = self.ledger.collateral_of(user, asset.token);
            if balance.is_zero() {
                continue;
            }
            let quote = self.prices.latest_price(asset.price_feed)?;
            total = checked_add(total, oracle_adapter::usd_value(&quote, balance)?)?;
        }
        Ok(total)
    }

    pub fn account_information(&self, user: Address) -> EngineResult<AccountInformation> {
        Ok(AccountInformation {
            total_dsc_minted: self.ledger.debt_of(user),
            collateral_value_usd: self.account_collateral_value(user)?,
        })
    }

    pub fn health_factor(&self, user: Address) -> EngineResult<U256> {
        let debt = self.ledger.debt_of(user);
        if debt.is_zero() {
            return Ok(U256::MAX);
        }
        calculate_health_factor(self.config, debt, self.account_collateral_value(user)?)
    }

    pub fn is_liquidatable(&self, user: Address) -> EngineResult<bool> {
        Ok(self.health_factor(user)? < self.config.min_health_factor)
    }

    /// Post-condition gate of every operation that adds debt or removes collateral.
    pub fn assert_solvent(&self, user: Address) -> EngineResult<()> {
        let health_factor = self.health_factor(user)?;
        if health_factor < self.config.min_health_factor {
            return Err(DscError::HealthFactorBroken { health_factor });
        }
        Ok(())
    }
}
