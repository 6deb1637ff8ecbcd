//! Common types and fixed-point constants used across the engine.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DscError;

/// Fixed-point scale for amounts, USD values and health factors (1e18)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Decimals of the fixed-point scale
pub const PRECISION_DECIMALS: u8 = 18;

/// Decimals of a standard USD price feed answer
pub const FEED_DECIMALS: u8 = 8;

/// Scale lifting an 8-decimal feed answer to `PRECISION` (1e10)
pub const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000;

/// Share of nominal collateral value counted toward solvency (50 / 100)
pub const LIQUIDATION_THRESHOLD: u32 = 50;

/// Extra collateral awarded to liquidators (10 / 100)
pub const LIQUIDATION_BONUS: u32 = 10;

/// Denominator for threshold and bonus
pub const LIQUIDATION_PRECISION: u32 = 100;

/// Minimum health factor: 1.0 in `PRECISION` scale
pub const MIN_HEALTH_FACTOR: u128 = PRECISION;

/// Engine parameters, fixed at construction
#[odra::odra_type]
#[derive(Copy)]
pub struct EngineConfig {
    /// Numerator of the collateral share counted toward solvency
    pub liquidation_threshold: u32,
    /// Numerator of the liquidator bonus
    pub liquidation_bonus: u32,
    /// Denominator for threshold and bonus
    pub liquidation_precision: u32,
    /// Health factor below which an account is liquidatable (1e18 scale)
    pub min_health_factor: U256,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            liquidation_threshold: LIQUIDATION_THRESHOLD,
            liquidation_bonus: LIQUIDATION_BONUS,
            liquidation_precision: LIQUIDATION_PRECISION,
            min_health_factor: U256::from(MIN_HEALTH_FACTOR),
        }
    }
}

impl EngineConfig {
    /// Rejects parameter sets the solvency math cannot work with.
    pub fn validate(&self) -> Result<(), DscError> {
        if self.liquidation_precision == 0
            || self.liquidation_threshold == 0
            || self.liquidation_threshold > self.liquidation_precision
            || self.min_health_factor.is_zero()
        {
            return Err(DscError::InvalidConfig);
        }
        Ok(())
    }
}

/// Latest quote returned by a price feed
#[odra::odra_type]
#[derive(Copy)]
pub struct PriceQuote {
    /// USD price of one whole asset unit, scaled by `10^decimals`
    pub answer: U256,
    /// Decimals of `answer`
    pub decimals: u8,
    /// Validity flag reported by the feed (staleness is not judged here)
    pub is_valid: bool,
}

/// Aggregate view of a user's position
#[odra::odra_type]
#[derive(Copy, Default)]
pub struct AccountInformation {
    /// Stable units minted and not yet burned
    pub total_dsc_minted: U256,
    /// Sum of deposited collateral valued in USD (1e18)
    pub collateral_value_usd: U256,
}

/// Result of a successful liquidation
#[odra::odra_type]
#[derive(Copy)]
pub struct LiquidationOutcome {
    /// Account whose debt was covered
    pub target: Address,
    /// Caller that supplied the stable units
    pub liquidator: Address,
    /// Collateral asset seized
    pub collateral_asset: Address,
    /// Stable units repaid and burned
    pub debt_covered: U256,
    /// Collateral moved to the liquidator, bonus included
    pub collateral_seized: U256,
    /// Bonus part of `collateral_seized`
    pub bonus_collateral: U256,
    /// Target health factor before the liquidation
    pub starting_health_factor: U256,
    /// Target health factor after the liquidation
    pub ending_health_factor: U256,
}
