//! Price Resolver adapter.
//!
//! Converts between collateral quantities and USD values at the latest feed
//! answer. Both directions run in the 1e18 scale and truncate:
//! - `usd = answer * 10^(18 - decimals) * amount / 1e18`
//! - `amount = usd * 1e18 / (answer * 10^(18 - decimals))`
//!
//! Prices are never cached and staleness is not judged here.

use odra::prelude::*;
use odra::casper_types::{U256, RuntimeArgs};
use odra::{CallDef, ContractEnv};
use crate::errors::DscError;
use crate::interfaces::{EngineResult, PriceResolver};
use crate::math::{mul_div, scale_to_precision};
use crate::price_feed::RoundData;
use crate::types::{PriceQuote, PRECISION};

/// Feed answer lifted to the 1e18 scale.
pub fn normalized_price(quote: &PriceQuote) -> EngineResult<U256> {
    let scale = scale_to_precision(quote.decimals)?;
    quote.answer.checked_mul(scale).ok_or(DscError::ArithmeticOverflow)
}

/// USD value (1e18) of `amount` units of the quoted asset.
pub fn usd_value(quote: &PriceQuote, amount: U256) -> EngineResult<U256> {
    mul_div(normalized_price(quote)?, amount, U256::from(PRECISION))
}

/// Asset quantity worth `usd_amount` (1e18) at the quoted price.
pub fn token_amount_from_usd(quote: &PriceQuote, usd_amount: U256) -> EngineResult<U256> {
    let price = normalized_price(quote)?;
    if price.is_zero() {
        return Err(DscError::PriceUnavailable);
    }
    mul_div(usd_amount, U256::from(PRECISION), price)
}

/// Reads [`crate::price_feed::PriceFeed`] contracts through cross-contract calls.
pub struct FeedPriceResolver<'a> {
    env: &'a ContractEnv,
}

impl<'a> FeedPriceResolver<'a> {
    pub fn new(env: &'a ContractEnv) -> Self {
        Self { env }
    }
}

impl PriceResolver for FeedPriceResolver<'_> {
    fn latest_price(&self, feed: Address) -> EngineResult<PriceQuote> {
        let call_def = CallDef::new("latest_round_data", false, RuntimeArgs::new());
        let round: RoundData = self.env.call_contract(feed, call_def);
        Ok(round.into_quote())
    }
}
