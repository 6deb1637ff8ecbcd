//! Capability traits for the engine's external collaborators.
//!
//! The engine never talks to a feed or a token directly. The Odra contract
//! plugs in cross-contract callers, tests plug in the doubles from
//! [`crate::testing`].

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DscError;
use crate::types::PriceQuote;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, DscError>;

/// Source of the latest USD quote for a price feed reference.
pub trait PriceResolver {
    /// Read the latest quote. Must be a pure read.
    fn latest_price(&self, feed: Address) -> EngineResult<PriceQuote>;
}

/// Movement of collateral assets in and out of the engine.
pub trait AssetTransfer {
    /// Pull `amount` of `asset` from `from` to `to`.
    fn transfer_in(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> bool;
    /// Pay `amount` of `asset` held by the engine out to `to`.
    fn transfer_out(&mut self, asset: Address, to: Address, amount: U256) -> bool;
}

/// Issuance of the stable unit.
pub trait StableUnitIssuer {
    fn mint(&mut self, to: Address, amount: U256) -> bool;
    /// Burn `amount` held by the engine.
    fn burn(&mut self, amount: U256);
    fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool;
    /// Pay `amount` held by the engine out to `to`.
    fn transfer_out(&mut self, to: Address, amount: U256) -> bool;
}
