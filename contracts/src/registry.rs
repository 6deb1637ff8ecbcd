//! Supported collateral asset registry.
//!
//! Ordered list of collateral assets, each bound to the price feed that
//! values it. Built once from parallel lists and never mutated afterward.

use odra::prelude::*;
use crate::errors::DscError;

/// A registered collateral asset and its feed
#[odra::odra_type]
#[derive(Copy)]
pub struct CollateralAsset {
    /// Collateral token address
    pub token: Address,
    /// Price feed reference for the token
    pub price_feed: Address,
}

/// Immutable registry of accepted collateral
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRegistry {
    assets: Vec<CollateralAsset>,
}

impl AssetRegistry {
    /// Build the registry from parallel token / feed lists.
    pub fn new(tokens: &[Address], price_feeds: &[Address]) -> Result<Self, DscError> {
        if tokens.len() != price_feeds.len() {
            return Err(DscError::ConfigurationLengthMismatch);
        }

        let mut assets: Vec<CollateralAsset> = Vec::with_capacity(tokens.len());
        for (token, price_feed) in tokens.iter().zip(price_feeds.iter()) {
            if assets.iter().any(|a| a.token == *token) {
                return Err(DscError::DuplicateAsset);
            }
            assets.push(CollateralAsset { token: *token, price_feed: *price_feed });
        }

        Ok(Self { assets })
    }

    /// Price feed of a registered asset
    pub fn price_feed(&self, token: Address) -> Result<Address, DscError> {
        self.assets
            .iter()
            .find(|a| a.token == token)
            .map(|a| a.price_feed)
            .ok_or(DscError::UnsupportedAsset)
    }

    /// Fails with `UnsupportedAsset` unless `token` is registered
    pub fn require_supported(&self, token: Address) -> Result<(), DscError> {
        self.price_feed(token).map(|_| ())
    }

    /// Registered tokens in registration order
    pub fn tokens(&self) -> Vec<Address> {
        self.assets.iter().map(|a| a.token).collect()
    }

    pub fn assets(&self) -> &[CollateralAsset] {
        &self.assets
    }
}
