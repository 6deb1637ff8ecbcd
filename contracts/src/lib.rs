//! DSC Engine Contracts
//!
//! Over-collateralized stable unit (DSC) engine for Casper.
//!
//! ## Architecture
//!
//! - **Engine core** (`engine`, `solvency`, `ledger`): deposit, mint, burn,
//!   redeem and liquidation as atomic transitions over the collateral and
//!   debt ledgers, gated by the health factor
//! - **DscEngine**: Odra contract exposing the core, with storage-backed
//!   ledgers and a reentrancy lock
//! - **DecentralizedStableCoin**: CEP-18 stable unit, mint/burn owned by the engine
//! - **PriceFeed**: aggregator-style USD feed read through `latest_round_data`
//! - **CollateralToken**: mintable CEP-18 collateral for test networks
//!
//! ## Solvency
//!
//! Only `LIQUIDATION_THRESHOLD / LIQUIDATION_PRECISION` (50%) of collateral
//! value counts toward backing. An account whose health factor falls below
//! 1.0 may be liquidated for a 10% collateral bonus.

#![cfg_attr(target_arch = "wasm32", no_std)]

extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod interfaces;
pub mod math;
pub mod events;

// Engine core
pub mod registry;
pub mod ledger;
pub mod oracle_adapter;
pub mod solvency;
pub mod engine;

// Contract modules
pub mod dsc_engine;
pub mod stablecoin;
pub mod price_feed;
pub mod collateral_token;
pub mod token_adapter;
pub mod cep18;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
#[cfg(any(test, feature = "testing"))]
pub mod reentrant_token;
