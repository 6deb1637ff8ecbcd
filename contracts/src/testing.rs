//! In-memory collaborators for driving the engine core without a VM.

use alloc::collections::BTreeMap;
use odra::prelude::*;
use odra::casper_types::account::AccountHash;
use odra::casper_types::U256;
use crate::engine::Engine;
use crate::errors::DscError;
use crate::interfaces::{AssetTransfer, EngineResult, PriceResolver, StableUnitIssuer};
use crate::ledger::MemoryLedger;
use crate::types::PriceQuote;

/// Engine wired to the in-memory collaborators
pub type TestEngine = Engine<MemoryLedger, MockPriceFeeds, MockTransfers, MockStableUnit>;

/// Deterministic account address
pub fn addr(n: u8) -> Address {
    Address::Account(AccountHash::new([n; 32]))
}

/// Settable price feeds. An unknown feed is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockPriceFeeds {
    quotes: BTreeMap<Address, PriceQuote>,
}

impl MockPriceFeeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&mut self, feed: Address, answer: U256, decimals: u8) {
        self.set_quote(feed, PriceQuote { answer, decimals, is_valid: !answer.is_zero() });
    }

    pub fn set_quote(&mut self, feed: Address, quote: PriceQuote) {
        self.quotes.insert(feed, quote);
    }

    pub fn remove(&mut self, feed: Address) {
        self.quotes.remove(&feed);
    }
}

impl PriceResolver for MockPriceFeeds {
    fn latest_price(&self, feed: Address) -> EngineResult<PriceQuote> {
        self.quotes.get(&feed).copied().ok_or(DscError::PriceUnavailable)
    }
}

/// Token balances for every collateral asset.
///
/// `transfer_out` pays from the engine's own balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTransfers {
    engine: Address,
    balances: BTreeMap<(Address, Address), U256>,
    fail: bool,
}

impl MockTransfers {
    pub fn new(engine: Address) -> Self {
        Self {
            engine,
            balances: BTreeMap::new(),
            fail: false,
        }
    }

    /// Credit `holder` with freshly created `asset`
    pub fn mint(&mut self, asset: Address, holder: Address, amount: U256) {
        let balance = self.balance_of(asset, holder);
        self.set_balance(asset, holder, balance + amount);
    }

    pub fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.balances.get(&(asset, holder)).copied().unwrap_or_default()
    }

    /// Make every following transfer report failure
    pub fn fail_transfers(&mut self, fail: bool) {
        self.fail = fail;
    }

    fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> bool {
        if self.fail {
            return false;
        }
        let from_balance = self.balance_of(asset, from);
        if from_balance < amount {
            return false;
        }
        self.set_balance(asset, from, from_balance - amount);
        let to_balance = self.balance_of(asset, to);
        self.set_balance(asset, to, to_balance + amount);
        true
    }

    /// Zero balances are not stored, so equal holdings compare equal
    fn set_balance(&mut self, asset: Address, holder: Address, amount: U256) {
        if amount.is_zero() {
            self.balances.remove(&(asset, holder));
        } else {
            self.balances.insert((asset, holder), amount);
        }
    }
}

impl AssetTransfer for MockTransfers {
    fn transfer_in(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> bool {
        self.transfer(asset, from, to, amount)
    }

    fn transfer_out(&mut self, asset: Address, to: Address, amount: U256) -> bool {
        let engine = self.engine;
        self.transfer(asset, engine, to, amount)
    }
}

/// Stable unit ledger owned by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStableUnit {
    engine: Address,
    balances: BTreeMap<Address, U256>,
    total_supply: U256,
    fail_mint: bool,
    fail_transfer: bool,
}

impl MockStableUnit {
    pub fn new(engine: Address) -> Self {
        Self {
            engine,
            balances: BTreeMap::new(),
            total_supply: U256::zero(),
            fail_mint: false,
            fail_transfer: false,
        }
    }

    pub fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn fail_mints(&mut self, fail: bool) {
        self.fail_mint = fail;
    }

    pub fn fail_transfers(&mut self, fail: bool) {
        self.fail_transfer = fail;
    }

    /// Holder-initiated transfer, used to hand stable units to a liquidator
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return false;
        }
        self.set_balance(from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.set_balance(to, to_balance + amount);
        true
    }

    fn set_balance(&mut self, holder: Address, amount: U256) {
        if amount.is_zero() {
            self.balances.remove(&holder);
        } else {
            self.balances.insert(holder, amount);
        }
    }
}

impl StableUnitIssuer for MockStableUnit {
    fn mint(&mut self, to: Address, amount: U256) -> bool {
        if self.fail_mint {
            return false;
        }
        let balance = self.balance_of(to);
        self.set_balance(to, balance + amount);
        self.total_supply += amount;
        true
    }

    fn burn(&mut self, amount: U256) {
        // Panics on underflow: the engine only burns what it pulled first
        let engine = self.engine;
        let balance = self.balance_of(engine);
        self.set_balance(engine, balance - amount);
        self.total_supply -= amount;
    }

    fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        if self.fail_transfer {
            return false;
        }
        self.transfer(from, to, amount)
    }

    fn transfer_out(&mut self, to: Address, amount: U256) -> bool {
        if self.fail_transfer {
            return false;
        }
        let engine = self.engine;
        self.transfer(engine, to, amount)
    }
}
