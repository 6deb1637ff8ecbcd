//! Collateral and debt ledgers.
//!
//! Two records drive the whole engine:
//! - collateral deposits keyed by `(user, asset)`
//! - minted stable units keyed by `user`
//!
//! Storage sits behind [`LedgerView`] / [`LedgerStore`]. Every mutation made
//! by a transition goes through a [`PendingLedger`] overlay first; the
//! overlay turns into [`LedgerWrites`] that reach the store only once the
//! whole transition has succeeded.

use alloc::collections::BTreeMap;
use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DscError;

/// Read access to ledger balances
pub trait LedgerView {
    fn collateral_of(&self, user: Address, asset: Address) -> U256;
    fn debt_of(&self, user: Address) -> U256;
}

/// Write access to ledger balances
pub trait LedgerStore: LedgerView {
    fn set_collateral(&mut self, user: Address, asset: Address, amount: U256);
    fn set_debt(&mut self, user: Address, amount: U256);
}

/// In-memory ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    collateral: BTreeMap<(Address, Address), U256>,
    debt: BTreeMap<Address, U256>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerView for MemoryLedger {
    fn collateral_of(&self, user: Address, asset: Address) -> U256 {
        self.collateral.get(&(user, asset)).copied().unwrap_or(U256::zero())
    }

    fn debt_of(&self, user: Address) -> U256 {
        self.debt.get(&user).copied().unwrap_or(U256::zero())
    }
}

impl LedgerStore for MemoryLedger {
    fn set_collateral(&mut self, user: Address, asset: Address, amount: U256) {
        self.collateral.insert((user, asset), amount);
    }

    fn set_debt(&mut self, user: Address, amount: U256) {
        self.debt.insert(user, amount);
    }
}

/// Staged ledger mutations of one transition
pub struct PendingLedger<'a, V: LedgerView + ?Sized> {
    base: &'a V,
    collateral: BTreeMap<(Address, Address), U256>,
    debt: BTreeMap<Address, U256>,
}

impl<'a, V: LedgerView + ?Sized> PendingLedger<'a, V> {
    pub fn new(base: &'a V) -> Self {
        Self {
            base,
            collateral: BTreeMap::new(),
            debt: BTreeMap::new(),
        }
    }

    /// Deposit balance as seen by this transition
    pub fn balance_of(&self, user: Address, asset: Address) -> U256 {
        self.collateral_of(user, asset)
    }

    pub fn increase_deposit(&mut self, user: Address, asset: Address, amount: U256) -> Result<(), DscError> {
        require_positive(amount)?;
        let current = self.collateral_of(user, asset);
        let updated = current.checked_add(amount).ok_or(DscError::ArithmeticOverflow)?;
        self.collateral.insert((user, asset), updated);
        Ok(())
    }

    pub fn decrease_deposit(&mut self, user: Address, asset: Address, amount: U256) -> Result<(), DscError> {
        require_positive(amount)?;
        let current = self.collateral_of(user, asset);
        if current < amount {
            return Err(DscError::InsufficientCollateral);
        }
        self.collateral.insert((user, asset), current - amount);
        Ok(())
    }

    pub fn increase_debt(&mut self, user: Address, amount: U256) -> Result<(), DscError> {
        require_positive(amount)?;
        let current = self.debt_of(user);
        let updated = current.checked_add(amount).ok_or(DscError::ArithmeticOverflow)?;
        self.debt.insert(user, updated);
        Ok(())
    }

    pub fn decrease_debt(&mut self, user: Address, amount: U256) -> Result<(), DscError> {
        require_positive(amount)?;
        let current = self.debt_of(user);
        if current < amount {
            return Err(DscError::InternalAccountingError);
        }
        self.debt.insert(user, current - amount);
        Ok(())
    }

    /// Detach the staged values from the base view
    pub fn into_writes(self) -> LedgerWrites {
        LedgerWrites {
            collateral: self.collateral.into_iter().collect(),
            debt: self.debt.into_iter().collect(),
        }
    }
}

impl<V: LedgerView + ?Sized> LedgerView for PendingLedger<'_, V> {
    fn collateral_of(&self, user: Address, asset: Address) -> U256 {
        match self.collateral.get(&(user, asset)) {
            Some(amount) => *amount,
            None => self.base.collateral_of(user, asset),
        }
    }

    fn debt_of(&self, user: Address) -> U256 {
        match self.debt.get(&user) {
            Some(amount) => *amount,
            None => self.base.debt_of(user),
        }
    }
}

/// Final balances produced by a successful transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerWrites {
    collateral: Vec<((Address, Address), U256)>,
    debt: Vec<(Address, U256)>,
}

impl LedgerWrites {
    pub fn apply<S: LedgerStore + ?Sized>(self, store: &mut S) {
        for ((user, asset), amount) in self.collateral {
            store.set_collateral(user, asset, amount);
        }
        for (user, amount) in self.debt {
            store.set_debt(user, amount);
        }
    }
}

fn require_positive(amount: U256) -> Result<(), DscError> {
    if amount.is_zero() {
        return Err(DscError::InvalidAmount);
    }
    Ok(())
}
