//! Mintable CEP-18 collateral token.
//!
//! Stands in for exogenous collateral (wrapped ETH, wrapped BTC) on test
//! networks. The deployer may mint freely.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::cep18;
use crate::errors::DscError;

#[odra::module]
pub struct CollateralToken {
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
    minter: Var<Address>,
}

#[odra::module]
impl CollateralToken {
    pub fn init(&mut self, name: String, symbol: String, decimals: u8) {
        cep18::init_named_keys(&self.env(), &name, &symbol, decimals);
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);
        self.total_supply.set(U256::zero());
        self.minter.set(self.env().caller());
    }

    pub fn name(&self) -> String {
        self.name.get().unwrap_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get().unwrap_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(18)
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or_default()
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or_default()
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        self.move_balance(sender, recipient, amount)
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.set_allowance(owner, spender, amount);
        true
    }

    /// Spend `owner`'s allowance to the caller. Returns false when the
    /// allowance or the balance is short.
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();
        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            return false;
        }
        if !self.move_balance(owner, recipient, amount) {
            return false;
        }
        self.set_allowance(owner, spender, current_allowance - amount);
        true
    }

    /// Mint to `to` (deployer only)
    pub fn mint(&mut self, to: Address, amount: U256) {
        if self.minter.get() != Some(self.env().caller()) {
            self.env().revert(DscError::Unauthorized);
        }

        let new_balance = self.balance_of(to) + amount;
        self.balances.set(&to, new_balance);
        cep18::write_balance(&self.env(), to, new_balance);

        let new_supply = self.total_supply() + amount;
        self.total_supply.set(new_supply);
        cep18::write_total_supply(&self.env(), new_supply);
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return false;
        }

        let new_from_balance = from_balance - amount;
        self.balances.set(&from, new_from_balance);
        cep18::write_balance(&self.env(), from, new_from_balance);

        let new_to_balance = self.balance_of(to) + amount;
        self.balances.set(&to, new_to_balance);
        cep18::write_balance(&self.env(), to, new_to_balance);
        true
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        cep18::write_allowance(&self.env(), owner, spender, amount);
    }
}
