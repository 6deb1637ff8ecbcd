//! DSC Stablecoin Contract
//!
//! CEP-18 compatible stable unit. Minting and burning are restricted to the
//! owner; after deployment ownership is handed to the DSC engine so only the
//! engine can change supply.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::cep18;
use crate::errors::DscError;

const TOKEN_NAME: &str = "DecentralizedStableCoin";
const TOKEN_SYMBOL: &str = "DSC";
const TOKEN_DECIMALS: u8 = 18;

/// DSC Stablecoin Contract
#[odra::module]
pub struct DecentralizedStableCoin {
    /// Total supply
    total_supply: Var<U256>,
    /// Balance mapping
    balances: Mapping<Address, U256>,
    /// Allowance mapping (owner, spender) -> amount
    allowances: Mapping<(Address, Address), U256>,
    /// Sole account allowed to mint and burn
    owner: Var<Address>,
}

#[odra::module]
impl DecentralizedStableCoin {
    /// Initialize the stablecoin; the deployer becomes owner
    pub fn init(&mut self) {
        self.total_supply.set(U256::zero());
        self.owner.set(self.env().caller());
        cep18::init_named_keys(&self.env(), TOKEN_NAME, TOKEN_SYMBOL, TOKEN_DECIMALS);
    }

    // ========== CEP-18 Standard Functions ==========

    pub fn name(&self) -> String {
        String::from(TOKEN_NAME)
    }

    pub fn symbol(&self) -> String {
        String::from(TOKEN_SYMBOL)
    }

    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
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
        self.transfer_internal(sender, recipient, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.approve_internal(owner, spender, amount);
        true
    }

    /// Spend `owner`'s allowance to the caller
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();
        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            self.env().revert(DscError::InsufficientAllowance);
        }

        self.transfer_internal(owner, recipient, amount);
        self.approve_internal(owner, spender, current_allowance - amount);
        true
    }

    // ========== Owner Functions ==========

    /// Mint new units to `to` (owner only)
    pub fn mint(&mut self, to: Address, amount: U256) -> bool {
        self.require_owner();
        if amount.is_zero() {
            self.env().revert(DscError::InvalidAmount);
        }

        let new_balance = self.balance_of(to) + amount;
        self.balances.set(&to, new_balance);
        cep18::write_balance(&self.env(), to, new_balance);

        let new_supply = self.total_supply() + amount;
        self.total_supply.set(new_supply);
        cep18::write_total_supply(&self.env(), new_supply);
        true
    }

    /// Burn units held by the owner
    pub fn burn(&mut self, amount: U256) {
        self.require_owner();
        if amount.is_zero() {
            self.env().revert(DscError::InvalidAmount);
        }

        let owner = self.env().caller();
        let current_balance = self.balance_of(owner);
        if current_balance < amount {
            self.env().revert(DscError::InsufficientTokenBalance);
        }

        let new_balance = current_balance - amount;
        self.balances.set(&owner, new_balance);
        cep18::write_balance(&self.env(), owner, new_balance);

        let new_supply = self.total_supply() - amount;
        self.total_supply.set(new_supply);
        cep18::write_total_supply(&self.env(), new_supply);
    }

    pub fn owner(&self) -> Option<Address> {
        self.owner.get()
    }

    /// Hand mint/burn rights to `new_owner` (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        self.owner.set(new_owner);
    }

    // ========== Internal Functions ==========

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(DscError::InsufficientTokenBalance);
        }

        let new_from_balance = from_balance - amount;
        self.balances.set(&from, new_from_balance);
        cep18::write_balance(&self.env(), from, new_from_balance);

        let new_to_balance = self.balance_of(to) + amount;
        self.balances.set(&to, new_to_balance);
        cep18::write_balance(&self.env(), to, new_to_balance);
    }

    fn approve_internal(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        cep18::write_allowance(&self.env(), owner, spender, amount);
    }

    fn require_owner(&self) {
        if self.owner.get() != Some(self.env().caller()) {
            self.env().revert(DscError::Unauthorized);
        }
    }
}
