//! Token adapters
//!
//! Cross-contract callers that plug CEP-18 tokens into the engine core:
//! - [`Cep18Transfers`] moves collateral through `transfer_from` / `transfer`
//! - [`StableUnitClient`] drives the stable unit's `mint` / `burn` / `transfer_from` / `transfer`
//!
//! The engine contract is the caller of every call made here, so
//! `transfer_from` spends the allowance users granted to the engine.

use odra::prelude::*;
use odra::casper_types::{U256, runtime_args};
use odra::{CallDef, ContractEnv};
use crate::interfaces::{AssetTransfer, StableUnitIssuer};

/// Collateral movements against CEP-18 token contracts
pub struct Cep18Transfers<'a> {
    env: &'a ContractEnv,
}

impl<'a> Cep18Transfers<'a> {
    pub fn new(env: &'a ContractEnv) -> Self {
        Self { env }
    }
}

impl AssetTransfer for Cep18Transfers<'_> {
    fn transfer_in(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> bool {
        cep18_transfer_from(self.env, asset, from, to, amount)
    }

    fn transfer_out(&mut self, asset: Address, to: Address, amount: U256) -> bool {
        cep18_transfer(self.env, asset, to, amount)
    }
}

/// Stable unit contract owned by the engine
pub struct StableUnitClient<'a> {
    env: &'a ContractEnv,
    stable_unit: Address,
}

impl<'a> StableUnitClient<'a> {
    pub fn new(env: &'a ContractEnv, stable_unit: Address) -> Self {
        Self { env, stable_unit }
    }
}

impl StableUnitIssuer for StableUnitClient<'_> {
    fn mint(&mut self, to: Address, amount: U256) -> bool {
        let args = runtime_args! {
            "to" => to,
            "amount" => amount
        };
        let call_def = CallDef::new("mint", true, args);
        self.env.call_contract(self.stable_unit, call_def)
    }

    fn burn(&mut self, amount: U256) {
        let args = runtime_args! {
            "amount" => amount
        };
        let call_def = CallDef::new("burn", true, args);
        self.env.call_contract::<()>(self.stable_unit, call_def)
    }

    fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        cep18_transfer_from(self.env, self.stable_unit, from, to, amount)
    }

    fn transfer_out(&mut self, to: Address, amount: U256) -> bool {
        cep18_transfer(self.env, self.stable_unit, to, amount)
    }
}

fn cep18_transfer_from(env: &ContractEnv, token: Address, owner: Address, recipient: Address, amount: U256) -> bool {
    let args = runtime_args! {
        "owner" => owner,
        "recipient" => recipient,
        "amount" => amount
    };
    let call_def = CallDef::new("transfer_from", true, args);
    env.call_contract(token, call_def)
}

fn cep18_transfer(env: &ContractEnv, token: Address, recipient: Address, amount: U256) -> bool {
    let args = runtime_args! {
        "recipient" => recipient,
        "amount" => amount
    };
    let call_def = CallDef::new("transfer", true, args);
    env.call_contract(token, call_def)
}
