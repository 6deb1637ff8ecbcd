//! CEP-18 named keys and dictionary layout.
//!
//! Wallets and indexers read token state straight from the contract's named
//! keys, so the in-repo tokens mirror their Odra storage into them.

use odra::prelude::*;
use odra::casper_types::{Key, U256};
use odra::casper_types::bytesrepr::ToBytes;
use odra::ContractEnv;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

pub const NAME_KEY: &str = "name";
pub const SYMBOL_KEY: &str = "symbol";
pub const DECIMALS_KEY: &str = "decimals";
pub const TOTAL_SUPPLY_KEY: &str = "total_supply";
pub const BALANCES_DICT: &str = "balances";
pub const ALLOWANCES_DICT: &str = "allowances";

/// Create the named keys and dictionaries of a fresh token
pub fn init_named_keys(env: &ContractEnv, name: &str, symbol: &str, decimals: u8) {
    env.init_dictionary(BALANCES_DICT);
    env.init_dictionary(ALLOWANCES_DICT);
    env.set_named_value(NAME_KEY, String::from(name));
    env.set_named_value(SYMBOL_KEY, String::from(symbol));
    env.set_named_value(DECIMALS_KEY, decimals);
    env.set_named_value(TOTAL_SUPPLY_KEY, U256::zero());
}

pub fn write_balance(env: &ContractEnv, owner: Address, amount: U256) {
    let key = balance_key(owner);
    env.set_dictionary_value(BALANCES_DICT, key.as_bytes(), amount);
}

pub fn write_allowance(env: &ContractEnv, owner: Address, spender: Address, amount: U256) {
    let key = allowance_key(owner, spender);
    env.set_dictionary_value(ALLOWANCES_DICT, key.as_bytes(), amount);
}

pub fn write_total_supply(env: &ContractEnv, amount: U256) {
    env.set_named_value(TOTAL_SUPPLY_KEY, amount);
}

/// Dictionary item key of an owner's balance: base64 of the serialized `Key`
pub fn balance_key(owner: Address) -> String {
    BASE64_STANDARD.encode(key_bytes(owner))
}

/// Dictionary item key of an allowance: base64 of owner bytes then spender bytes
pub fn allowance_key(owner: Address, spender: Address) -> String {
    let mut bytes = key_bytes(owner);
    bytes.extend_from_slice(&key_bytes(spender));
    BASE64_STANDARD.encode(bytes)
}

fn key_bytes(address: Address) -> Vec<u8> {
    Key::from(address).to_bytes().unwrap_or_default()
}
