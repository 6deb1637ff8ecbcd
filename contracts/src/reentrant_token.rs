//! Collateral token that calls back into the engine from `transfer_from`.
//!
//! Used to check that the engine refuses nested mutating calls.

use odra::prelude::*;
use odra::casper_types::{U256, runtime_args};
use odra::CallDef;

#[odra::module]
pub struct ReentrantToken {
    engine: Var<Address>,
}

#[odra::module]
impl ReentrantToken {
    /// Engine to call back into
    pub fn set_engine(&mut self, engine: Address) {
        self.engine.set(engine);
    }

    /// Deposits this token into the engine again before reporting success
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let _ = (owner, recipient);
        if let Some(engine) = self.engine.get() {
            let args = runtime_args! {
                "token_collateral_address" => self.env().self_address(),
                "amount_collateral" => amount
            };
            let call_def = CallDef::new("deposit_collateral", true, args);
            self.env().call_contract::<()>(engine, call_def);
        }
        true
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let _ = (recipient, amount);
        true
    }
}
