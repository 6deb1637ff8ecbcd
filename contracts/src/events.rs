//! Engine events.
//!
//! The core records an [`EngineEvent`] for every committed effect. Events of
//! a failed transition are dropped with it. The contract republishes each
//! one as an Odra event.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractEnv;

/// Committed effect of an engine transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    CollateralDeposited {
        user: Address,
        token: Address,
        amount: U256,
    },
    CollateralRedeemed {
        from: Address,
        to: Address,
        token: Address,
        amount: U256,
    },
    DscMinted {
        user: Address,
        amount: U256,
    },
    DscBurned {
        on_behalf_of: Address,
        payer: Address,
        amount: U256,
    },
    Liquidated {
        liquidator: Address,
        user: Address,
        token: Address,
        debt_covered: U256,
        collateral_seized: U256,
    },
}

#[odra::event]
pub struct CollateralDeposited {
    pub user: Address,
    pub token: Address,
    pub amount: U256,
}

#[odra::event]
pub struct CollateralRedeemed {
    pub from: Address,
    pub to: Address,
    pub token: Address,
    pub amount: U256,
}

#[odra::event]
pub struct DscMinted {
    pub user: Address,
    pub amount: U256,
}

#[odra::event]
pub struct DscBurned {
    pub on_behalf_of: Address,
    pub payer: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Liquidated {
    pub liquidator: Address,
    pub user: Address,
    pub token: Address,
    pub debt_covered: U256,
    pub collateral_seized: U256,
}

/// Publish an engine event on the contract's event stream
pub fn emit(env: &ContractEnv, event: EngineEvent) {
    match event {
        EngineEvent::CollateralDeposited { user, token, amount } => {
            env.emit_event(CollateralDeposited { user, token, amount })
        }
        EngineEvent::CollateralRedeemed { from, to, token, amount } => {
            env.emit_event(CollateralRedeemed { from, to, token, amount })
        }
        EngineEvent::DscMinted { user, amount } => env.emit_event(DscMinted { user, amount }),
        EngineEvent::DscBurned { on_behalf_of, payer, amount } => {
            env.emit_event(DscBurned { on_behalf_of, payer, amount })
        }
        EngineEvent::Liquidated { liquidator, user, token, debt_covered, collateral_seized } => {
            env.emit_event(Liquidated { liquidator, user, token, debt_covered, collateral_seized })
        }
    }
}
