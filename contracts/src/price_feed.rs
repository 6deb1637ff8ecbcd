//! Price Feed Contract
//!
//! Aggregator-style USD feed for a single collateral asset. The owner pushes
//! answers; the engine reads `latest_round_data` and nothing else.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DscError;
use crate::types::PriceQuote;

/// Latest round reported by a feed
#[odra::odra_type]
pub struct RoundData {
    /// Monotonic round counter (0 = never answered)
    pub round_id: u64,
    /// USD price scaled by `10^decimals`
    pub answer: U256,
    /// Decimals of `answer`
    pub decimals: u8,
    /// Block time of the update
    pub updated_at: u64,
}

impl RoundData {
    pub fn into_quote(self) -> PriceQuote {
        PriceQuote {
            answer: self.answer,
            decimals: self.decimals,
            is_valid: self.round_id > 0 && !self.answer.is_zero(),
        }
    }
}

/// Price Feed Contract
#[odra::module]
pub struct PriceFeed {
    /// Address allowed to push answers
    owner: Var<Address>,
    /// Decimals of every answer
    decimals: Var<u8>,
    /// Latest answer
    answer: Var<U256>,
    /// Latest round id
    round_id: Var<u64>,
    /// Latest update time
    updated_at: Var<u64>,
}

#[odra::module]
impl PriceFeed {
    /// Initialize the feed with its first answer
    pub fn init(&mut self, decimals: u8, initial_answer: U256) {
        self.owner.set(self.env().caller());
        self.decimals.set(decimals);
        self.answer.set(initial_answer);
        self.round_id.set(1);
        self.updated_at.set(self.env().get_block_time());
    }

    /// Push a new answer (owner only)
    pub fn update_answer(&mut self, answer: U256) {
        self.require_owner();
        let round = self.round_id.get().unwrap_or(0);
        self.answer.set(answer);
        self.round_id.set(round + 1);
        self.updated_at.set(self.env().get_block_time());
    }

    /// Latest round data
    pub fn latest_round_data(&self) -> RoundData {
        RoundData {
            round_id: self.round_id.get().unwrap_or(0),
            answer: self.answer.get().unwrap_or(U256::zero()),
            decimals: self.decimals(),
            updated_at: self.updated_at.get().unwrap_or(0),
        }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(8)
    }

    fn require_owner(&self) {
        let caller = self.env().caller();
        if self.owner.get() != Some(caller) {
            self.env().revert(DscError::Unauthorized);
        }
    }
}
