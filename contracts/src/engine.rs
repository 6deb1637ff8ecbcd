//! DSC engine core: position operations and liquidation.
//!
//! Every operation is one transition:
//! 1. Stage ledger mutations on a [`PendingLedger`] overlay
//! 2. Run the solvency gates against the staged balances
//! 3. Dispatch external effects (inbound pulls first, then payouts)
//! 4. Commit the staged balances and publish events
//!
//! A failure at any step returns the error with the ledger untouched and no
//! events recorded. External effects never run for a transition that fails
//! its checks, and a failing effect reverses the ones dispatched before it.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DscError;
use crate::events::EngineEvent;
use crate::interfaces::{AssetTransfer, EngineResult, PriceResolver, StableUnitIssuer};
use crate::ledger::{LedgerStore, LedgerView, LedgerWrites, PendingLedger};
use crate::math::{checked_add, mul_div};
use crate::registry::AssetRegistry;
use crate::solvency::{self, Solvency};
use crate::types::{AccountInformation, EngineConfig, LiquidationOutcome};

/// Fixed parameters of an engine instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineParams {
    /// Accepted collateral and its feeds
    pub registry: AssetRegistry,
    pub config: EngineConfig,
    /// Address holding deposited collateral and pulled stable units
    pub engine_address: Address,
    /// Stable unit token
    pub stable_unit: Address,
}

/// External effect recorded by a transition, dispatched after its checks pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    CollateralIn { token: Address, from: Address, amount: U256 },
    CollateralOut { token: Address, to: Address, amount: U256 },
    StableIn { from: Address, amount: U256 },
    StableBurn { amount: U256 },
    StableMint { to: Address, amount: U256 },
}

impl Effect {
    fn is_inbound(&self) -> bool {
        matches!(
            self,
            Effect::CollateralIn { .. } | Effect::StableIn { .. } | Effect::StableBurn { .. }
        )
    }
}

struct Transition<'a, S: LedgerView + ?Sized> {
    ledger: PendingLedger<'a, S>,
    effects: Vec<Effect>,
    events: Vec<EngineEvent>,
}

impl<'a, S: LedgerView + ?Sized> Transition<'a, S> {
    fn new(base: &'a S) -> Self {
        Self {
            ledger: PendingLedger::new(base),
            effects: Vec::new(),
            events: Vec::new(),
        }
    }

    fn finish(self) -> (LedgerWrites, Vec<Effect>, Vec<EngineEvent>) {
        let (mut inbound, outbound): (Vec<Effect>, Vec<Effect>) =
            self.effects.into_iter().partition(Effect::is_inbound);
        inbound.extend(outbound);
        (self.ledger.into_writes(), inbound, self.events)
    }
}

/// Over-collateralized stable unit engine
pub struct Engine<S, P, T, I> {
    registry: AssetRegistry,
    config: EngineConfig,
    engine_address: Address,
    stable_unit: Address,
    ledger: S,
    prices: P,
    transfers: T,
    issuer: I,
    events: Vec<EngineEvent>,
}

impl<S, P, T, I> Engine<S, P, T, I>
where
    S: LedgerStore,
    P: PriceResolver,
    T: AssetTransfer,
    I: StableUnitIssuer,
{
    pub fn new(params: EngineParams, ledger: S, prices: P, transfers: T, issuer: I) -> EngineResult<Self> {
        params.config.validate()?;
        Ok(Self {
            registry: params.registry,
            config: params.config,
            engine_address: params.engine_address,
            stable_unit: params.stable_unit,
            ledger,
            prices,
            transfers,
            issuer,
            events: Vec::new(),
        })
    }

    // ========== Position Operations ==========

    /// Lock `amount` of `token` as collateral for `user`.
    pub fn deposit_collateral(&mut self, user: Address, token: Address, amount: U256) -> EngineResult<()> {
        self.run(|engine, tx| engine.stage_deposit(tx, user, token, amount))
    }

    /// Withdraw `amount` of `token` back to `user`. The remaining position must stay solvent.
    pub fn redeem_collateral(&mut self, user: Address, token: Address, amount: U256) -> EngineResult<()> {
        self.run(|engine, tx| engine.stage_redeem(tx, token, amount, user, user))
    }

    /// Mint `amount` stable units to `user` against their collateral.
    pub fn mint_dsc(&mut self, user: Address, amount: U256) -> EngineResult<()> {
        self.run(|engine, tx| engine.stage_mint(tx, user, amount))
    }

    /// Repay `amount` of `user`'s debt with stable units `user` holds.
    pub fn burn_dsc(&mut self, user: Address, amount: U256) -> EngineResult<()> {
        self.run(|engine, tx| {
            engine.stage_burn(tx, amount, user, user)?;
            // Burning only lowers debt; a failure here means the ledger is corrupt
            engine.solvency(&tx.ledger).assert_solvent(user)
        })
    }

    pub fn deposit_collateral_and_mint_dsc(
        &mut self,
        user: Address,
        token: Address,
        amount_collateral: U256,
        amount_dsc: U256,
    ) -> EngineResult<()> {
        self.run(|engine, tx| {
            engine.stage_deposit(tx, user, token, amount_collateral)?;
            engine.stage_mint(tx, user, amount_dsc)
        })
    }

    pub fn redeem_collateral_for_dsc(
        &mut self,
        user: Address,
        token: Address,
        amount_collateral: U256,
        amount_dsc: U256,
    ) -> EngineResult<()> {
        self.run(|engine, tx| {
            engine.stage_burn(tx, amount_dsc, user, user)?;
            engine.stage_redeem(tx, token, amount_collateral, user, user)
        })
    }

    // ========== Liquidation ==========

    /// Cover `debt_to_cover` of `target`'s debt and seize the equivalent
    /// collateral plus the liquidation bonus.
    ///
    /// The bonus is not capped: once the target is at or below 100% backing
    /// the seizure fails with `InsufficientCollateral`.
    pub fn liquidate(
        &mut self,
        liquidator: Address,
        token: Address,
        target: Address,
        debt_to_cover: U256,
    ) -> EngineResult<LiquidationOutcome> {
        self.run(|engine, tx| engine.stage_liquidation(tx, liquidator, token, target, debt_to_cover))
    }

    // ========== Query Functions ==========

    pub fn health_factor(&self, user: Address) -> EngineResult<U256> {
        self.solvency(&self.ledger).health_factor(user)
    }

    pub fn is_liquidatable(&self, user: Address) -> EngineResult<bool> {
        self.solvency(&self.ledger).is_liquidatable(user)
    }

    pub fn account_collateral_value_usd(&self, user: Address) -> EngineResult<U256> {
        self.solvency(&self.ledger).account_collateral_value(user)
    }

    pub fn account_information(&self, user: Address) -> EngineResult<AccountInformation> {
        self.solvency(&self.ledger).account_information(user)
    }

    pub fn usd_value(&self, token: Address, amount: U256) -> EngineResult<U256> {
        self.solvency(&self.ledger).usd_value(token, amount)
    }

    pub fn token_amount_from_usd(&self, token: Address, usd_amount: U256) -> EngineResult<U256> {
        self.solvency(&self.ledger).token_amount_from_usd(token, usd_amount)
    }

    pub fn calculate_health_factor(&self, total_dsc_minted: U256, collateral_value_usd: U256) -> EngineResult<U256> {
        solvency::calculate_health_factor(&self.config, total_dsc_minted, collateral_value_usd)
    }

    pub fn collateral_balance_of(&self, user: Address, token: Address) -> EngineResult<U256> {
        self.registry.require_supported(token)?;
        Ok(self.ledger.collateral_of(user, token))
    }

    pub fn collateral_price_feed(&self, token: Address) -> EngineResult<Address> {
        self.registry.price_feed(token)
    }

    pub fn collateral_tokens(&self) -> Vec<Address> {
        self.registry.tokens()
    }

    pub fn debt_of(&self, user: Address) -> U256 {
        self.ledger.debt_of(user)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stable_unit(&self) -> Address {
        self.stable_unit
    }

    pub fn engine_address(&self) -> Address {
        self.engine_address
    }

    pub fn ledger(&self) -> &S {
        &self.ledger
    }

    pub fn prices(&self) -> &P {
        &self.prices
    }

    pub fn prices_mut(&mut self) -> &mut P {
        &mut self.prices
    }

    pub fn transfers(&self) -> &T {
        &self.transfers
    }

    pub fn transfers_mut(&mut self) -> &mut T {
        &mut self.transfers
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    pub fn issuer_mut(&mut self) -> &mut I {
        &mut self.issuer
    }

    /// Drain events of committed transitions, oldest first
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        core::mem::take(&mut self.events)
    }

    // ========== Internal Functions ==========

    fn solvency<'s, L: LedgerView + ?Sized>(&'s self, ledger: &'s L) -> Solvency<'s, L, P> {
        Solvency::new(ledger, &self.registry, &self.prices, &self.config)
    }

    fn run<R>(
        &mut self,
        stage: impl FnOnce(&Self, &mut Transition<'_, S>) -> EngineResult<R>,
    ) -> EngineResult<R> {
        let (value, writes, effects, events) = {
            let mut tx = Transition::new(&self.ledger);
            let value = stage(self, &mut tx)?;
            let (writes, effects, events) = tx.finish();
            (value, writes, effects, events)
        };

        self.dispatch(effects)?;
        writes.apply(&mut self.ledger);
        self.events.extend(events);
        Ok(value)
    }

    /// Run `effects` in order. When one fails, the ones already applied are
    /// reversed newest first before the error is returned.
    fn dispatch(&mut self, effects: Vec<Effect>) -> EngineResult<()> {
        for (applied, effect) in effects.iter().enumerate() {
            if let Err(err) = self.apply_effect(*effect) {
                for done in effects[..applied].iter().rev() {
                    if !self.reverse_effect(*done) {
                        return Err(DscError::InternalAccountingError);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn apply_effect(&mut self, effect: Effect) -> EngineResult<()> {
        let done = match effect {
            Effect::CollateralIn { token, from, amount } => {
                self.transfers.transfer_in(token, from, self.engine_address, amount)
            }
            Effect::CollateralOut { token, to, amount } => self.transfers.transfer_out(token, to, amount),
            Effect::StableIn { from, amount } => self.issuer.transfer_from(from, self.engine_address, amount),
            Effect::StableBurn { amount } => {
                self.issuer.burn(amount);
                true
            }
            Effect::StableMint { to, amount } => {
                if !self.issuer.mint(to, amount) {
                    return Err(DscError::MintFailed);
                }
                true
            }
        };
        if !done {
            return Err(DscError::TransferFailed);
        }
        Ok(())
    }

    /// Undo an applied effect. Inbound effects are undone from funds the engine holds.
    fn reverse_effect(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::CollateralIn { token, from, amount } => self.transfers.transfer_out(token, from, amount),
            Effect::CollateralOut { token, to, amount } => {
                self.transfers.transfer_in(token, to, self.engine_address, amount)
            }
            Effect::StableIn { from, amount } => self.issuer.transfer_out(from, amount),
            Effect::StableBurn { amount } => self.issuer.mint(self.engine_address, amount),
            Effect::StableMint { to, amount } => {
                if !self.issuer.transfer_from(to, self.engine_address, amount) {
                    return false;
                }
                self.issuer.burn(amount);
                true
            }
        }
    }

    fn stage_deposit(
        &self,
        tx: &mut Transition<'_, S>,
        user: Address,
        token: Address,
        amount: U256,
    ) -> EngineResult<()> {
        if amount.is_zero() {
            return Err(DscError::InvalidAmount);
        }
        self.registry.require_supported(token)?;

        tx.ledger.increase_deposit(user, token, amount)?;
        tx.effects.push(Effect::CollateralIn { token, from: user, amount });
        tx.events.push(EngineEvent::CollateralDeposited { user, token, amount });
        Ok(())
    }

    fn stage_redeem(
        &self,
        tx: &mut Transition<'_, S>,
        token: Address,
        amount: U256,
        from: Address,
        to: Address,
    ) -> EngineResult<()> {
        self.stage_collateral_release(tx, token, amount, from, to)?;
        self.solvency(&tx.ledger).assert_solvent(from)
    }

    /// Move deposited collateral out without the solvency gate (liquidation seizes from an unsafe account).
    fn stage_collateral_release(
        &self,
        tx: &mut Transition<'_, S>,
        token: Address,
        amount: U256,
        from: Address,
        to: Address,
    ) -> EngineResult<()> {
        if amount.is_zero() {
            return Err(DscError::InvalidAmount);
        }
        self.registry.require_supported(token)?;

        tx.ledger.decrease_deposit(from, token, amount)?;
        tx.effects.push(Effect::CollateralOut { token, to, amount });
        tx.events.push(EngineEvent::CollateralRedeemed { from, to, token, amount });
        Ok(())
    }

    fn stage_mint(&self, tx: &mut Transition<'_, S>, user: Address, amount: U256) -> EngineResult<()> {
        if amount.is_zero() {
            return Err(DscError::InvalidAmount);
        }

        tx.ledger.increase_debt(user, amount)?;
        self.solvency(&tx.ledger).assert_solvent(user)?;
        tx.effects.push(Effect::StableMint { to: user, amount });
        tx.events.push(EngineEvent::DscMinted { user, amount });
        Ok(())
    }

    /// Reduce `on_behalf_of`'s debt with stable units supplied by `payer`.
    fn stage_burn(
        &self,
        tx: &mut Transition<'_, S>,
        amount: U256,
        on_behalf_of: Address,
        payer: Address,
    ) -> EngineResult<()> {
        if amount.is_zero() {
            return Err(DscError::InvalidAmount);
        }

        tx.ledger.decrease_debt(on_behalf_of, amount)?;
        tx.effects.push(Effect::StableIn { from: payer, amount });
        tx.effects.push(Effect::StableBurn { amount });
        tx.events.push(EngineEvent::DscBurned { on_behalf_of, payer, amount });
        Ok(())
    }

    fn stage_liquidation(
        &self,
        tx: &mut Transition<'_, S>,
        liquidator: Address,
        token: Address,
        target: Address,
        debt_to_cover: U256,
    ) -> EngineResult<LiquidationOutcome> {
        if debt_to_cover.is_zero() {
            return Err(DscError::InvalidAmount);
        }
        self.registry.require_supported(token)?;

        let starting_health_factor = self.solvency(&tx.ledger).health_factor(target)?;
        if starting_health_factor >= self.config.min_health_factor {
            return Err(DscError::HealthFactorOk);
        }

        // Collateral worth `debt_to_cover`, plus the bonus on top
        let token_amount = self.solvency(&tx.ledger).token_amount_from_usd(token, debt_to_cover)?;
        let bonus_collateral = mul_div(
            token_amount,
            U256::from(self.config.liquidation_bonus),
            U256::from(self.config.liquidation_precision),
        )?;
        let collateral_seized = checked_add(token_amount, bonus_collateral)?;

        self.stage_collateral_release(tx, token, collateral_seized, target, liquidator)?;
        self.stage_burn(tx, debt_to_cover, target, liquidator)?;

        let ending_health_factor = self.solvency(&tx.ledger).health_factor(target)?;
        if ending_health_factor <= starting_health_factor {
            return Err(DscError::HealthFactorNotImproved);
        }
        self.solvency(&tx.ledger).assert_solvent(liquidator)?;

        tx.events.push(EngineEvent::Liquidated {
            liquidator,
            user: target,
            token,
            debt_covered: debt_to_cover,
            collateral_seized,
        });

        Ok(LiquidationOutcome {
            target,
            liquidator,
            collateral_asset: token,
            debt_covered: debt_to_cover,
            collateral_seized,
            bonus_collateral,
            starting_health_factor,
            ending_health_factor,
        })
    }
}
