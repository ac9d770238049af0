//! Stateful simulator wrapping the pure transitions.

use crate::source::{RandSource, UniformSource};
use crate::transitions::{self, ensure_phase, PurchaseOutcome};
use crate::SimError;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use venture_core::{
    validate_config, validate_state, validate_theme, DayResult, GameState, MarketingChoice,
    Phase, Theme, ThemeId, VentureConfig,
};
use venture_econ::{self as econ, EconError};

/// Price change applied by one [`PriceStep`].
pub const PRICE_STEP: i64 = 5;

/// One-click price adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceStep {
    Up,
    /// Never goes below half the reference price.
    Down,
}

/// A single-player game session.
///
/// Owns the active theme, the game state, the most recent day result and
/// the random source. Every mutating call checks the phase first and leaves
/// the state untouched when it refuses.
#[derive(Debug)]
pub struct Simulator<S> {
    theme: Theme,
    state: GameState,
    last_result: Option<DayResult>,
    source: S,
}

impl Simulator<RandSource<ChaCha8Rng>> {
    /// Session seeded from `config.rng_seed`.
    pub fn seeded(theme: ThemeId, config: &VentureConfig) -> Result<Self, SimError> {
        Self::new(theme.theme(), config, RandSource::seeded(config.rng_seed))
    }
}

impl<S: UniformSource> Simulator<S> {
    /// Day-1 session for `theme`.
    pub fn new(theme: Theme, config: &VentureConfig, source: S) -> Result<Self, SimError> {
        validate_theme(&theme)?;
        validate_config(config)?;
        let state = GameState::initial(&theme, config);
        info!(theme = %theme.name, cash = %state.cash, "session started");
        Ok(Self {
            theme,
            state,
            last_result: None,
            source,
        })
    }

    /// Resume from an existing state.
    pub fn with_state(theme: Theme, state: GameState, source: S) -> Result<Self, SimError> {
        validate_theme(&theme)?;
        validate_state(&state)?;
        Ok(Self {
            theme,
            state,
            last_result: None,
            source,
        })
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Result of the day on display; cleared when the next day starts.
    pub fn last_result(&self) -> Option<&DayResult> {
        self.last_result.as_ref()
    }

    /// Consume the session, returning its state and last result.
    pub fn into_parts(self) -> (GameState, Option<DayResult>) {
        (self.state, self.last_result)
    }

    fn check_phase(&self, expected: Phase) -> Result<(), SimError> {
        ensure_phase(&self.state, expected).map_err(|e| {
            warn!(error = %e, "rejected");
            e
        })
    }

    /// Buy stock at today's ingredient cost. Insufficient cash is reported
    /// through [`PurchaseOutcome::Rejected`], not as an error.
    pub fn buy_stock(&mut self, quantity: u64) -> Result<PurchaseOutcome, SimError> {
        self.check_phase(Phase::Preparation)?;
        let (state, outcome) = transitions::buy_stock(self.state.clone(), quantity)?;
        self.state = state;
        match &outcome {
            PurchaseOutcome::Bought { quantity, cost } => {
                debug!(quantity, %cost, stock = self.state.stock, "stock bought")
            }
            PurchaseOutcome::Rejected { needed, available } => {
                warn!(quantity, %needed, %available, "purchase rejected: insufficient cash")
            }
        }
        Ok(outcome)
    }

    pub fn set_price(&mut self, price: Decimal) -> Result<(), SimError> {
        self.check_phase(Phase::Preparation)?;
        if price < Decimal::ZERO {
            return Err(SimError::InvalidPrice(price));
        }
        debug!(%price, "price set");
        self.state.price = price;
        Ok(())
    }

    /// Move the price by [`PRICE_STEP`], returning the new price.
    pub fn nudge_price(&mut self, step: PriceStep) -> Result<Decimal, SimError> {
        let delta = Decimal::from(PRICE_STEP);
        let price = match step {
            PriceStep::Up => self.state.price.checked_add(delta),
            PriceStep::Down => {
                let floor = self.theme.reference_price * Decimal::new(5, 1);
                self.state.price.checked_sub(delta).map(|p| p.max(floor))
            }
        }
        .ok_or(EconError::Overflow)?;
        self.set_price(price)?;
        Ok(price)
    }

    pub fn set_marketing(&mut self, choice: MarketingChoice) -> Result<(), SimError> {
        self.check_phase(Phase::Preparation)?;
        debug!(marketing = choice.label(), cost = %choice.cost(), "marketing set");
        self.state.marketing = choice;
        Ok(())
    }

    /// Largest quantity affordable at today's ingredient cost.
    pub fn max_affordable(&self) -> u64 {
        econ::max_affordable(self.state.cash, self.state.ingredient_cost)
    }

    /// Per-unit margin at the current price.
    pub fn projected_margin(&self) -> Decimal {
        self.state.price - self.state.ingredient_cost
    }

    /// Whether cash covers the chosen campaign.
    pub fn can_afford_marketing(&self) -> bool {
        self.state.cash >= self.state.marketing.cost()
    }

    /// Expected demand for the current settings before the daily swing.
    pub fn forecast(&self) -> Result<f64, SimError> {
        Ok(econ::expected_demand(&self.state, &self.theme)?)
    }

    /// Resolve today. Consumes exactly one draw from the source.
    ///
    /// Refuses to open when cash does not cover the chosen campaign.
    pub fn resolve_day(&mut self) -> Result<&DayResult, SimError> {
        self.check_phase(Phase::Preparation)?;
        if !self.can_afford_marketing() {
            let err = SimError::MarketingUnaffordable {
                needed: self.state.marketing.cost(),
                available: self.state.cash,
            };
            warn!(error = %err, "day not started");
            return Err(err);
        }
        let draw = self.source.next_unit();
        let (state, result) = transitions::resolve_day(self.state.clone(), &self.theme, draw)?;
        self.state = state;
        let result: &DayResult = self.last_result.insert(result);
        info!(
            day = result.day,
            weather = %result.weather,
            demand = result.demand,
            sold = result.sold,
            revenue = %result.revenue,
            profit = %result.profit,
            reputation = self.state.reputation,
            "{}",
            result.message()
        );
        Ok(result)
    }

    /// Advance to the next morning. Consumes two draws: weather, then cost.
    pub fn next_day(&mut self) -> Result<(), SimError> {
        self.check_phase(Phase::Resolution)?;
        let weather_draw = self.source.next_unit();
        let cost_draw = self.source.next_unit();
        self.state = transitions::next_day(
            self.state.clone(),
            &self.theme,
            weather_draw,
            cost_draw,
        )?;
        self.last_result = None;
        info!(
            day = self.state.day,
            weather = %self.state.weather,
            ingredient_cost = %self.state.ingredient_cost,
            "new day"
        );
        Ok(())
    }
}
