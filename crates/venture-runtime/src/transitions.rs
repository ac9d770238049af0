//! Pure state transitions.
//!
//! Each function takes the current state by value and returns the next one,
//! leaving the caller to decide where state lives. Randomness arrives as
//! uniform draws so a fixed draw reproduces a day exactly.

use crate::SimError;
use rust_decimal::Decimal;
use venture_core::{DayResult, GameState, MarketingChoice, Phase, Theme};
use venture_econ::{self as econ, EconError};

/// Result of a stock purchase attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum PurchaseOutcome {
    /// Units added to stock and paid for.
    Bought { quantity: u64, cost: Decimal },
    /// Not enough cash; nothing changed.
    Rejected { needed: Decimal, available: Decimal },
}

impl PurchaseOutcome {
    pub fn is_bought(&self) -> bool {
        matches!(self, PurchaseOutcome::Bought { .. })
    }
}

pub(crate) fn ensure_phase(state: &GameState, expected: Phase) -> Result<(), SimError> {
    if state.phase != expected {
        return Err(SimError::WrongPhase {
            expected,
            actual: state.phase,
        });
    }
    Ok(())
}

/// Buy `quantity` units at today's ingredient cost.
///
/// The purchase is all-or-nothing: when cash does not cover the full
/// quantity the state comes back untouched with a `Rejected` outcome.
pub fn buy_stock(
    mut state: GameState,
    quantity: u64,
) -> Result<(GameState, PurchaseOutcome), SimError> {
    ensure_phase(&state, Phase::Preparation)?;
    let cost = match econ::purchase_cost(quantity, state.ingredient_cost) {
        Some(cost) if state.cash >= cost => cost,
        other => {
            let outcome = PurchaseOutcome::Rejected {
                needed: other.unwrap_or(Decimal::MAX),
                available: state.cash,
            };
            return Ok((state, outcome));
        }
    };
    let stock = state
        .stock
        .checked_add(quantity)
        .ok_or(EconError::Overflow)?;
    state.cash -= cost;
    state.stock = stock;
    Ok((state, PurchaseOutcome::Bought { quantity, cost }))
}

/// Resolve the day with one variance draw and move to the resolution phase.
pub fn resolve_day(
    mut state: GameState,
    theme: &Theme,
    draw: f64,
) -> Result<(GameState, DayResult), SimError> {
    ensure_phase(&state, Phase::Preparation)?;
    let result = econ::evaluate_day(&state, theme, draw)?;
    state.cash = state
        .cash
        .checked_add(result.revenue)
        .and_then(|c| c.checked_sub(result.marketing_cost))
        .ok_or(EconError::Overflow)?;
    state.stock -= result.sold;
    state.reputation = econ::apply_reputation(state.reputation, result.reputation_change);
    state.phase = Phase::Resolution;
    Ok((state, result))
}

/// Start the next morning: new weather, new supply cost, no marketing.
///
/// Price, cash, stock and reputation carry over.
pub fn next_day(
    mut state: GameState,
    theme: &Theme,
    weather_draw: f64,
    cost_draw: f64,
) -> Result<GameState, SimError> {
    ensure_phase(&state, Phase::Resolution)?;
    let weather = econ::roll_weather(weather_draw)?;
    let ingredient_cost = econ::roll_ingredient_cost(theme, cost_draw)?;
    state.day = state.day.saturating_add(1);
    state.phase = Phase::Preparation;
    state.weather = weather;
    state.ingredient_cost = ingredient_cost;
    state.marketing = MarketingChoice::None;
    Ok(state)
}
