#![deny(warnings)]

//! Economic models: demand and settlement helpers for the Venture simulator.
//!
//! This module provides the pure arithmetic behind a business day:
//! - Demand from reputation, price distance, marketing, weather and variance
//! - Sales capped by stock, revenue, cost of goods and profit
//! - Reputation adjustment and the day's headline event
//! - Stock purchase affordability and the morning weather/cost rolls
//!
//! Every random input arrives as a uniform draw in `[0, 1)` so callers
//! control the source and results stay reproducible.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use thiserror::Error;
use venture_core::{
    DayEvent, DayResult, GameState, MarketingChoice, Theme, Weather, WeatherAffinity,
    REPUTATION_MAX, REPUTATION_MIN,
};

/// Customers who show up at zero reputation and reference price.
pub const BASE_CUSTOMERS: f64 = 20.0;
/// Extra customers per reputation point.
pub const REPUTATION_PULL: f64 = 0.5;
/// Price units per customer gained or lost relative to the reference price.
pub const PRICE_SENSITIVITY: i64 = 5;
/// Days selling fewer units than this count as slow.
pub const SLOW_DAY_UNITS: u64 = 5;

/// Errors produced by economic helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Draws must be finite and within [0, 1).
    #[error("uniform draw {0} is outside [0, 1)")]
    InvalidDraw(f64),
    /// Numeric conversion to or from floating point failed.
    #[error("non-finite numeric conversion")]
    NonFinite,
    /// Monetary arithmetic exceeded the decimal range.
    #[error("monetary overflow")]
    Overflow,
}

fn check_draw(draw: f64) -> Result<f64, EconError> {
    if draw.is_finite() && (0.0..1.0).contains(&draw) {
        Ok(draw)
    } else {
        Err(EconError::InvalidDraw(draw))
    }
}

/// Demand before price, marketing and weather: `20 + reputation * 0.5`.
pub fn base_demand(reputation: u8) -> f64 {
    BASE_CUSTOMERS + f64::from(reputation) * REPUTATION_PULL
}

/// Linear price pull: `(reference - price) / 5`.
///
/// Positive when undercutting the market, negative when charging more.
pub fn price_adjustment(reference: Decimal, price: Decimal) -> Result<f64, EconError> {
    let diff = reference.checked_sub(price).ok_or(EconError::Overflow)?;
    (diff / Decimal::from(PRICE_SENSITIVITY))
        .to_f64()
        .ok_or(EconError::NonFinite)
}

/// Demand multiplier for a theme's affinity under today's weather.
///
/// Theme-specific reactions take precedence; otherwise the weather's
/// generic modifier applies.
pub fn weather_factor(affinity: WeatherAffinity, weather: Weather) -> f64 {
    match (affinity, weather) {
        (WeatherAffinity::Sunny, Weather::Rainy) => 0.5,
        (WeatherAffinity::Rainy, Weather::Sunny) => 0.7,
        (WeatherAffinity::Rainy, Weather::Rainy) => 1.2,
        _ => weather.demand_modifier(),
    }
}

/// Daily swing in `[0.8, 1.2)`; a draw of 0.5 yields exactly 1.0.
pub fn variance_factor(draw: f64) -> Result<f64, EconError> {
    Ok(0.8 + check_draw(draw)? * 0.4)
}

/// Demand before the random swing, as a forecast for the current settings.
pub fn expected_demand(state: &GameState, theme: &Theme) -> Result<f64, EconError> {
    let mut d = base_demand(state.reputation);
    d += price_adjustment(theme.reference_price, state.price)?;
    d *= state.marketing.boost();
    d *= weather_factor(theme.affinity, state.weather);
    if !d.is_finite() {
        return Err(EconError::NonFinite);
    }
    Ok(d)
}

/// Whole customers for the day, floored and never negative.
pub fn demand(state: &GameState, theme: &Theme, draw: f64) -> Result<u64, EconError> {
    let raw = expected_demand(state, theme)? * variance_factor(draw)?;
    if !raw.is_finite() {
        return Err(EconError::NonFinite);
    }
    let floored = raw.floor();
    if floored <= 0.0 {
        return Ok(0);
    }
    if floored >= u64::MAX as f64 {
        return Ok(u64::MAX);
    }
    Ok(floored as u64)
}

/// Money flows of a resolved day.
#[derive(Clone, Debug, PartialEq)]
pub struct Settlement {
    pub sold: u64,
    pub revenue: Decimal,
    pub cogs: Decimal,
    pub marketing_cost: Decimal,
    pub profit: Decimal,
}

/// Cap sales to stock and compute revenue, cost of goods and profit.
pub fn settle(
    demand: u64,
    stock: u64,
    price: Decimal,
    unit_cost: Decimal,
    marketing: MarketingChoice,
) -> Result<Settlement, EconError> {
    let sold = stock.min(demand);
    let units = Decimal::from(sold);
    let revenue = units.checked_mul(price).ok_or(EconError::Overflow)?;
    let cogs = units.checked_mul(unit_cost).ok_or(EconError::Overflow)?;
    let marketing_cost = marketing.cost();
    let profit = revenue
        .checked_sub(cogs)
        .and_then(|p| p.checked_sub(marketing_cost))
        .ok_or(EconError::Overflow)?;
    Ok(Settlement {
        sold,
        revenue,
        cogs,
        marketing_cost,
        profit,
    })
}

/// Reputation change before clamping.
///
/// Stockouts cost 2 points; otherwise pricing at or below 90% of the
/// reference earns 2 and pricing at or above 120% costs 1.
pub fn reputation_delta(demand: u64, stock: u64, price: Decimal, reference: Decimal) -> i32 {
    if demand > stock {
        -2
    } else if price <= reference * Decimal::new(9, 1) {
        2
    } else if price >= reference * Decimal::new(12, 1) {
        -1
    } else {
        0
    }
}

/// Apply a delta and clamp into the reputation range.
pub fn apply_reputation(reputation: u8, delta: i32) -> u8 {
    let next = (i32::from(reputation) + delta)
        .clamp(i32::from(REPUTATION_MIN), i32::from(REPUTATION_MAX));
    // Clamped to [0, 100] above.
    next as u8
}

/// Headline for the day; the first matching rule wins.
pub fn select_event(
    stockout: bool,
    sold: u64,
    marketing: MarketingChoice,
    profit: Decimal,
) -> DayEvent {
    if stockout {
        DayEvent::SoldOut
    } else if sold < SLOW_DAY_UNITS {
        DayEvent::SlowDay
    } else if marketing.is_active() && profit > Decimal::ZERO {
        DayEvent::MarketingPaidOff
    } else {
        DayEvent::Normal
    }
}

/// Evaluate a day for the given state and variance draw.
///
/// Pure: the state is not modified. The returned record carries everything
/// needed to apply the day (sold units, revenue, marketing spend and the
/// clamped reputation change).
pub fn evaluate_day(state: &GameState, theme: &Theme, draw: f64) -> Result<DayResult, EconError> {
    let demand = demand(state, theme, draw)?;
    let s = settle(
        demand,
        state.stock,
        state.price,
        state.ingredient_cost,
        state.marketing,
    )?;
    let delta = reputation_delta(demand, state.stock, state.price, theme.reference_price);
    let reputation = apply_reputation(state.reputation, delta);
    let event = select_event(demand > state.stock, s.sold, state.marketing, s.profit);
    Ok(DayResult {
        day: state.day,
        weather: state.weather,
        demand,
        sold: s.sold,
        revenue: s.revenue,
        cogs: s.cogs,
        marketing_cost: s.marketing_cost,
        profit: s.profit,
        reputation_change: i32::from(reputation) - i32::from(state.reputation),
        event,
    })
}

/// Total price of `quantity` units, or `None` on overflow.
pub fn purchase_cost(quantity: u64, unit_cost: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_cost)
}

/// Whether `cash` covers `quantity` units at `unit_cost`.
pub fn can_afford(cash: Decimal, quantity: u64, unit_cost: Decimal) -> bool {
    purchase_cost(quantity, unit_cost).is_some_and(|cost| cash >= cost)
}

/// Largest quantity `cash` can pay for: `floor(cash / unit_cost)`.
///
/// Free supplies are unbounded and report `u64::MAX`.
pub fn max_affordable(cash: Decimal, unit_cost: Decimal) -> u64 {
    if cash <= Decimal::ZERO {
        return 0;
    }
    if unit_cost <= Decimal::ZERO {
        return u64::MAX;
    }
    cash.checked_div(unit_cost)
        .and_then(|q| q.floor().to_u64())
        .unwrap_or(u64::MAX)
}

/// Morning weather: above 0.8 rains, above 0.5 is sunny, else normal.
pub fn roll_weather(draw: f64) -> Result<Weather, EconError> {
    let draw = check_draw(draw)?;
    Ok(if draw > 0.8 {
        Weather::Rainy
    } else if draw > 0.5 {
        Weather::Sunny
    } else {
        Weather::Normal
    })
}

/// Morning supply cost: `min + floor(draw * (max - min))`.
pub fn roll_ingredient_cost(theme: &Theme, draw: f64) -> Result<Decimal, EconError> {
    let draw = check_draw(draw)?;
    let span = (theme.cost_max - theme.cost_min)
        .to_f64()
        .ok_or(EconError::NonFinite)?;
    let offset = Decimal::from_f64((draw * span).floor()).ok_or(EconError::NonFinite)?;
    theme.cost_min.checked_add(offset).ok_or(EconError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use venture_core::{Phase, ThemeId};

    fn tapsi_state(reputation: u8, stock: u64) -> (GameState, Theme) {
        let theme = ThemeId::TapsiKing.theme();
        let state = GameState {
            day: 1,
            phase: Phase::Preparation,
            cash: Decimal::new(5000, 0),
            stock,
            reputation,
            ingredient_cost: Decimal::new(40, 0),
            weather: Weather::Normal,
            price: theme.reference_price,
            marketing: MarketingChoice::None,
        };
        (state, theme)
    }

    #[test]
    fn midpoint_draw_is_neutral() {
        assert_eq!(variance_factor(0.5).unwrap(), 1.0);
        assert_eq!(variance_factor(0.0).unwrap(), 0.8);
        assert!(variance_factor(1.0).is_err());
        assert!(variance_factor(-0.1).is_err());
        assert!(variance_factor(f64::NAN).is_err());
    }

    #[test]
    fn reference_price_scenario() {
        let (state, theme) = tapsi_state(10, 100);
        assert_eq!(base_demand(10), 25.0);
        let r = evaluate_day(&state, &theme, 0.5).unwrap();
        assert_eq!(r.demand, 25);
        assert_eq!(r.sold, 25);
        assert_eq!(r.revenue, Decimal::new(2125, 0));
        assert_eq!(r.cogs, Decimal::new(1000, 0));
        assert_eq!(r.profit, Decimal::new(1125, 0));
        assert_eq!(r.reputation_change, 0);
        assert_eq!(r.event, DayEvent::Normal);
    }

    #[test]
    fn stockout_scenario() {
        let (state, theme) = tapsi_state(10, 5);
        let r = evaluate_day(&state, &theme, 0.5).unwrap();
        assert_eq!(r.demand, 25);
        assert_eq!(r.sold, 5);
        assert_eq!(r.event, DayEvent::SoldOut);
        assert_eq!(r.reputation_change, -2);
        assert!(r.message().starts_with("Sold Out"));
    }

    #[test]
    fn price_moves_demand_linearly() {
        let theme = ThemeId::TapsiKing.theme();
        assert_eq!(price_adjustment(theme.reference_price, Decimal::new(75, 0)).unwrap(), 2.0);
        assert_eq!(price_adjustment(theme.reference_price, Decimal::new(95, 0)).unwrap(), -2.0);
    }

    #[test]
    fn weather_precedence() {
        assert_eq!(weather_factor(WeatherAffinity::Sunny, Weather::Rainy), 0.5);
        assert_eq!(weather_factor(WeatherAffinity::Sunny, Weather::Sunny), 1.0);
        assert_eq!(weather_factor(WeatherAffinity::Rainy, Weather::Sunny), 0.7);
        assert_eq!(weather_factor(WeatherAffinity::Rainy, Weather::Rainy), 1.2);
        assert_eq!(weather_factor(WeatherAffinity::Rainy, Weather::Normal), 1.0);
        assert_eq!(weather_factor(WeatherAffinity::Neutral, Weather::Rainy), 0.6);
    }

    #[test]
    fn influencer_in_rain_for_sunny_theme() {
        let theme = ThemeId::BobaBoiTea.theme();
        let (mut state, _) = tapsi_state(10, 1000);
        state.price = theme.reference_price;
        state.weather = Weather::Rainy;
        state.marketing = MarketingChoice::Influencer;
        // 25 * 2.5 * 0.5 = 31.25
        let r = evaluate_day(&state, &theme, 0.5).unwrap();
        assert_eq!(r.demand, 31);
        assert_eq!(r.marketing_cost, Decimal::new(5000, 0));
        assert!(r.profit < Decimal::ZERO);
        assert_eq!(r.event, DayEvent::Normal);
    }

    #[test]
    fn steep_price_floors_demand_at_zero() {
        let (mut state, theme) = tapsi_state(0, 10);
        state.price = Decimal::new(1000, 0);
        let r = evaluate_day(&state, &theme, 0.99).unwrap();
        assert_eq!(r.demand, 0);
        assert_eq!(r.sold, 0);
        assert_eq!(r.event, DayEvent::SlowDay);
        assert_eq!(r.reputation_change, 0);
    }

    #[test]
    fn reputation_rules_in_order() {
        let reference = Decimal::new(100, 0);
        assert_eq!(reputation_delta(10, 5, Decimal::new(50, 0), reference), -2);
        assert_eq!(reputation_delta(5, 5, Decimal::new(90, 0), reference), 2);
        assert_eq!(reputation_delta(5, 5, Decimal::new(91, 0), reference), 0);
        assert_eq!(reputation_delta(5, 5, Decimal::new(120, 0), reference), -1);
        assert_eq!(reputation_delta(5, 5, Decimal::new(119, 0), reference), 0);
        assert_eq!(apply_reputation(100, 2), 100);
        assert_eq!(apply_reputation(1, -2), 0);
    }

    #[test]
    fn event_rules_in_order() {
        let profit = Decimal::new(10, 0);
        assert_eq!(select_event(true, 2, MarketingChoice::Social, profit), DayEvent::SoldOut);
        assert_eq!(select_event(false, 4, MarketingChoice::Social, profit), DayEvent::SlowDay);
        assert_eq!(
            select_event(false, 5, MarketingChoice::Social, profit),
            DayEvent::MarketingPaidOff
        );
        assert_eq!(
            select_event(false, 5, MarketingChoice::Social, Decimal::ZERO),
            DayEvent::Normal
        );
        assert_eq!(select_event(false, 50, MarketingChoice::None, profit), DayEvent::Normal);
    }

    #[test]
    fn affordability() {
        let cash = Decimal::new(1000, 0);
        let unit = Decimal::new(40, 0);
        assert!(!can_afford(cash, 50, unit));
        assert!(can_afford(cash, 25, unit));
        assert_eq!(max_affordable(cash, unit), 25);
        assert_eq!(max_affordable(Decimal::new(-5, 0), unit), 0);
        assert_eq!(max_affordable(cash, Decimal::ZERO), u64::MAX);
    }

    #[test]
    fn weather_roll_thresholds() {
        assert_eq!(roll_weather(0.81).unwrap(), Weather::Rainy);
        assert_eq!(roll_weather(0.8).unwrap(), Weather::Sunny);
        assert_eq!(roll_weather(0.51).unwrap(), Weather::Sunny);
        assert_eq!(roll_weather(0.5).unwrap(), Weather::Normal);
        assert_eq!(roll_weather(0.0).unwrap(), Weather::Normal);
        assert!(roll_weather(1.5).is_err());
    }

    #[test]
    fn ingredient_cost_roll_bounds() {
        let theme = ThemeId::TapsiKing.theme();
        assert_eq!(roll_ingredient_cost(&theme, 0.0).unwrap(), Decimal::new(35, 0));
        assert_eq!(roll_ingredient_cost(&theme, 0.5).unwrap(), Decimal::new(45, 0));
        assert_eq!(roll_ingredient_cost(&theme, 0.999).unwrap(), Decimal::new(54, 0));
    }

    proptest! {
        #[test]
        fn sold_bounded_and_reputation_clamped(
            reputation in 0u8..=100,
            stock in 0u64..500,
            price in 0i64..400,
            draw in 0.0f64..1.0,
            m in 0usize..4,
            w in 0usize..3,
            t in 0usize..5,
        ) {
            let theme = ThemeId::ALL[t].theme();
            let state = GameState {
                day: 3,
                phase: Phase::Preparation,
                cash: Decimal::new(10_000, 0),
                stock,
                reputation,
                ingredient_cost: theme.cost_min,
                weather: [Weather::Sunny, Weather::Rainy, Weather::Normal][w],
                price: Decimal::new(price, 0),
                marketing: MarketingChoice::ALL[m],
            };
            let r = evaluate_day(&state, &theme, draw).unwrap();
            prop_assert!(r.sold <= stock);
            prop_assert!(r.sold <= r.demand);
            let after = i32::from(reputation) + r.reputation_change;
            prop_assert!((0..=100).contains(&after));
            prop_assert_eq!(r.profit, r.revenue - r.cogs - r.marketing_cost);
        }

        #[test]
        fn evaluation_is_deterministic(reputation in 0u8..=100, draw in 0.0f64..1.0) {
            let (state, theme) = tapsi_state(reputation, 30);
            prop_assert_eq!(
                evaluate_day(&state, &theme, draw).unwrap(),
                evaluate_day(&state, &theme, draw).unwrap()
            );
        }

        #[test]
        fn cost_roll_stays_in_range(draw in 0.0f64..1.0, t in 0usize..5) {
            let theme = ThemeId::ALL[t].theme();
            let c = roll_ingredient_cost(&theme, draw).unwrap();
            prop_assert!(c >= theme.cost_min);
            prop_assert!(c < theme.cost_max);
        }
    }
}
