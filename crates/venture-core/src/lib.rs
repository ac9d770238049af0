#![deny(warnings)]

//! Core domain models and invariants for the Venture simulator.
//!
//! This crate defines the serializable types shared by the economics and
//! runtime crates: the weekly business themes, weather and marketing
//! options, the mutable game state and the per-day result record, plus
//! validation helpers and the calendar-week theme rotation.

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lowest reachable reputation score.
pub const REPUTATION_MIN: u8 = 0;
/// Highest reachable reputation score.
pub const REPUTATION_MAX: u8 = 100;

/// Which kind of weather a business thrives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherAffinity {
    /// Hot days help, rain hurts a lot.
    Sunny,
    /// Rain helps, sunshine hurts.
    Rainy,
    /// Only the generic weather modifier applies.
    Neutral,
}

/// Identifier of one of the weekly business archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeId {
    TapsiKing,
    BobaBoiTea,
    IhawIhawRepublic,
    HaloHaloCrush,
    LaundryLord,
}

impl ThemeId {
    /// Rotation order used by [`theme_for_week`].
    pub const ALL: [ThemeId; 5] = [
        ThemeId::TapsiKing,
        ThemeId::BobaBoiTea,
        ThemeId::IhawIhawRepublic,
        ThemeId::HaloHaloCrush,
        ThemeId::LaundryLord,
    ];

    /// Full data record for this theme.
    pub fn theme(self) -> Theme {
        let (name, product, material, cost, price, affinity) = match self {
            ThemeId::TapsiKing => (
                "Tapsi King",
                "Silog",
                "Meat & Rice",
                (35, 55),
                85,
                WeatherAffinity::Neutral,
            ),
            ThemeId::BobaBoiTea => (
                "Boba Boi Tea",
                "Milk Tea",
                "Tea & Pearls",
                (25, 40),
                90,
                WeatherAffinity::Sunny,
            ),
            ThemeId::IhawIhawRepublic => (
                "Ihaw-Ihaw Republic",
                "BBQ Stick",
                "Pork Skewers",
                (10, 20),
                35,
                WeatherAffinity::Neutral,
            ),
            ThemeId::HaloHaloCrush => (
                "Halo-Halo Crush",
                "Halo-Halo",
                "Ice & Fruits",
                (30, 45),
                80,
                WeatherAffinity::Sunny,
            ),
            // Service business: customers skip line-drying when it rains.
            ThemeId::LaundryLord => (
                "Laundry Lord",
                "Wash Load",
                "Detergent",
                (15, 25),
                150,
                WeatherAffinity::Rainy,
            ),
        };
        Theme {
            id: self,
            name: name.to_string(),
            product: product.to_string(),
            material: material.to_string(),
            cost_min: Decimal::from(cost.0),
            cost_max: Decimal::from(cost.1),
            reference_price: Decimal::from(price),
            affinity,
        }
    }
}

/// A weekly business archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: ThemeId,
    /// Shop name shown to the player.
    pub name: String,
    /// Label of one sellable unit.
    pub product: String,
    /// Label of the supply bought each morning.
    pub material: String,
    /// Lower bound of the daily per-unit supply cost.
    pub cost_min: Decimal,
    /// Upper bound (exclusive after flooring) of the daily supply cost.
    pub cost_max: Decimal,
    /// Market average price; demand reacts to the distance from it.
    pub reference_price: Decimal,
    pub affinity: WeatherAffinity,
}

/// Daily weather.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Sunny,
    Rainy,
    Normal,
}

impl Weather {
    /// Generic demand multiplier used when the theme has no special reaction.
    pub fn demand_modifier(self) -> f64 {
        match self {
            Weather::Sunny | Weather::Normal => 1.0,
            Weather::Rainy => 0.6,
        }
    }

    /// Local display label.
    pub fn label(self) -> &'static str {
        match self {
            Weather::Sunny => "Mainit",
            Weather::Rainy => "Maulan",
            Weather::Normal => "Maaliwalas",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Weather::Sunny => "Sunny",
            Weather::Rainy => "Rainy",
            Weather::Normal => "Normal",
        };
        f.write_str(s)
    }
}

/// Marketing campaign bought for a single day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketingChoice {
    #[default]
    None,
    Flyers,
    Social,
    Influencer,
}

impl MarketingChoice {
    pub const ALL: [MarketingChoice; 4] = [
        MarketingChoice::None,
        MarketingChoice::Flyers,
        MarketingChoice::Social,
        MarketingChoice::Influencer,
    ];

    /// Fixed spend charged when the day resolves.
    pub fn cost(self) -> Decimal {
        match self {
            MarketingChoice::None => Decimal::ZERO,
            MarketingChoice::Flyers => Decimal::from(500),
            MarketingChoice::Social => Decimal::from(1500),
            MarketingChoice::Influencer => Decimal::from(5000),
        }
    }

    /// Demand multiplier.
    pub fn boost(self) -> f64 {
        match self {
            MarketingChoice::None => 1.0,
            MarketingChoice::Flyers => 1.2,
            MarketingChoice::Social => 1.5,
            MarketingChoice::Influencer => 2.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarketingChoice::None => "None",
            MarketingChoice::Flyers => "Flyers (Local)",
            MarketingChoice::Social => "FB/Tiktok Ads",
            MarketingChoice::Influencer => "Vlogger Shoutout",
        }
    }

    pub fn is_active(self) -> bool {
        self != MarketingChoice::None
    }
}

/// Which half of the day the game is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Player buys stock, sets price and marketing.
    #[default]
    Preparation,
    /// The day has been resolved and its result is on display.
    Resolution,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Preparation => f.write_str("preparation"),
            Phase::Resolution => f.write_str("resolution"),
        }
    }
}

/// Mutable game state, advanced one phase at a time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current day, starting at 1.
    pub day: u32,
    pub phase: Phase,
    /// Cash on hand. A day only starts when cash covers its marketing, so
    /// sessions never go negative.
    pub cash: Decimal,
    /// Units in inventory.
    pub stock: u64,
    /// Score in [0, 100].
    pub reputation: u8,
    /// Today's per-unit supply cost.
    pub ingredient_cost: Decimal,
    pub weather: Weather,
    /// Menu price; persists across days.
    pub price: Decimal,
    /// Today's campaign; reset every morning.
    pub marketing: MarketingChoice,
}

impl GameState {
    /// Fresh day-1 state for a theme.
    pub fn initial(theme: &Theme, config: &VentureConfig) -> Self {
        Self {
            day: 1,
            phase: Phase::Preparation,
            cash: config.starting_cash,
            stock: 0,
            reputation: config.starting_reputation.min(REPUTATION_MAX),
            ingredient_cost: theme.cost_min,
            weather: Weather::Sunny,
            price: theme.reference_price,
            marketing: MarketingChoice::None,
        }
    }
}

/// Notable outcome of a resolved day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayEvent {
    /// Demand exceeded stock.
    SoldOut,
    /// Fewer than five units moved.
    SlowDay,
    /// A paid campaign ran and the day was profitable.
    MarketingPaidOff,
    Normal,
}

impl DayEvent {
    pub fn message(self) -> &'static str {
        match self {
            DayEvent::SoldOut => "Sold Out! Sayang ang kita.",
            DayEvent::SlowDay => "Matumal. Marketing pa more?",
            DayEvent::MarketingPaidOff => "Marketing boosted your sales!",
            DayEvent::Normal => "Just a normal day.",
        }
    }
}

/// Summary of one resolved day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayResult {
    pub day: u32,
    pub weather: Weather,
    /// Prospective customers before capping to stock.
    pub demand: u64,
    pub sold: u64,
    pub revenue: Decimal,
    /// Supply cost of the units sold.
    pub cogs: Decimal,
    pub marketing_cost: Decimal,
    /// `revenue - cogs - marketing_cost`.
    pub profit: Decimal,
    /// Applied reputation change after clamping.
    pub reputation_change: i32,
    pub event: DayEvent,
}

impl DayResult {
    pub fn message(&self) -> &'static str {
        self.event.message()
    }
}

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VentureConfig {
    /// Seed for the deterministic RNG.
    pub rng_seed: u64,
    pub starting_cash: Decimal,
    pub starting_reputation: u8,
    /// Pin the theme rotation to a week number instead of the calendar.
    pub theme_week: Option<u32>,
}

impl Default for VentureConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            starting_cash: Decimal::from(5000),
            starting_reputation: 10,
            theme_week: None,
        }
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Reputation outside [0, 100].
    #[error("reputation {0} is out of range [0, 100]")]
    ReputationOutOfRange(u8),
    /// Days are numbered from 1.
    #[error("day must be >= 1")]
    ZeroDay,
    /// Price or cost must be non-negative.
    #[error("negative monetary value is invalid")]
    NegativeMoney,
    /// Reference price must be strictly positive.
    #[error("reference price must be > 0")]
    NonPositiveReference,
    /// Cost range is inverted.
    #[error("cost range [{min}, {max}] is inverted")]
    InvertedCostRange { min: Decimal, max: Decimal },
    /// Label must not be blank.
    #[error("blank label: {0}")]
    BlankLabel(&'static str),
}

/// Validate a theme record.
pub fn validate_theme(theme: &Theme) -> Result<(), ValidationError> {
    for (field, value) in [
        ("name", &theme.name),
        ("product", &theme.product),
        ("material", &theme.material),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::BlankLabel(field));
        }
    }
    if theme.cost_min < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    if theme.cost_min > theme.cost_max {
        return Err(ValidationError::InvertedCostRange {
            min: theme.cost_min,
            max: theme.cost_max,
        });
    }
    if theme.reference_price <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveReference);
    }
    Ok(())
}

/// Validate a game state.
pub fn validate_state(state: &GameState) -> Result<(), ValidationError> {
    if state.day == 0 {
        return Err(ValidationError::ZeroDay);
    }
    if state.reputation > REPUTATION_MAX {
        return Err(ValidationError::ReputationOutOfRange(state.reputation));
    }
    if state.price < Decimal::ZERO || state.ingredient_cost < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    Ok(())
}

/// Validate configuration values.
pub fn validate_config(config: &VentureConfig) -> Result<(), ValidationError> {
    if config.starting_reputation > REPUTATION_MAX {
        return Err(ValidationError::ReputationOutOfRange(
            config.starting_reputation,
        ));
    }
    if config.starting_cash < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    Ok(())
}

/// Week number of `date`, counting Sunday-started weeks from January 1.
///
/// Week 1 is the (possibly partial) week containing January 1.
pub fn week_number(date: NaiveDate) -> u32 {
    let day0 = date.ordinal0();
    let weekday = date.weekday().num_days_from_sunday();
    let jan1_weekday = (weekday + 7 - day0 % 7) % 7;
    (day0 + jan1_weekday + 1).div_ceil(7)
}

/// Theme active during the given week number.
pub fn theme_for_week(week: u32) -> ThemeId {
    ThemeId::ALL[week as usize % ThemeId::ALL.len()]
}

/// Theme active on the given date.
pub fn theme_for_date(date: NaiveDate) -> ThemeId {
    theme_for_week(week_number(date))
}

/// Week number of today's local date.
pub fn current_week() -> u32 {
    week_number(Local::now().date_naive())
}

/// Theme active this week.
pub fn current_theme() -> ThemeId {
    theme_for_week(current_week())
}
