#![deny(warnings)]

//! Day-by-day runtime for the Venture simulator.
//!
//! The game alternates between a preparation phase (buy stock, set price,
//! pick marketing) and a resolution phase (the day's result is on display).
//! [`transitions`] holds the pure state transitions; [`Simulator`] owns a
//! state, the active theme and a [`UniformSource`] and enforces the phase
//! order.

pub mod config;
pub mod simulator;
pub mod source;
pub mod transitions;

use rust_decimal::Decimal;
use thiserror::Error;
use venture_core::{Phase, ValidationError};
use venture_econ::EconError;

pub use simulator::{PriceStep, Simulator};
pub use source::{FixedDraws, RandSource, UniformSource};
pub use transitions::{buy_stock, next_day, resolve_day, PurchaseOutcome};

/// Errors produced while driving the simulation.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// Operation attempted in the wrong half of the day.
    #[error("operation requires the {expected} phase, game is in the {actual} phase")]
    WrongPhase { expected: Phase, actual: Phase },
    /// Menu prices cannot be negative.
    #[error("price {0} must be non-negative")]
    InvalidPrice(Decimal),
    /// Cash does not cover the chosen campaign.
    #[error("marketing costs {needed}, only {available} on hand")]
    MarketingUnaffordable { needed: Decimal, available: Decimal },
    #[error(transparent)]
    Econ(#[from] EconError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
