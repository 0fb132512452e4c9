//! # Pricing Calculator
//!
//! Picks a pricing strategy for an interval and explains the resulting cost.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  select_optimal_strategy(start, end)                                    │
//! │       │   days ≥ 30 → Monthly                                           │
//! │       │   days ≥ 7  → Weekly                                            │
//! │       │   else      → Daily                                             │
//! │       ▼                                                                 │
//! │  (optional) set_strategy(..)   ← caller override                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  calculate_rental_cost(car, start, end) ──► Money                       │
//! │       │                                                                 │
//! │       └──► breakdown()  ──► CostBreakdown (for display)                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator never touches car or rental records; the only state it
//! keeps is the active strategy and the last breakdown.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::pricing::{billable_days, PricingStrategy};
use crate::types::{Car, CarId};
use crate::{DAYS_PER_MONTH, DAYS_PER_WEEK};

/// Explanation of the last computed cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub strategy: String,
    pub car_id: CarId,
    pub car_name: String,
    pub daily_price: Money,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
    pub cost: Money,
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy:    {}", self.strategy)?;
        writeln!(f, "Car:         #{} {}", self.car_id, self.car_name)?;
        writeln!(f, "Daily price: {}", self.daily_price)?;
        writeln!(f, "Period:      {} to {} ({} days)", self.start, self.end, self.days)?;
        write!(f, "Total:       {}", self.cost)
    }
}

/// Strategy holder and cost explainer.
#[derive(Debug, Clone, Default)]
pub struct PricingCalculator {
    strategy: PricingStrategy,
    last_breakdown: Option<CostBreakdown>,
}

impl PricingCalculator {
    /// Creates a calculator using the Daily strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a calculator with an explicit strategy.
    pub fn with_strategy(strategy: PricingStrategy) -> Self {
        PricingCalculator {
            strategy,
            last_breakdown: None,
        }
    }

    /// The strategy the interval length calls for.
    pub fn optimal_strategy(start: NaiveDate, end: NaiveDate) -> PricingStrategy {
        let days = billable_days(start, end);
        if days >= DAYS_PER_MONTH {
            PricingStrategy::Monthly
        } else if days >= DAYS_PER_WEEK {
            PricingStrategy::Weekly
        } else {
            PricingStrategy::Daily
        }
    }

    /// Makes the optimal strategy for `[start, end]` active and returns it.
    pub fn select_optimal_strategy(&mut self, start: NaiveDate, end: NaiveDate) -> PricingStrategy {
        self.strategy = Self::optimal_strategy(start, end);
        self.strategy
    }

    /// Overrides the active strategy.
    pub fn set_strategy(&mut self, strategy: PricingStrategy) {
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> PricingStrategy {
        self.strategy
    }

    /// Prices `[start, end]` for `car` with the active strategy and records
    /// a breakdown.
    pub fn calculate_rental_cost(&mut self, car: &Car, start: NaiveDate, end: NaiveDate) -> Money {
        let cost = self.strategy.cost(car.daily_price(), start, end);

        self.last_breakdown = Some(CostBreakdown {
            strategy: self.strategy.to_string(),
            car_id: car.id,
            car_name: car.full_name(),
            daily_price: car.daily_price(),
            start,
            end,
            days: billable_days(start, end),
            cost,
        });

        cost
    }

    /// Breakdown of the most recent calculation, if any.
    pub fn breakdown(&self) -> Option<&CostBreakdown> {
        self.last_breakdown.as_ref()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
