//! # Pricing Strategies
//!
//! The closed set of rules that turn a daily price and an interval into a cost.
//!
//! ## Strategy Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Strategy  │ Applies when   │ Billed days          │ Factor │ Fallback  │
//! │────────────┼────────────────┼──────────────────────┼────────┼───────────│
//! │  Daily     │ always         │ days                 │ ×1.0   │ -         │
//! │  Weekly    │ days ≥ 7       │ ceil(days/7) × 7     │ ×0.9   │ Daily     │
//! │  Monthly   │ days ≥ 30      │ ceil(days/30) × 30   │ ×0.8   │ Weekly    │
//! │  Fine      │ overdue > 0    │ actual − planned     │ ×mult  │ 0         │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//!   days = (end − start) + 1, never less than 1
//! ```
//!
//! Partial periods round *up*: an 8-day weekly rental bills two full weeks.
//! Every strategy multiplies the base price by billed days first and applies
//! the factor last, so the discount is taken on the whole amount.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::{Money, Multiplier};
use crate::types::days_between;
use crate::{DAYS_PER_MONTH, DAYS_PER_WEEK, DEFAULT_FINE_MULTIPLIER_BPS, MONTHLY_RATE_BPS, WEEKLY_RATE_BPS};

/// Inclusive billable day count for `[start, end]`, never less than 1.
#[inline]
pub fn billable_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (days_between(start, end) + 1).max(1)
}

/// Rounds `days` up to whole periods of `period` days.
#[inline]
fn whole_periods(days: i64, period: i64) -> i64 {
    (days + period - 1) / period
}

/// A pricing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingStrategy {
    #[default]
    Daily,
    Weekly,
    Monthly,
    /// Overdue penalty. `start` is the planned return, `end` the actual one.
    Fine { multiplier: Multiplier },
}

impl PricingStrategy {
    /// Fine strategy with the default ×1.5 multiplier.
    pub const fn default_fine() -> Self {
        PricingStrategy::Fine {
            multiplier: Multiplier::from_bps(DEFAULT_FINE_MULTIPLIER_BPS),
        }
    }

    /// Computes the cost of `[start, end]` at `base` per day.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use fleet_core::money::Money;
    /// use fleet_core::pricing::PricingStrategy;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
    /// let base = Money::from_major(100);
    ///
    /// assert_eq!(PricingStrategy::Daily.cost(base, d(1), d(1)), Money::from_major(100));
    /// assert_eq!(PricingStrategy::Weekly.cost(base, d(1), d(8)), Money::from_major(1_260));
    /// assert_eq!(PricingStrategy::default_fine().cost(base, d(1), d(3)), Money::from_major(300));
    /// ```
    pub fn cost(&self, base: Money, start: NaiveDate, end: NaiveDate) -> Money {
        match self {
            PricingStrategy::Daily => daily(base, start, end),
            PricingStrategy::Weekly => weekly(base, start, end),
            PricingStrategy::Monthly => monthly(base, start, end),
            PricingStrategy::Fine { multiplier } => fine(base, start, end, *multiplier),
        }
    }

    /// Human-readable name used in breakdowns.
    pub const fn name(&self) -> &'static str {
        match self {
            PricingStrategy::Daily => "Daily",
            PricingStrategy::Weekly => "Weekly (10% off)",
            PricingStrategy::Monthly => "Monthly (20% off)",
            PricingStrategy::Fine { .. } => "Overdue fine",
        }
    }
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingStrategy::Fine { multiplier } => write!(f, "{} {}", self.name(), multiplier),
            _ => f.write_str(self.name()),
        }
    }
}

// =============================================================================
// Strategy Functions
// =============================================================================

fn daily(base: Money, start: NaiveDate, end: NaiveDate) -> Money {
    base * billable_days(start, end)
}

fn weekly(base: Money, start: NaiveDate, end: NaiveDate) -> Money {
    let days = billable_days(start, end);
    if days < DAYS_PER_WEEK {
        return daily(base, start, end);
    }

    let billed = whole_periods(days, DAYS_PER_WEEK) * DAYS_PER_WEEK;
    (base * billed).scale(Multiplier::from_bps(WEEKLY_RATE_BPS))
}

fn monthly(base: Money, start: NaiveDate, end: NaiveDate) -> Money {
    let days = billable_days(start, end);
    if days < DAYS_PER_MONTH {
        return weekly(base, start, end);
    }

    let billed = whole_periods(days, DAYS_PER_MONTH) * DAYS_PER_MONTH;
    (base * billed).scale(Multiplier::from_bps(MONTHLY_RATE_BPS))
}

fn fine(base: Money, planned: NaiveDate, actual: NaiveDate, multiplier: Multiplier) -> Money {
    let overdue = days_between(planned, actual);
    if overdue <= 0 {
        return Money::zero();
    }
    (base * overdue).scale(multiplier)
}

// =============================================================================
// Unit Tests
// =============================================================================
