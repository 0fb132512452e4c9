//! # Domain Types
//!
//! Core domain types used throughout Fleet Rental.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Car        │   │     Rental      │   │      Fine       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  car_id         │◄──│  rental_id      │       │
//! │  │  brand, model   │   │  user_id ───────┼─┐ │  amount_cents   │       │
//! │  │  status         │   │  start/end_date │ │ │  date           │       │
//! │  │  daily_price    │   │  completed      │ │ │  reason         │       │
//! │  └─────────────────┘   └─────────────────┘ │ └─────────────────┘       │
//! │                                            │                            │
//! │  ┌─────────────────┐   ┌─────────────────┐ │                            │
//! │  │   CarStatus     │   │      User       │◄┘                            │
//! │  │  Available      │   │  username       │                              │
//! │  │  Rented         │   │  full_name      │                              │
//! │  │  Maintenance    │   │  role           │                              │
//! │  │  Reserved       │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Integer ids are assigned by the record store. Records that have not been
//! stored yet are the `New*` structs, which carry no id at all.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Store-assigned car identity.
pub type CarId = i64;
/// Store-assigned user identity.
pub type UserId = i64;
/// Store-assigned rental identity.
pub type RentalId = i64;
/// Store-assigned fine identity.
pub type FineId = i64;

/// Signed number of days from `from` to `to` (`to - from`).
#[inline]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive calendar interval `[start, end]` with `end >= start`.
///
/// ## Overlap
/// ```text
/// [s1 ────── e1]
///          [s2 ────── e2]     overlap: !(e1 < s2 || s1 > e2)
///
/// [s1 ── e1]
///               [s2 ── e2]    no overlap: e1 < s2
/// ```
/// Touching ranges (`e1 == s2`) overlap: the same car cannot be handed back
/// and out again on the same calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::InvalidDateRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Creates a range from two dates in either order.
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            DateRange { start: a, end: b }
        } else {
            DateRange { start: b, end: a }
        }
    }

    /// A single-day range.
    pub fn single_day(day: NaiveDate) -> Self {
        DateRange { start: day, end: day }
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count; a single-day range is 1 day.
    #[inline]
    pub fn days(&self) -> i64 {
        days_between(self.start, self.end) + 1
    }

    /// Interval overlap test.
    #[inline]
    pub fn overlaps(&self, other: &DateRange) -> bool {
        !(self.end < other.start || self.start > other.end)
    }

    /// Whether `day` falls inside the range.
    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}

// =============================================================================
// Car Status
// =============================================================================

/// Where a car is in its lifecycle.
///
/// Only the rental lifecycle changes this, through the car-status
/// notification hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum CarStatus {
    /// On the lot, can be booked.
    #[default]
    Available,
    /// Out with a customer.
    Rented,
    /// In the workshop, never bookable.
    Maintenance,
    /// Held for a customer, still bookable.
    Reserved,
}

impl CarStatus {
    /// Whether a new booking may be placed on a car in this status.
    #[inline]
    pub const fn is_bookable(&self) -> bool {
        matches!(self, CarStatus::Available | CarStatus::Reserved)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Rented => "rented",
            CarStatus::Maintenance => "maintenance",
            CarStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(CarStatus::Available),
            "rented" => Ok(CarStatus::Rented),
            "maintenance" => Ok(CarStatus::Maintenance),
            "reserved" => Ok(CarStatus::Reserved),
            other => Err(format!("unknown car status: {other}")),
        }
    }
}

// =============================================================================
// Car
// =============================================================================

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Car {
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub status: CarStatus,
    /// Daily price in cents.
    pub daily_price_cents: i64,
}

impl Car {
    /// Returns the daily price as Money.
    #[inline]
    pub fn daily_price(&self) -> Money {
        Money::from_cents(self.daily_price_cents)
    }

    /// "Brand Model", as shown in breakdowns and listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// A car that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    pub status: CarStatus,
    pub daily_price_cents: i64,
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Client,
    Administrator,
}

/// A person who rents cars (or administers the fleet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
}

// =============================================================================
// Rental
// =============================================================================

/// A booking of one car by one user for a planned interval.
///
/// ## Lifecycle
/// ```text
///   create_rental            complete_rental
///  ───────────────► ACTIVE ──────────────────► COMPLETED (terminal)
///                  completed=false            completed=true
///                  actual_return=None         actual_return=Some(date)
///                  cost = planned price       cost = actual-days price
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Rental {
    pub id: RentalId,
    pub car_id: CarId,
    pub user_id: UserId,
    /// First planned day.
    pub start_date: NaiveDate,
    /// Last planned day (the planned return date).
    pub end_date: NaiveDate,
    /// Set exactly once, at completion.
    pub actual_return_date: Option<NaiveDate>,
    /// Total cost in cents.
    pub total_cost_cents: i64,
    pub completed: bool,
}

impl Rental {
    /// Returns the total cost as Money.
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }

    /// Active rentals block their car for the planned interval.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// The planned `[start_date, end_date]` interval.
    pub fn planned_range(&self) -> DateRange {
        DateRange::spanning(self.start_date, self.end_date)
    }

    /// Days the car has been out: up to the actual return if known,
    /// otherwise up to `today`. Never less than 1.
    pub fn days_rented(&self, today: NaiveDate) -> i64 {
        let until = self.actual_return_date.unwrap_or(today);
        (days_between(self.start_date, until) + 1).max(1)
    }

    /// Days past the planned end as of `today`; 0 once completed.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.completed {
            return 0;
        }
        days_between(self.end_date, today).max(0)
    }
}

/// A rental that has not been stored yet. Always created active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRental {
    pub car_id: CarId,
    pub user_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost_cents: i64,
}

// =============================================================================
// Fine
// =============================================================================

/// A penalty recorded against a rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Fine {
    pub id: FineId,
    pub rental_id: RentalId,
    pub amount_cents: i64,
    /// The day the fine was computed.
    pub date: NaiveDate,
    pub reason: String,
}

impl Fine {
    /// Returns the fine amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// A fine that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFine {
    pub rental_id: RentalId,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub reason: String,
}

impl NewFine {
    /// Returns the fine amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Zero-amount fines are never persisted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.amount_cents <= 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
