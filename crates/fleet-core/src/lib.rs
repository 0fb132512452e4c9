//! # fleet-core: Pure Business Logic for Fleet Rental
//!
//! This crate is the **heart** of Fleet Rental. It contains the pricing,
//! fine and interval rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fleet Rental Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/fleet-cli                               │   │
//! │  │        quote ──► book ──► return ──► reconcile ──► search       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    fleet-rental                                 │   │
//! │  │   AvailabilityChecker • RentalLifecycleManager • SearchEngine   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fleet-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │   fine    │  │   store   │  │   │
//! │  │   │ Car       │  │ Strategy  │  │ FineCalc  │  │ Record-   │  │   │
//! │  │   │ Rental    │  │ Calculator│  │           │  │ Store     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 fleet-db (implements RecordStore)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Car, Rental, Fine, User) and [`DateRange`]
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The closed set of pricing strategies
//! - [`calculator`] - Strategy selection and cost breakdowns
//! - [`fine`] - Overdue fine calculation
//! - [`clock`] - Injectable "today"
//! - [`store`] - The record store contract the services depend on
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fleet_core::money::Money;
//! use fleet_core::pricing::PricingStrategy;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
//!
//! // 7 days at $100/day with the 10% weekly discount
//! let cost = PricingStrategy::Weekly.cost(Money::from_major(100), start, end);
//! assert_eq!(cost, Money::from_major(630));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod clock;
pub mod error;
pub mod fine;
pub mod money;
pub mod pricing;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{CostBreakdown, PricingCalculator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, StoreError, ValidationError};
pub use fine::FineCalculator;
pub use money::{Money, Multiplier};
pub use pricing::PricingStrategy;
pub use store::RecordStore;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days in a billing week.
pub const DAYS_PER_WEEK: i64 = 7;

/// Days in a billing month. Months are a flat 30 days regardless of calendar.
pub const DAYS_PER_MONTH: i64 = 30;

/// Weekly discount: 10% off, in basis points.
pub const WEEKLY_RATE_BPS: u32 = 9_000;

/// Monthly discount: 20% off, in basis points.
pub const MONTHLY_RATE_BPS: u32 = 8_000;

/// Overdue fine multiplier used when the caller does not choose one (×1.5).
pub const DEFAULT_FINE_MULTIPLIER_BPS: u32 = 15_000;
