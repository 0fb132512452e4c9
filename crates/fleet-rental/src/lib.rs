//! # fleet-rental: Rental Lifecycle Services
//!
//! Booking, returns, overdue reconciliation and search on top of any
//! [`RecordStore`](fleet_core::RecordStore).
//!
//! ## Service Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  callers (CLI, seed, tests)                                             │
//! │      │ mutating                                │ read-only              │
//! │      ▼                                         ▼                        │
//! │  ┌───────────────────────────┐       ┌──────────────────────────┐       │
//! │  │ RentalLifecycleManager    │       │ RentalSearchEngine       │       │
//! │  │  create / complete /      │       │  client ∩ dates ∩ brand  │       │
//! │  │  overdue sweep            │       └────────────┬─────────────┘       │
//! │  └──┬──────────┬──────────┬──┘                    │                     │
//! │     │          │          │                       │                     │
//! │     ▼          ▼          ▼                       │                     │
//! │  Availability  Pricing /  CarStatusNotifier       │                     │
//! │  Checker       FineCalc   └─► StoreStatusUpdater  │                     │
//! │     │          (core)          │                  │                     │
//! │     └──────────────────────────┴──────────────────┴──► RecordStore      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`availability`] - Can this car be booked for this interval?
//! - [`lifecycle`] - Rental state transitions and the overdue sweep
//! - [`search`] - Multi-criterion rental search
//! - [`status`] - Car-status observers
//! - [`lock`] - Per-car async locks
//! - [`error`] - Service error types

pub mod availability;
pub mod error;
pub mod lifecycle;
pub mod lock;
pub mod search;
pub mod status;

#[cfg(test)]
mod testing;

pub use availability::AvailabilityChecker;
pub use error::{ErrorKind, RentalError, RentalResult};
pub use lifecycle::{Booking, CompletionOutcome, LifecycleSettings, ReconciliationReport, RentalLifecycleManager};
pub use lock::KeyedLocks;
pub use search::{intersect_by_id, RentalSearchEngine, SearchCriteria};
pub use status::{CarStatusNotifier, CarStatusObserver, NoOpObserver, StoreStatusUpdater};
