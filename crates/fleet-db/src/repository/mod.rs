//! # Repository Module
//!
//! Database repository implementations for Fleet Rental.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  RecordStore impl (store.rs) / seed binary                              │
//! │       │                                                                 │
//! │       │  db.rental_repo().list_by_car(7)                                │
//! │       ▼                                                                 │
//! │  RentalRepository                                                       │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── list_active(&self)                                                 │
//! │  ├── list_in_range(&self, range)                                        │
//! │  ├── insert(&self, rental)                                              │
//! │  └── update(&self, rental)                                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CarRepository`](car::CarRepository) - Fleet CRUD and status
//! - [`UserRepository`](user::UserRepository) - Clients and administrators
//! - [`RentalRepository`](rental::RentalRepository) - Bookings and searches
//! - [`FineRepository`](fine::FineRepository) - Overdue penalties

pub mod car;
pub mod fine;
pub mod rental;
pub mod user;

/// Builds a `LIKE` pattern matching `term` anywhere, escaping `%`, `_` and `\`.
///
/// Use with `ESCAPE '\'`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
