//! # Record Store Contract
//!
//! The storage operations the rental services depend on.
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────────────┐
//! │    fleet-rental      │        │            RecordStore               │
//! │  ──────────────────  │  uses  │  ──────────────────────────────────  │
//! │  AvailabilityChecker │───────►│  cars      get / list / insert / upd │
//! │  LifecycleManager    │        │  users     get / insert              │
//! │  SearchEngine        │        │  rentals   get / list / filters / .. │
//! └──────────────────────┘        │  fines     get / by rental / ..      │
//!                                 └──────────────────┬───────────────────┘
//!                                                    │ implemented by
//!                                         ┌──────────▼──────────┐
//!                                         │ fleet-db::Database  │
//!                                         └─────────────────────┘
//! ```
//!
//! Implementations own ordering and matching details:
//! - list operations return records in ascending id order
//! - name and brand filters are case-insensitive substring matches
//! - `rentals_in_range` returns every rental whose planned interval overlaps
//!   the range, active or not
//! - a `get` for an unknown id yields `Ok(None)`, an `update` for an unknown
//!   id yields [`StoreError::NotFound`](crate::error::StoreError::NotFound)

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{
    Car, CarId, CarStatus, DateRange, Fine, FineId, NewCar, NewFine, NewRental, NewUser, Rental,
    RentalId, User, UserId,
};

#[async_trait]
pub trait RecordStore: Send + Sync {
    // -------------------------------------------------------------------------
    // Cars
    // -------------------------------------------------------------------------

    async fn car(&self, id: CarId) -> StoreResult<Option<Car>>;

    async fn cars(&self) -> StoreResult<Vec<Car>>;

    async fn cars_by_status(&self, status: CarStatus) -> StoreResult<Vec<Car>>;

    async fn insert_car(&self, car: &NewCar) -> StoreResult<Car>;

    async fn update_car(&self, car: &Car) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    async fn user(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User>;

    // -------------------------------------------------------------------------
    // Rentals
    // -------------------------------------------------------------------------

    async fn rental(&self, id: RentalId) -> StoreResult<Option<Rental>>;

    async fn rentals(&self) -> StoreResult<Vec<Rental>>;

    /// Rentals with `completed = false`.
    async fn active_rentals(&self) -> StoreResult<Vec<Rental>>;

    async fn rentals_by_car(&self, car_id: CarId) -> StoreResult<Vec<Rental>>;

    async fn rentals_by_user(&self, user_id: UserId) -> StoreResult<Vec<Rental>>;

    async fn rentals_in_range(&self, range: DateRange) -> StoreResult<Vec<Rental>>;

    /// Rentals whose client's username or full name contains `name`.
    async fn rentals_by_client_name(&self, name: &str) -> StoreResult<Vec<Rental>>;

    /// Rentals whose car brand contains `brand`.
    async fn rentals_by_car_brand(&self, brand: &str) -> StoreResult<Vec<Rental>>;

    async fn insert_rental(&self, rental: &NewRental) -> StoreResult<Rental>;

    async fn update_rental(&self, rental: &Rental) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Fines
    // -------------------------------------------------------------------------

    async fn fine(&self, id: FineId) -> StoreResult<Option<Fine>>;

    async fn fines(&self) -> StoreResult<Vec<Fine>>;

    /// Fines for one rental, oldest first (by date, then id).
    async fn fines_by_rental(&self, rental_id: RentalId) -> StoreResult<Vec<Fine>>;

    async fn insert_fine(&self, fine: &NewFine) -> StoreResult<Fine>;

    async fn update_fine(&self, fine: &Fine) -> StoreResult<()>;
}
