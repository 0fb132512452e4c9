//! Test fixtures: an in-memory SQLite fleet, a recording status observer and
//! a store that refuses writes.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use fleet_core::error::StoreResult;
use fleet_core::{
    Car, CarId, CarStatus, DateRange, Fine, FineId, ManualClock, NewCar, NewFine, NewRental,
    NewUser, RecordStore, Rental, RentalId, StoreError, User, UserId, UserRole,
};
use fleet_db::{Database, DbConfig};

use crate::status::CarStatusObserver;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn memory_store() -> Arc<Database> {
    Arc::new(Database::new(DbConfig::in_memory()).await.unwrap())
}

pub async fn add_car<S: RecordStore>(store: &S, brand: &str, price_cents: i64, status: CarStatus) -> Car {
    store
        .insert_car(&NewCar {
            brand: brand.to_string(),
            model: "Test".to_string(),
            status,
            daily_price_cents: price_cents,
        })
        .await
        .unwrap()
}

pub async fn add_client<S: RecordStore>(store: &S, username: &str, full_name: &str) -> User {
    store
        .insert_user(&NewUser {
            username: username.to_string(),
            full_name: full_name.to_string(),
            role: UserRole::Client,
        })
        .await
        .unwrap()
}

/// One available car at 100.00/day, one client, a clock pinned to `today`.
pub struct Fleet {
    pub store: Arc<Database>,
    pub clock: Arc<ManualClock>,
    pub car: Car,
    pub client: User,
}

impl Fleet {
    pub async fn new(today: NaiveDate) -> Self {
        let store = memory_store().await;
        let car = add_car(store.as_ref(), "Toyota", 10_000, CarStatus::Available).await;
        let client = add_client(store.as_ref(), "anowak", "Anna Nowak").await;
        Fleet {
            store,
            clock: Arc::new(ManualClock::new(today)),
            car,
            client,
        }
    }

    pub async fn car_status(&self, id: CarId) -> CarStatus {
        self.store.car(id).await.unwrap().unwrap().status
    }

    pub async fn set_car_status(&self, id: CarId, status: CarStatus) {
        let mut car = self.store.car(id).await.unwrap().unwrap();
        car.status = status;
        self.store.update_car(&car).await.unwrap();
    }
}

// =============================================================================
// Recording Observer
// =============================================================================

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(CarId, CarStatus)>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<(CarId, CarStatus)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl CarStatusObserver for RecordingObserver {
    async fn car_status_changed(&self, car_id: CarId, status: CarStatus) {
        self.events.lock().unwrap().push((car_id, status));
    }
}

// =============================================================================
// Write-Rejecting Store
// =============================================================================

/// Delegates reads to `inner` and rejects every write, or only fine writes
/// when built with [`ReadOnlyStore::fines_only`].
pub struct ReadOnlyStore<S> {
    inner: Arc<S>,
    fines_only: bool,
}

impl<S> ReadOnlyStore<S> {
    pub fn new(inner: Arc<S>) -> Self {
        ReadOnlyStore {
            inner,
            fines_only: false,
        }
    }

    /// Passes car, user and rental writes through; rejects fine writes.
    pub fn fines_only(inner: Arc<S>) -> Self {
        ReadOnlyStore {
            inner,
            fines_only: true,
        }
    }
}

fn rejected<T>() -> StoreResult<T> {
    Err(StoreError::Rejected("store is read-only".to_string()))
}

#[async_trait]
impl<S: RecordStore> RecordStore for ReadOnlyStore<S> {
    async fn car(&self, id: CarId) -> StoreResult<Option<Car>> {
        self.inner.car(id).await
    }
    async fn cars(&self) -> StoreResult<Vec<Car>> {
        self.inner.cars().await
    }
    async fn cars_by_status(&self, status: CarStatus) -> StoreResult<Vec<Car>> {
        self.inner.cars_by_status(status).await
    }
    async fn insert_car(&self, car: &NewCar) -> StoreResult<Car> {
        if self.fines_only {
            return self.inner.insert_car(car).await;
        }
        rejected()
    }
    async fn update_car(&self, car: &Car) -> StoreResult<()> {
        if self.fines_only {
            return self.inner.update_car(car).await;
        }
        rejected()
    }
    async fn user(&self, id: UserId) -> StoreResult<Option<User>> {
        self.inner.user(id).await
    }
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        if self.fines_only {
            return self.inner.insert_user(user).await;
        }
        rejected()
    }
    async fn rental(&self, id: RentalId) -> StoreResult<Option<Rental>> {
        self.inner.rental(id).await
    }
    async fn rentals(&self) -> StoreResult<Vec<Rental>> {
        self.inner.rentals().await
    }
    async fn active_rentals(&self) -> StoreResult<Vec<Rental>> {
        self.inner.active_rentals().await
    }
    async fn rentals_by_car(&self, car_id: CarId) -> StoreResult<Vec<Rental>> {
        self.inner.rentals_by_car(car_id).await
    }
    async fn rentals_by_user(&self, user_id: UserId) -> StoreResult<Vec<Rental>> {
        self.inner.rentals_by_user(user_id).await
    }
    async fn rentals_in_range(&self, range: DateRange) -> StoreResult<Vec<Rental>> {
        self.inner.rentals_in_range(range).await
    }
    async fn rentals_by_client_name(&self, name: &str) -> StoreResult<Vec<Rental>> {
        self.inner.rentals_by_client_name(name).await
    }
    async fn rentals_by_car_brand(&self, brand: &str) -> StoreResult<Vec<Rental>> {
        self.inner.rentals_by_car_brand(brand).await
    }
    async fn insert_rental(&self, rental: &NewRental) -> StoreResult<Rental> {
        if self.fines_only {
            return self.inner.insert_rental(rental).await;
        }
        rejected()
    }
    async fn update_rental(&self, rental: &Rental) -> StoreResult<()> {
        if self.fines_only {
            return self.inner.update_rental(rental).await;
        }
        rejected()
    }
    async fn fine(&self, id: FineId) -> StoreResult<Option<Fine>> {
        self.inner.fine(id).await
    }
    async fn fines(&self) -> StoreResult<Vec<Fine>> {
        self.inner.fines().await
    }
    async fn fines_by_rental(&self, rental_id: RentalId) -> StoreResult<Vec<Fine>> {
        self.inner.fines_by_rental(rental_id).await
    }
    async fn insert_fine(&self, _fine: &NewFine) -> StoreResult<Fine> {
        rejected()
    }
    async fn update_fine(&self, _fine: &Fine) -> StoreResult<()> {
        rejected()
    }
}
