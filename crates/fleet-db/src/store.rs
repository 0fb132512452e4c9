//! `RecordStore` backed by SQLite.
//!
//! Thin delegation to the repositories; the only work done here is turning
//! [`DbError`](crate::DbError) into [`StoreError`](fleet_core::StoreError).

use async_trait::async_trait;
use fleet_core::error::StoreResult;
use fleet_core::store::RecordStore;
use fleet_core::{
    Car, CarId, CarStatus, DateRange, Fine, FineId, NewCar, NewFine, NewRental, NewUser, Rental,
    RentalId, User, UserId,
};

use crate::pool::Database;

#[async_trait]
impl RecordStore for Database {
    async fn car(&self, id: CarId) -> StoreResult<Option<Car>> {
        Ok(self.car_repo().get_by_id(id).await?)
    }

    async fn cars(&self) -> StoreResult<Vec<Car>> {
        Ok(self.car_repo().list().await?)
    }

    async fn cars_by_status(&self, status: CarStatus) -> StoreResult<Vec<Car>> {
        Ok(self.car_repo().list_by_status(status).await?)
    }

    async fn insert_car(&self, car: &NewCar) -> StoreResult<Car> {
        Ok(self.car_repo().insert(car).await?)
    }

    async fn update_car(&self, car: &Car) -> StoreResult<()> {
        Ok(self.car_repo().update(car).await?)
    }

    async fn user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.user_repo().get_by_id(id).await?)
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        Ok(self.user_repo().insert(user).await?)
    }

    async fn rental(&self, id: RentalId) -> StoreResult<Option<Rental>> {
        Ok(self.rental_repo().get_by_id(id).await?)
    }

    async fn rentals(&self) -> StoreResult<Vec<Rental>> {
        Ok(self.rental_repo().list().await?)
    }

    async fn active_rentals(&self) -> StoreResult<Vec<Rental>> {
        Ok(self.rental_repo().list_active().await?)
    }

    async fn rentals_by_car(&self, car_id: CarId) -> StoreResult<Vec<Rental>> {
        Ok(self.rental_repo().list_by_car(car_id).await?)
    }

    async fn rentals_by_user(&self, user_id: UserId) -> StoreResult<Vec<Rental>> {
        Ok(self.rental_repo().list_by_user(user_id).await?)
    }

    async fn rentals_in_range(&self, range: DateRange) -> StoreResult<Vec<Rental>> {
        Ok(self.rental_repo().list_in_range(range).await?)
    }

    async fn rentals_by_client_name(&self, name: &str) -> StoreResult<Vec<Rental>> {
        Ok(self.rental_repo().search_by_client_name(name).await?)
    }

    async fn rentals_by_car_brand(&self, brand: &str) -> StoreResult<Vec<Rental>> {
        Ok(self.rental_repo().search_by_car_brand(brand).await?)
    }

    async fn insert_rental(&self, rental: &NewRental) -> StoreResult<Rental> {
        Ok(self.rental_repo().insert(rental).await?)
    }

    async fn update_rental(&self, rental: &Rental) -> StoreResult<()> {
        Ok(self.rental_repo().update(rental).await?)
    }

    async fn fine(&self, id: FineId) -> StoreResult<Option<Fine>> {
        Ok(self.fine_repo().get_by_id(id).await?)
    }

    async fn fines(&self) -> StoreResult<Vec<Fine>> {
        Ok(self.fine_repo().list().await?)
    }

    async fn fines_by_rental(&self, rental_id: RentalId) -> StoreResult<Vec<Fine>> {
        Ok(self.fine_repo().list_by_rental(rental_id).await?)
    }

    async fn insert_fine(&self, fine: &NewFine) -> StoreResult<Fine> {
        Ok(self.fine_repo().insert(fine).await?)
    }

    async fn update_fine(&self, fine: &Fine) -> StoreResult<()> {
        Ok(self.fine_repo().update(fine).await?)
    }
}
