//! # Availability Checker
//!
//! Decides whether a car can be booked for an interval.
//!
//! ## Decision
//! ```text
//!   car exists? ──no──► NotFound
//!        │yes
//!   status Available | Reserved? ──no──► CarNotBookable
//!        │yes
//!   any active rental of this car overlaps? ──yes──► Overlap
//!        │no
//!        ▼
//!     bookable
//! ```
//! Completed rentals never block a car.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use fleet_core::{CarId, DateRange, RecordStore};

use crate::error::{RentalError, RentalResult};

pub struct AvailabilityChecker<S> {
    store: Arc<S>,
}

impl<S: RecordStore> AvailabilityChecker<S> {
    pub fn new(store: Arc<S>) -> Self {
        AvailabilityChecker { store }
    }

    /// Checks `car_id` against `range`, saying why a booking would be refused.
    pub async fn check(&self, car_id: CarId, range: DateRange) -> RentalResult<()> {
        let car = self
            .store
            .car(car_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Car", car_id))?;

        if !car.status.is_bookable() {
            return Err(RentalError::CarNotBookable {
                car_id,
                status: car.status,
            });
        }

        let rentals = self.store.rentals_by_car(car_id).await?;
        if let Some(clash) = rentals
            .iter()
            .filter(|r| r.is_active())
            .find(|r| r.planned_range().overlaps(&range))
        {
            return Err(RentalError::Overlap {
                car_id,
                rental_id: clash.id,
            });
        }

        Ok(())
    }

    /// `true` only if the car exists, may be booked and is free for
    /// `[start, end]`. Any error, including a store failure, yields `false`.
    pub async fn is_car_available(&self, car_id: CarId, start: NaiveDate, end: NaiveDate) -> bool {
        let range = match DateRange::new(start, end) {
            Ok(range) => range,
            Err(_) => return false,
        };

        match self.check(car_id, range).await {
            Ok(()) => true,
            Err(e) => {
                debug!(car_id, %start, %end, reason = %e, "Car not available");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_car, date, memory_store, ReadOnlyStore};
    use fleet_core::{CarStatus, NewRental};

    #[tokio::test]
    async fn test_missing_car_fails_closed() {
        let store = memory_store().await;
        let checker = AvailabilityChecker::new(store);

        assert!(!checker.is_car_available(42, date(2024, 1, 1), date(2024, 1, 2)).await);
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        assert!(matches!(
            checker.check(42, range).await,
            Err(RentalError::NotFound { id: 42, .. })
        ));
    }

    #[tokio::test]
    async fn test_status_gate() {
        let store = memory_store().await;
        let rented = add_car(store.as_ref(), "Ford", 5_000, CarStatus::Rented).await;
        let shop = add_car(store.as_ref(), "Opel", 5_000, CarStatus::Maintenance).await;
        let held = add_car(store.as_ref(), "Seat", 5_000, CarStatus::Reserved).await;
        let checker = AvailabilityChecker::new(store);

        let (s, e) = (date(2030, 1, 1), date(2030, 1, 3));
        assert!(!checker.is_car_available(rented.id, s, e).await);
        assert!(!checker.is_car_available(shop.id, s, e).await);
        assert!(checker.is_car_available(held.id, s, e).await);
    }

    #[tokio::test]
    async fn test_overlap_with_active_rental_only() {
        let store = memory_store().await;
        let car = add_car(store.as_ref(), "Kia", 5_000, CarStatus::Available).await;
        let client = crate::testing::add_client(store.as_ref(), "bob", "Bob Lee").await;

        let mut booked = store
            .insert_rental(&NewRental {
                car_id: car.id,
                user_id: client.id,
                start_date: date(2024, 6, 10),
                end_date: date(2024, 6, 20),
                total_cost_cents: 0,
            })
            .await
            .unwrap();

        let checker = AvailabilityChecker::new(Arc::clone(&store));
        assert!(!checker.is_car_available(car.id, date(2024, 6, 20), date(2024, 6, 25)).await);
        assert!(!checker.is_car_available(car.id, date(2024, 6, 1), date(2024, 6, 10)).await);
        assert!(checker.is_car_available(car.id, date(2024, 6, 21), date(2024, 6, 25)).await);
        assert!(checker.is_car_available(car.id, date(2024, 6, 1), date(2024, 6, 9)).await);

        booked.completed = true;
        booked.actual_return_date = Some(date(2024, 6, 20));
        store.update_rental(&booked).await.unwrap();
        assert!(checker.is_car_available(car.id, date(2024, 6, 12), date(2024, 6, 14)).await);
    }

    #[tokio::test]
    async fn test_inverted_range_is_unavailable() {
        let store = memory_store().await;
        let car = add_car(store.as_ref(), "Kia", 5_000, CarStatus::Available).await;
        let checker = AvailabilityChecker::new(Arc::new(ReadOnlyStore::new(store)));

        assert!(!checker.is_car_available(car.id, date(2024, 1, 5), date(2024, 1, 1)).await);
        assert!(checker.is_car_available(car.id, date(2024, 1, 1), date(2024, 1, 5)).await);
    }
}
