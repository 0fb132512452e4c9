//! # Car Status Notifications
//!
//! The lifecycle manager never writes car status itself. It announces
//! `(car_id, new_status)` and whoever is attached reacts.
//!
//! ```text
//! ┌──────────────────────┐  notify(car, Rented)  ┌──────────────────────────┐
//! │ RentalLifecycle-     │──────────────────────►│ CarStatusNotifier        │
//! │ Manager              │                       │  [0] StoreStatusUpdater ─┼──► update_car
//! └──────────────────────┘                       │  [1] ...                 │
//!                                                └──────────────────────────┘
//! ```
//! Observers run in attachment order. An observer cannot fail the operation
//! that triggered it.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use fleet_core::{CarId, CarStatus, RecordStore};

/// Something that wants to hear about car status changes.
#[async_trait]
pub trait CarStatusObserver: Send + Sync {
    async fn car_status_changed(&self, car_id: CarId, status: CarStatus);
}

/// Observer that ignores every change.
pub struct NoOpObserver;

#[async_trait]
impl CarStatusObserver for NoOpObserver {
    async fn car_status_changed(&self, _car_id: CarId, _status: CarStatus) {}
}

// =============================================================================
// Notifier
// =============================================================================

/// Ordered list of observers.
#[derive(Default)]
pub struct CarStatusNotifier {
    observers: RwLock<Vec<Arc<dyn CarStatusObserver>>>,
}

impl CarStatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observer. The same handle is used to detach it later.
    pub fn attach(&self, observer: Arc<dyn CarStatusObserver>) {
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(observer);
    }

    /// Removes `observer` (by identity). Returns whether it was attached.
    pub fn detach(&self, observer: &Arc<dyn CarStatusObserver>) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|o| !Arc::ptr_eq(o, observer));
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tells every observer, in attachment order.
    pub async fn notify(&self, car_id: CarId, status: CarStatus) {
        // snapshot so no lock is held across await points
        let observers: Vec<_> = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        debug!(car_id, status = %status, observers = observers.len(), "Car status changed");

        for observer in observers {
            observer.car_status_changed(car_id, status).await;
        }
    }
}

// =============================================================================
// Store Status Updater
// =============================================================================

/// Persists the new status on the car record.
///
/// A missing car or a failed write is logged and dropped; the rental
/// operation that caused the change has already succeeded.
pub struct StoreStatusUpdater<S> {
    store: Arc<S>,
}

impl<S> StoreStatusUpdater<S> {
    pub fn new(store: Arc<S>) -> Self {
        StoreStatusUpdater { store }
    }
}

#[async_trait]
impl<S: RecordStore> CarStatusObserver for StoreStatusUpdater<S> {
    async fn car_status_changed(&self, car_id: CarId, status: CarStatus) {
        let mut car = match self.store.car(car_id).await {
            Ok(Some(car)) => car,
            Ok(None) => {
                warn!(car_id, "Status change for unknown car ignored");
                return;
            }
            Err(e) => {
                warn!(car_id, error = %e, "Could not load car for status update");
                return;
            }
        };

        if car.status == status {
            return;
        }

        car.status = status;
        if let Err(e) = self.store.update_car(&car).await {
            warn!(car_id, status = %status, error = %e, "Failed to persist car status");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_car, memory_store, ReadOnlyStore, RecordingObserver};

    #[tokio::test]
    async fn test_notifies_in_order_and_detaches() {
        let notifier = CarStatusNotifier::new();
        let first = Arc::new(RecordingObserver::default());
        let second = Arc::new(RecordingObserver::default());
        let second_handle: Arc<dyn CarStatusObserver> = second.clone();

        notifier.attach(first.clone());
        notifier.attach(second_handle.clone());
        notifier.notify(1, CarStatus::Rented).await;

        assert!(notifier.detach(&second_handle));
        assert!(!notifier.detach(&second_handle));
        notifier.notify(1, CarStatus::Available).await;

        assert_eq!(
            first.events(),
            vec![(1, CarStatus::Rented), (1, CarStatus::Available)]
        );
        assert_eq!(second.events(), vec![(1, CarStatus::Rented)]);
        assert_eq!(notifier.len(), 1);
    }

    #[tokio::test]
    async fn test_store_updater_persists_status() {
        let store = memory_store().await;
        let car = add_car(store.as_ref(), "Seat", 4_000, CarStatus::Available).await;

        let updater = StoreStatusUpdater::new(Arc::clone(&store));
        updater.car_status_changed(car.id, CarStatus::Rented).await;

        assert_eq!(store.car(car.id).await.unwrap().unwrap().status, CarStatus::Rented);
    }

    #[tokio::test]
    async fn test_store_updater_swallows_failures() {
        let store = memory_store().await;
        let car = add_car(store.as_ref(), "Seat", 4_000, CarStatus::Available).await;

        let updater = StoreStatusUpdater::new(Arc::new(ReadOnlyStore::new(Arc::clone(&store))));
        updater.car_status_changed(car.id, CarStatus::Rented).await;
        updater.car_status_changed(999, CarStatus::Rented).await;

        assert_eq!(store.car(car.id).await.unwrap().unwrap().status, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_no_op_observer() {
        let notifier = CarStatusNotifier::new();
        notifier.attach(Arc::new(NoOpObserver));
        notifier.notify(5, CarStatus::Maintenance).await;
        assert!(!notifier.is_empty());
    }
}
