//! # Rental Lifecycle Manager
//!
//! Every state change a rental goes through, plus the overdue sweep.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   create_rental ──► ACTIVE ──complete_rental──────────► COMPLETED       │
//! │        │              │    ──complete_rental_with_fine─►   (terminal)   │
//! │        │              │                                                 │
//! │        ▼              │  check_and_apply_overdue_fines (while ACTIVE    │
//! │   car → Rented        │  and past the planned end): create or grow      │
//! │                       │  the one "current" fine                         │
//! │                       ▼                                                 │
//! │                  car → Available on completion                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! Each check-then-act sequence runs under the car's lock from
//! [`KeyedLocks`]: availability check + insert in `create_rental`, the
//! completion write, and each rental's fine lookup + write in the sweep.
//!
//! ## Current Fine
//! The sweep treats the earliest fine dated on or after the rental's planned
//! end as the rental's single running penalty and rewrites it as the overdue
//! period grows. Re-running the sweep never adds a second fine.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use fleet_core::validation::validate_cost;
use fleet_core::{
    days_between, CarId, CarStatus, Clock, CostBreakdown, DateRange, Fine, FineCalculator, Money,
    Multiplier, NewRental, PricingCalculator, RecordStore, Rental, RentalId, UserId,
    DEFAULT_FINE_MULTIPLIER_BPS,
};

use crate::availability::AvailabilityChecker;
use crate::error::{RentalError, RentalResult};
use crate::lock::KeyedLocks;
use crate::status::{CarStatusNotifier, CarStatusObserver, StoreStatusUpdater};

// =============================================================================
// Settings & Outcomes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSettings {
    /// Multiplier used by the overdue sweep. Default ×1.5.
    pub overdue_fine_multiplier: Multiplier,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        LifecycleSettings {
            overdue_fine_multiplier: Multiplier::from_bps(DEFAULT_FINE_MULTIPLIER_BPS),
        }
    }
}

/// Result of [`RentalLifecycleManager::complete_rental_with_fine`].
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    /// Whether the rental was marked completed.
    pub success: bool,
    pub was_overdue: bool,
    pub overdue_days: i64,
    /// Amount of the fine recorded, zero when on time.
    pub fine_amount: Money,
    /// Why the overdue fine could not be recorded, when it could not.
    pub fine_error: Option<String>,
    /// The completed rental, when `success`.
    pub rental: Option<Rental>,
    /// Why completion failed, when it did.
    pub error: Option<String>,
}

/// A booking made at the quoted price.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub rental: Rental,
    pub breakdown: CostBreakdown,
}

/// Counts from one overdue sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Active rentals looked at.
    pub examined: usize,
    /// Of those, past their planned end.
    pub overdue: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FineAction {
    Created,
    Updated,
    Unchanged,
}

// =============================================================================
// Manager
// =============================================================================

pub struct RentalLifecycleManager<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    availability: AvailabilityChecker<S>,
    notifier: CarStatusNotifier,
    settings: LifecycleSettings,
    car_locks: KeyedLocks<CarId>,
}

impl<S: RecordStore + 'static> RentalLifecycleManager<S> {
    /// Creates a manager whose notifier persists status changes into `store`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        let notifier = CarStatusNotifier::new();
        notifier.attach(Arc::new(StoreStatusUpdater::new(Arc::clone(&store))));
        Self::with_notifier(store, clock, notifier)
    }

    /// Creates a manager with a caller-built notifier (possibly empty).
    pub fn with_notifier(store: Arc<S>, clock: Arc<dyn Clock>, notifier: CarStatusNotifier) -> Self {
        RentalLifecycleManager {
            availability: AvailabilityChecker::new(Arc::clone(&store)),
            store,
            clock,
            notifier,
            settings: LifecycleSettings::default(),
            car_locks: KeyedLocks::new(),
        }
    }

    pub fn with_settings(mut self, settings: LifecycleSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    pub fn availability(&self) -> &AvailabilityChecker<S> {
        &self.availability
    }

    pub fn notifier(&self) -> &CarStatusNotifier {
        &self.notifier
    }

    /// Shorthand for `notifier().attach(..)`.
    pub fn attach_observer(&self, observer: Arc<dyn CarStatusObserver>) {
        self.notifier.attach(observer);
    }

    // -------------------------------------------------------------------------
    // Booking
    // -------------------------------------------------------------------------

    /// Books `car_id` for `user_id` over `[start, end]` at `cost`.
    ///
    /// ## Errors
    /// - `Validation` - `end < start` or negative cost
    /// - `NotFound` / `CarNotBookable` / `Overlap` - availability refused
    /// - `Persistence` - the insert failed (for example an unknown user)
    ///
    /// Nothing is written unless every check passes.
    pub async fn create_rental(
        &self,
        car_id: CarId,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
        cost: Money,
    ) -> RentalResult<Rental> {
        let range = DateRange::new(start, end)?;
        validate_cost(cost.cents())?;

        let _guard = self.car_locks.lock(car_id).await;

        if let Err(e) = self.availability.check(car_id, range).await {
            warn!(car_id, user_id, %start, %end, reason = %e, "Booking rejected");
            return Err(e);
        }

        let rental = self
            .store
            .insert_rental(&NewRental {
                car_id,
                user_id,
                start_date: start,
                end_date: end,
                total_cost_cents: cost.cents(),
            })
            .await
            .map_err(|e| {
                warn!(car_id, user_id, error = %e, "Failed to store rental");
                RentalError::from(e)
            })?;

        info!(
            rental_id = rental.id,
            car_id,
            user_id,
            %start,
            %end,
            cost = %cost,
            "Rental created"
        );

        self.notifier.notify(car_id, CarStatus::Rented).await;

        Ok(rental)
    }

    /// Prices `[start, end]` for `car_id` with the optimal strategy. No writes.
    pub async fn quote(&self, car_id: CarId, start: NaiveDate, end: NaiveDate) -> RentalResult<CostBreakdown> {
        DateRange::new(start, end)?;

        let car = self
            .store
            .car(car_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Car", car_id))?;

        let mut calculator = PricingCalculator::new();
        calculator.select_optimal_strategy(start, end);
        calculator.calculate_rental_cost(&car, start, end);

        calculator
            .breakdown()
            .cloned()
            .ok_or_else(|| RentalError::not_found("Quote", car_id))
    }

    /// Quotes and then books at the quoted cost.
    pub async fn create_priced_rental(
        &self,
        car_id: CarId,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RentalResult<Booking> {
        let breakdown = self.quote(car_id, start, end).await?;
        let rental = self
            .create_rental(car_id, user_id, start, end, breakdown.cost)
            .await?;
        Ok(Booking { rental, breakdown })
    }

    // -------------------------------------------------------------------------
    // Completion
    // -------------------------------------------------------------------------

    /// Marks the rental returned on `actual_return` and reprices it.
    ///
    /// `total = current daily price × max(1, actual days)`. A return date
    /// before the start is clamped to the start. The rental's `completed`
    /// flag is not re-checked; callers decide whether re-completion is allowed.
    pub async fn complete_rental(&self, rental_id: RentalId, actual_return: NaiveDate) -> RentalResult<Rental> {
        let rental = self.load_rental(rental_id).await?;
        let _guard = self.car_locks.lock(rental.car_id).await;
        self.finish(rental, actual_return).await
    }

    /// Completes the rental and records an overdue fine first if it is late.
    ///
    /// Lateness is judged against the planned end captured before completion.
    /// The fine is stored before the completion write and stays even if that
    /// write fails. A failed fine write does not stop the completion; it is
    /// reported in `fine_error` with a zero `fine_amount`. `success` reports
    /// the completion.
    pub async fn complete_rental_with_fine(
        &self,
        rental_id: RentalId,
        actual_return: NaiveDate,
        multiplier: Multiplier,
    ) -> RentalResult<CompletionOutcome> {
        let rental = self.load_rental(rental_id).await?;
        let _guard = self.car_locks.lock(rental.car_id).await;

        let overdue_days = FineCalculator::overdue_days(rental.end_date, actual_return);
        let was_overdue = overdue_days > 0;

        let (fine_amount, fine_error) = if was_overdue {
            match self.record_return_fine(&rental, actual_return, multiplier).await {
                Ok(amount) => (amount, None),
                Err(e) => {
                    warn!(rental_id, overdue_days, error = %e, "Overdue fine not recorded, completing anyway");
                    (Money::zero(), Some(e.to_string()))
                }
            }
        } else {
            (Money::zero(), None)
        };

        let outcome = match self.finish(rental, actual_return).await {
            Ok(rental) => CompletionOutcome {
                success: true,
                was_overdue,
                overdue_days,
                fine_amount,
                fine_error,
                rental: Some(rental),
                error: None,
            },
            Err(e) => CompletionOutcome {
                success: false,
                was_overdue,
                overdue_days,
                fine_amount,
                fine_error,
                rental: None,
                error: Some(e.to_string()),
            },
        };

        Ok(outcome)
    }

    /// Stores the fine for returning `rental` on `actual_return`. Caller holds the car lock.
    async fn record_return_fine(
        &self,
        rental: &Rental,
        actual_return: NaiveDate,
        multiplier: Multiplier,
    ) -> RentalResult<Money> {
        let car = self
            .store
            .car(rental.car_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Car", rental.car_id))?;

        let fine = FineCalculator::calculate(rental, &car, actual_return, multiplier, self.clock.today());
        if fine.is_empty() {
            return Ok(Money::zero());
        }

        let stored = self.store.insert_fine(&fine).await?;
        info!(
            rental_id = rental.id,
            fine_id = stored.id,
            amount = %stored.amount(),
            "Overdue fine recorded on return"
        );
        Ok(stored.amount())
    }

    /// Completion write shared by both completion paths. Caller holds the car lock.
    async fn finish(&self, mut rental: Rental, actual_return: NaiveDate) -> RentalResult<Rental> {
        let returned_on = actual_return.max(rental.start_date);
        let days = (days_between(rental.start_date, returned_on) + 1).max(1);

        match self.store.car(rental.car_id).await? {
            Some(car) => rental.total_cost_cents = (car.daily_price() * days).cents(),
            None => warn!(
                rental_id = rental.id,
                car_id = rental.car_id,
                "Car missing, keeping the booked cost"
            ),
        }

        rental.actual_return_date = Some(returned_on);
        rental.completed = true;

        if let Err(e) = self.store.update_rental(&rental).await {
            warn!(rental_id = rental.id, error = %e, "Failed to complete rental");
            return Err(e.into());
        }

        info!(
            rental_id = rental.id,
            car_id = rental.car_id,
            returned_on = %returned_on,
            days,
            total = %rental.total_cost(),
            "Rental completed"
        );

        self.notifier.notify(rental.car_id, CarStatus::Available).await;

        Ok(rental)
    }

    // -------------------------------------------------------------------------
    // Overdue Sweep
    // -------------------------------------------------------------------------

    /// Brings the current fine of every overdue active rental up to date.
    ///
    /// Uses today's date from the clock and the configured multiplier. A
    /// failure on one rental is counted and the sweep moves on; only failing
    /// to list the active rentals aborts it.
    pub async fn check_and_apply_overdue_fines(&self) -> RentalResult<ReconciliationReport> {
        let today = self.clock.today();
        let active = self.store.active_rentals().await?;
        let mut report = ReconciliationReport::default();

        for rental in active {
            report.examined += 1;
            if today <= rental.end_date {
                continue;
            }
            report.overdue += 1;

            match self.reconcile_rental(&rental, today).await {
                Ok(FineAction::Created) => report.created += 1,
                Ok(FineAction::Updated) => report.updated += 1,
                Ok(FineAction::Unchanged) => report.unchanged += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(rental_id = rental.id, error = %e, "Overdue fine not applied");
                }
            }
        }

        info!(
            %today,
            examined = report.examined,
            overdue = report.overdue,
            created = report.created,
            updated = report.updated,
            failed = report.failed,
            "Overdue sweep finished"
        );

        Ok(report)
    }

    async fn reconcile_rental(&self, rental: &Rental, today: NaiveDate) -> RentalResult<FineAction> {
        let _guard = self.car_locks.lock(rental.car_id).await;

        // may have been returned since the active list was read
        let rental = match self.store.rental(rental.id).await? {
            Some(fresh) if fresh.is_active() => fresh,
            _ => return Ok(FineAction::Unchanged),
        };

        let car = self
            .store
            .car(rental.car_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Car", rental.car_id))?;

        let due = FineCalculator::calculate(
            &rental,
            &car,
            today,
            self.settings.overdue_fine_multiplier,
            today,
        );
        if due.is_empty() {
            return Ok(FineAction::Unchanged);
        }

        let current = self
            .store
            .fines_by_rental(rental.id)
            .await?
            .into_iter()
            .find(|f| f.date >= rental.end_date);

        match current {
            None => {
                let fine = self.store.insert_fine(&due).await?;
                info!(rental_id = rental.id, fine_id = fine.id, amount = %fine.amount(), "Overdue fine created");
                Ok(FineAction::Created)
            }
            Some(mut fine) if fine.amount_cents != due.amount_cents => {
                let previous = fine.amount();
                fine.amount_cents = due.amount_cents;
                fine.date = due.date;
                fine.reason = due.reason;
                self.store.update_fine(&fine).await?;
                info!(
                    rental_id = rental.id,
                    fine_id = fine.id,
                    from = %previous,
                    to = %fine.amount(),
                    "Overdue fine updated"
                );
                Ok(FineAction::Updated)
            }
            Some(fine) => {
                debug!(rental_id = rental.id, fine_id = fine.id, "Overdue fine already current");
                Ok(FineAction::Unchanged)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub async fn rental(&self, rental_id: RentalId) -> RentalResult<Rental> {
        self.load_rental(rental_id).await
    }

    pub async fn active_rentals(&self) -> RentalResult<Vec<Rental>> {
        Ok(self.store.active_rentals().await?)
    }

    pub async fn user_rentals(&self, user_id: UserId) -> RentalResult<Vec<Rental>> {
        Ok(self.store.rentals_by_user(user_id).await?)
    }

    pub async fn fines_for_rental(&self, rental_id: RentalId) -> RentalResult<Vec<Fine>> {
        Ok(self.store.fines_by_rental(rental_id).await?)
    }

    async fn load_rental(&self, rental_id: RentalId) -> RentalResult<Rental> {
        self.store
            .rental(rental_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Rental", rental_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{add_car, add_client, date, Fleet, ReadOnlyStore, RecordingObserver};
    use fleet_core::ManualClock;
    use proptest::prelude::*;

    fn manager(fleet: &Fleet) -> RentalLifecycleManager<fleet_db::Database> {
        RentalLifecycleManager::new(Arc::clone(&fleet.store), fleet.clock.clone())
    }

    fn hundred() -> Money {
        Money::from_major(100)
    }

    #[tokio::test]
    async fn test_create_rental_marks_car_rented() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let manager = manager(&fleet);
        let recorder = Arc::new(RecordingObserver::default());
        manager.attach_observer(recorder.clone());

        let rental = manager
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 1, 1), date(2024, 1, 3), Money::from_major(300))
            .await
            .unwrap();

        assert!(rental.is_active());
        assert_eq!(rental.total_cost(), Money::from_major(300));
        assert_eq!(fleet.car_status(fleet.car.id).await, CarStatus::Rented);
        assert_eq!(recorder.events(), vec![(fleet.car.id, CarStatus::Rented)]);
    }

    #[tokio::test]
    async fn test_create_rental_rejections_leave_no_trace() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let manager = manager(&fleet);
        let (car, user) = (fleet.car.id, fleet.client.id);

        let err = manager
            .create_rental(car, user, date(2024, 1, 5), date(2024, 1, 1), hundred())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = manager
            .create_rental(car, user, date(2024, 1, 1), date(2024, 1, 2), Money::from_cents(-1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = manager
            .create_rental(404, user, date(2024, 1, 1), date(2024, 1, 2), hundred())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // unknown user: the store's foreign key refuses the insert
        let err = manager
            .create_rental(car, 404, date(2024, 1, 1), date(2024, 1, 2), hundred())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);

        assert!(fleet.store.rentals().await.unwrap().is_empty());
        assert_eq!(fleet.car_status(car).await, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_overlapping_booking_is_conflict() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let manager = manager(&fleet);
        let (car, user) = (fleet.car.id, fleet.client.id);

        let first = manager
            .create_rental(car, user, date(2024, 2, 1), date(2024, 2, 10), hundred())
            .await
            .unwrap();

        // rented cars are never bookable
        let err = manager
            .create_rental(car, user, date(2024, 3, 1), date(2024, 3, 2), hundred())
            .await
            .unwrap_err();
        assert!(matches!(err, RentalError::CarNotBookable { status: CarStatus::Rented, .. }));

        // a reserved car is bookable, but not over an active interval
        fleet.set_car_status(car, CarStatus::Reserved).await;
        let err = manager
            .create_rental(car, user, date(2024, 2, 10), date(2024, 2, 12), hundred())
            .await
            .unwrap_err();
        assert!(matches!(err, RentalError::Overlap { rental_id, .. } if rental_id == first.id));

        manager
            .create_rental(car, user, date(2024, 2, 11), date(2024, 2, 12), hundred())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_bookings_for_one_car() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let manager = Arc::new(manager(&fleet));
        let (car, user) = (fleet.car.id, fleet.client.id);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                manager
                    .create_rental(car, user, date(2024, 5, 1), date(2024, 5, 5), hundred())
                    .await
                    .is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(fleet.store.active_rentals().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_complete_rental_uses_actual_days_and_current_price() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let manager = manager(&fleet);

        let rental = manager
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 1, 1), date(2024, 1, 10), Money::from_major(1_000))
            .await
            .unwrap();

        // price change after booking applies at completion
        let mut car = fleet.store.car(fleet.car.id).await.unwrap().unwrap();
        car.daily_price_cents = 12_000;
        fleet.store.update_car(&car).await.unwrap();

        let done = manager.complete_rental(rental.id, date(2024, 1, 4)).await.unwrap();

        assert!(done.completed);
        assert_eq!(done.actual_return_date, Some(date(2024, 1, 4)));
        assert_eq!(done.total_cost(), Money::from_major(480));
        assert_eq!(fleet.car_status(fleet.car.id).await, CarStatus::Available);
        assert_eq!(manager.rental(rental.id).await.unwrap(), done);
    }

    #[tokio::test]
    async fn test_complete_before_start_bills_one_day() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let manager = manager(&fleet);

        let rental = manager
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 1, 5), date(2024, 1, 8), hundred())
            .await
            .unwrap();
        let done = manager.complete_rental(rental.id, date(2024, 1, 2)).await.unwrap();

        assert_eq!(done.total_cost(), hundred());
        assert_eq!(done.actual_return_date, Some(date(2024, 1, 5)));
    }

    #[tokio::test]
    async fn test_complete_missing_rental() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let err = manager(&fleet).complete_rental(77, date(2024, 1, 2)).await.unwrap_err();
        assert!(matches!(err, RentalError::NotFound { id: 77, .. }));
    }

    #[tokio::test]
    async fn test_complete_with_fine_when_late() {
        let fleet = Fleet::new(date(2024, 1, 3)).await;
        let manager = manager(&fleet);

        let rental = manager
            .create_rental(fleet.car.id, fleet.client.id, date(2023, 12, 30), date(2024, 1, 1), Money::from_major(300))
            .await
            .unwrap();

        let outcome = manager
            .complete_rental_with_fine(rental.id, date(2024, 1, 3), Multiplier::from_bps(15_000))
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.was_overdue);
        assert_eq!(outcome.overdue_days, 2);
        assert_eq!(outcome.fine_amount, Money::from_major(300));

        let fines = manager.fines_for_rental(rental.id).await.unwrap();
        assert_eq!(fines.len(), 1);
        assert_eq!(fines[0].date, date(2024, 1, 3));
        assert_eq!(fines[0].reason, "Overdue return by 2 days");

        // 2023-12-30 ..= 2024-01-03 is five days
        assert_eq!(outcome.rental.unwrap().total_cost(), Money::from_major(500));
    }

    #[tokio::test]
    async fn test_complete_with_fine_on_time() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let manager = manager(&fleet);

        let rental = manager
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 1, 1), date(2024, 1, 5), hundred())
            .await
            .unwrap();
        let outcome = manager
            .complete_rental_with_fine(rental.id, date(2024, 1, 5), Multiplier::from_bps(15_000))
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(!outcome.was_overdue);
        assert_eq!(outcome.fine_amount, Money::zero());
        assert!(manager.fines_for_rental(rental.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_on_write_paths() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let rental = manager(&fleet)
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 1, 1), date(2024, 1, 2), hundred())
            .await
            .unwrap();
        fleet.set_car_status(fleet.car.id, CarStatus::Available).await;

        let read_only = Arc::new(ReadOnlyStore::new(Arc::clone(&fleet.store)));
        let manager = RentalLifecycleManager::new(read_only, fleet.clock.clone());

        let err = manager
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 3, 1), date(2024, 3, 2), hundred())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);

        let err = manager.complete_rental(rental.id, date(2024, 1, 2)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);

        let outcome = manager
            .complete_rental_with_fine(rental.id, date(2024, 1, 2), Multiplier::ONE)
            .await
            .unwrap();
        assert!(!outcome.success);
        assert!(outcome.error.is_some());

        assert!(fleet.store.rental(rental.id).await.unwrap().unwrap().is_active());
    }

    #[tokio::test]
    async fn test_late_return_completes_when_fine_write_fails() {
        let fleet = Fleet::new(date(2024, 1, 5)).await;
        let rental = manager(&fleet)
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 1, 1), date(2024, 1, 3), hundred())
            .await
            .unwrap();

        let store = Arc::new(ReadOnlyStore::fines_only(Arc::clone(&fleet.store)));
        let manager = RentalLifecycleManager::new(store, fleet.clock.clone());

        let outcome = manager
            .complete_rental_with_fine(rental.id, date(2024, 1, 5), Multiplier::ONE)
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.was_overdue);
        assert_eq!(outcome.overdue_days, 2);
        assert_eq!(outcome.fine_amount, Money::zero());
        assert!(outcome.fine_error.is_some());
        assert!(outcome.error.is_none());

        let stored = fleet.store.rental(rental.id).await.unwrap().unwrap();
        assert!(stored.completed);
        assert_eq!(stored.actual_return_date, Some(date(2024, 1, 5)));
        assert!(fleet.store.fines_by_rental(rental.id).await.unwrap().is_empty());
        assert_eq!(fleet.car_status(fleet.car.id).await, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_sweep_creates_then_grows_single_fine() {
        let fleet = Fleet::new(date(2024, 1, 3)).await;
        let manager = manager(&fleet);

        let rental = manager
            .create_rental(fleet.car.id, fleet.client.id, date(2023, 12, 28), date(2024, 1, 1), hundred())
            .await
            .unwrap();

        let report = manager.check_and_apply_overdue_fines().await.unwrap();
        assert_eq!(report.overdue, 1);
        assert_eq!(report.created, 1);

        let fines = manager.fines_for_rental(rental.id).await.unwrap();
        assert_eq!(fines.len(), 1);
        assert_eq!(fines[0].amount(), Money::from_major(300));

        // same day: nothing to change
        let report = manager.check_and_apply_overdue_fines().await.unwrap();
        assert_eq!(report.unchanged, 1);

        fleet.clock.advance_days(2);
        let report = manager.check_and_apply_overdue_fines().await.unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 0);

        let fines = manager.fines_for_rental(rental.id).await.unwrap();
        assert_eq!(fines.len(), 1);
        assert_eq!(fines[0].amount(), Money::from_major(600));
        assert_eq!(fines[0].date, date(2024, 1, 5));
        assert_eq!(fines[0].reason, "Overdue return by 4 days");
    }

    #[tokio::test]
    async fn test_sweep_skips_on_time_and_completed_rentals() {
        let fleet = Fleet::new(date(2024, 1, 10)).await;
        let manager = manager(&fleet);
        let other_car = add_car(fleet.store.as_ref(), "Honda", 5_000, CarStatus::Available).await;
        let other_client = add_client(fleet.store.as_ref(), "pk", "Piotr Kowal").await;

        manager
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 1, 5), date(2024, 1, 10), hundred())
            .await
            .unwrap();
        let late = manager
            .create_rental(other_car.id, other_client.id, date(2024, 1, 1), date(2024, 1, 2), hundred())
            .await
            .unwrap();
        manager.complete_rental(late.id, date(2024, 1, 9)).await.unwrap();

        let report = manager.check_and_apply_overdue_fines().await.unwrap();
        assert_eq!(report, ReconciliationReport { examined: 1, ..Default::default() });
        assert!(fleet.store.fines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_counts_failures_and_continues() {
        let fleet = Fleet::new(date(2024, 1, 10)).await;
        manager(&fleet)
            .create_rental(fleet.car.id, fleet.client.id, date(2024, 1, 1), date(2024, 1, 2), hundred())
            .await
            .unwrap();

        let read_only = Arc::new(ReadOnlyStore::new(Arc::clone(&fleet.store)));
        let manager = RentalLifecycleManager::new(read_only, fleet.clock.clone());

        let report = manager.check_and_apply_overdue_fines().await.unwrap();
        assert_eq!(report.overdue, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_sweep_uses_configured_multiplier() {
        let fleet = Fleet::new(date(2024, 1, 2)).await;
        let manager = manager(&fleet).with_settings(LifecycleSettings {
            overdue_fine_multiplier: Multiplier::from_bps(20_000),
        });

        let rental = manager
            .create_rental(fleet.car.id, fleet.client.id, date(2023, 12, 30), date(2024, 1, 1), hundred())
            .await
            .unwrap();
        manager.check_and_apply_overdue_fines().await.unwrap();

        let fines = manager.fines_for_rental(rental.id).await.unwrap();
        assert_eq!(fines[0].amount(), Money::from_major(200));
    }

    #[tokio::test]
    async fn test_quote_and_priced_booking() {
        let fleet = Fleet::new(date(2024, 1, 1)).await;
        let manager = manager(&fleet);

        let quote = manager
            .quote(fleet.car.id, date(2024, 1, 1), date(2024, 1, 8))
            .await
            .unwrap();
        assert_eq!(quote.cost, Money::from_major(1_260));
        assert_eq!(quote.days, 8);
        assert!(fleet.store.rentals().await.unwrap().is_empty());

        let booking = manager
            .create_priced_rental(fleet.car.id, fleet.client.id, date(2024, 1, 1), date(2024, 1, 30))
            .await
            .unwrap();
        assert_eq!(booking.rental.total_cost(), Money::from_major(2_400));
        assert_eq!(booking.breakdown.strategy, "Monthly (20% off)");

        assert_eq!(manager.user_rentals(fleet.client.id).await.unwrap().len(), 1);
        assert_eq!(manager.active_rentals().await.unwrap().len(), 1);
    }

    // Random booking attempts on one car (kept bookable between attempts)
    // never leave two active rentals with overlapping intervals.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]
        #[test]
        fn active_rentals_never_overlap(
            bookings in prop::collection::vec((0i64..60, 0i64..10), 1..12)
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let fleet = Fleet::new(date(2024, 1, 1)).await;
                let manager = RentalLifecycleManager::with_notifier(
                    Arc::clone(&fleet.store),
                    Arc::new(ManualClock::new(date(2024, 1, 1))),
                    CarStatusNotifier::new(),
                );

                for (offset, len) in bookings {
                    let start = date(2024, 1, 1) + chrono::Duration::days(offset);
                    let end = start + chrono::Duration::days(len);
                    let _ = manager
                        .create_rental(fleet.car.id, fleet.client.id, start, end, hundred())
                        .await;
                }

                let active = fleet.store.active_rentals().await.unwrap();
                for (i, a) in active.iter().enumerate() {
                    for b in &active[i + 1..] {
                        assert!(!a.planned_range().overlaps(&b.planned_range()));
                    }
                }
            });
        }
    }
}
