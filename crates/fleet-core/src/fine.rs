//! # Fine Calculator
//!
//! Overdue penalty for a rental returned (or still out) after its planned end.
//!
//! ```text
//!   planned end          actual / as-of date
//!        │◄──── overdue_days ────►│
//!   amount = daily_price × overdue_days × multiplier
//! ```
//!
//! Pure: the caller decides whether and where to persist the result.

use chrono::NaiveDate;

use crate::money::{Money, Multiplier};
use crate::pricing::PricingStrategy;
use crate::types::{days_between, Car, NewFine, Rental};

/// Computes overdue fines.
pub struct FineCalculator;

impl FineCalculator {
    /// Days between the planned end and `actual`, or 0 if not overdue.
    #[inline]
    pub fn overdue_days(planned_end: NaiveDate, actual: NaiveDate) -> i64 {
        days_between(planned_end, actual).max(0)
    }

    /// Builds the fine for returning `rental` on `actual`.
    ///
    /// Returns an empty fine (amount 0, no reason) when the return is on or
    /// before the planned end. `recorded_on` becomes the fine's date.
    pub fn calculate(
        rental: &Rental,
        car: &Car,
        actual: NaiveDate,
        multiplier: Multiplier,
        recorded_on: NaiveDate,
    ) -> NewFine {
        let days = Self::overdue_days(rental.end_date, actual);
        if days == 0 {
            return NewFine {
                rental_id: rental.id,
                amount_cents: 0,
                date: recorded_on,
                reason: String::new(),
            };
        }

        let amount: Money =
            PricingStrategy::Fine { multiplier }.cost(car.daily_price(), rental.end_date, actual);

        NewFine {
            rental_id: rental.id,
            amount_cents: amount.cents(),
            date: recorded_on,
            reason: Self::reason(days),
        }
    }

    /// Reason text recorded on an overdue fine.
    pub fn reason(days: i64) -> String {
        let unit = if days == 1 { "day" } else { "days" };
        format!("Overdue return by {days} {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CarStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> (Rental, Car) {
        let car = Car {
            id: 1,
            brand: "Ford".to_string(),
            model: "Focus".to_string(),
            status: CarStatus::Rented,
            daily_price_cents: 10_000,
        };
        let rental = Rental {
            id: 11,
            car_id: 1,
            user_id: 2,
            start_date: date(2023, 12, 28),
            end_date: date(2024, 1, 1),
            actual_return_date: None,
            total_cost_cents: 50_000,
            completed: false,
        };
        (rental, car)
    }

    #[test]
    fn test_two_days_overdue() {
        let (rental, car) = fixture();
        let fine = FineCalculator::calculate(
            &rental,
            &car,
            date(2024, 1, 3),
            Multiplier::from_bps(15_000),
            date(2024, 1, 3),
        );

        assert_eq!(fine.amount(), Money::from_major(300));
        assert_eq!(fine.rental_id, 11);
        assert_eq!(fine.reason, "Overdue return by 2 days");
        assert!(!fine.is_empty());
    }

    #[test]
    fn test_on_time_is_empty() {
        let (rental, car) = fixture();
        let fine = FineCalculator::calculate(
            &rental,
            &car,
            date(2024, 1, 1),
            Multiplier::from_bps(15_000),
            date(2024, 1, 1),
        );

        assert!(fine.is_empty());
        assert_eq!(fine.amount(), Money::zero());
        assert!(fine.reason.is_empty());
    }

    #[test]
    fn test_overdue_days_and_reason() {
        assert_eq!(FineCalculator::overdue_days(date(2024, 1, 5), date(2024, 1, 2)), 0);
        assert_eq!(FineCalculator::overdue_days(date(2024, 1, 5), date(2024, 1, 6)), 1);
        assert_eq!(FineCalculator::reason(1), "Overdue return by 1 day");
    }
}
