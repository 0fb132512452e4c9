//! Booking, return and rental listing commands.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use fleet_core::{
    CarId, CostBreakdown, Fine, FineCalculator, Money, Multiplier, RecordStore, Rental, RentalId, UserId,
};
use fleet_rental::{Booking, CompletionOutcome, RentalError};

use super::Context;
use crate::error::{CliError, CliResult, ErrorCode};

pub async fn quote(ctx: &Context, car: CarId, from: NaiveDate, to: NaiveDate) -> CliResult<CostBreakdown> {
    Ok(ctx.manager.quote(car, from, to).await?)
}

#[derive(Debug, Serialize)]
pub struct Availability {
    pub car_id: CarId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub available: bool,
}

pub async fn available(ctx: &Context, car: CarId, from: NaiveDate, to: NaiveDate) -> Availability {
    let available = ctx.manager.availability().is_car_available(car, from, to).await;
    Availability {
        car_id: car,
        from,
        to,
        available,
    }
}

pub async fn book(
    ctx: &Context,
    car: CarId,
    user: UserId,
    from: NaiveDate,
    to: NaiveDate,
    cost_cents: Option<i64>,
) -> CliResult<Booking> {
    // fail on an unknown client before touching the car
    ctx.store
        .user(user)
        .await
        .map_err(RentalError::from)?
        .ok_or_else(|| RentalError::not_found("User", user))?;

    let booking = match cost_cents {
        None => ctx.manager.create_priced_rental(car, user, from, to).await?,
        Some(cents) => {
            let mut breakdown = ctx.manager.quote(car, from, to).await?;
            breakdown.strategy = "Agreed price".to_string();
            breakdown.cost = Money::from_cents(cents);
            let rental = ctx
                .manager
                .create_rental(car, user, from, to, breakdown.cost)
                .await?;
            Booking { rental, breakdown }
        }
    };

    info!(rental_id = booking.rental.id, "Booked from the command line");
    Ok(booking)
}

pub async fn return_car(
    ctx: &Context,
    rental_id: RentalId,
    on: Option<NaiveDate>,
    fine_multiplier: Option<f64>,
    no_fine: bool,
) -> CliResult<CompletionOutcome> {
    let rental = ctx.manager.rental(rental_id).await?;
    if rental.completed {
        return Err(CliError::new(
            ErrorCode::Conflict,
            format!("Rental {rental_id} is already completed"),
        ));
    }

    let returned_on = on.unwrap_or_else(|| ctx.clock.today());

    if no_fine {
        let overdue_days = FineCalculator::overdue_days(rental.end_date, returned_on);
        let rental = ctx.manager.complete_rental(rental_id, returned_on).await?;
        return Ok(CompletionOutcome {
            success: true,
            was_overdue: overdue_days > 0,
            overdue_days,
            fine_amount: Money::zero(),
            fine_error: None,
            rental: Some(rental),
            error: None,
        });
    }

    let multiplier = match fine_multiplier {
        Some(factor) => Multiplier::from_factor(factor).map_err(|e| CliError::validation(e.to_string()))?,
        None => ctx.config.fine_multiplier()?,
    };

    let outcome = ctx
        .manager
        .complete_rental_with_fine(rental_id, returned_on, multiplier)
        .await?;

    if !outcome.success {
        let message = outcome
            .error
            .clone()
            .unwrap_or_else(|| format!("Rental {rental_id} could not be completed"));
        return Err(CliError::new(ErrorCode::DatabaseError, message));
    }

    Ok(outcome)
}

#[derive(Debug, Serialize)]
pub struct RentalFines {
    pub rental_id: RentalId,
    pub total: Money,
    pub fines: Vec<Fine>,
}

pub async fn fines(ctx: &Context, rental_id: RentalId) -> CliResult<RentalFines> {
    ctx.manager.rental(rental_id).await?;
    let fines = ctx.manager.fines_for_rental(rental_id).await?;
    let total = fines.iter().fold(Money::zero(), |sum, f| sum + f.amount());

    Ok(RentalFines {
        rental_id,
        total,
        fines,
    })
}

#[derive(Debug, Serialize)]
pub struct ActiveRental {
    #[serde(flatten)]
    pub rental: Rental,
    pub days_rented: i64,
    pub days_overdue: i64,
}

pub async fn active(ctx: &Context) -> CliResult<Vec<ActiveRental>> {
    let today = ctx.clock.today();
    let rentals = ctx.manager.active_rentals().await?;

    Ok(rentals
        .into_iter()
        .map(|rental| ActiveRental {
            days_rented: rental.days_rented(today),
            days_overdue: rental.days_overdue(today),
            rental,
        })
        .collect())
}
