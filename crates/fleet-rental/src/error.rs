//! # Rental Error Types
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Kind          │ Variants                     │ State change           │
//! │────────────────┼──────────────────────────────┼────────────────────────│
//! │  NotFound      │ NotFound                     │ none                   │
//! │  Conflict      │ CarNotBookable, Overlap      │ none                   │
//! │  Validation    │ Validation                   │ none                   │
//! │  Persistence   │ Persistence                  │ none (single write)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Nothing retries. Each error is returned from the operation that hit it.

use fleet_core::{CarId, CarStatus, CoreError, RentalId, StoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by the rental services.
#[derive(Debug, Error)]
pub enum RentalError {
    /// A referenced car, user, rental or fine does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: i64 },

    /// The car's status does not allow new bookings.
    ///
    /// ## When This Occurs
    /// - The car is out with another customer (`rented`)
    /// - The car is in the workshop (`maintenance`)
    #[error("Car {car_id} cannot be booked while {status}")]
    CarNotBookable { car_id: CarId, status: CarStatus },

    /// The requested interval overlaps an active rental of the same car.
    #[error("Car {car_id} is already booked by rental {rental_id} for an overlapping period")]
    Overlap { car_id: CarId, rental_id: RentalId },

    /// Bad input such as inverted dates or a negative cost.
    #[error("Invalid request: {0}")]
    Validation(#[from] CoreError),

    /// The record store failed or refused a write.
    #[error("Persistence failure: {0}")]
    Persistence(StoreError),
}

impl RentalError {
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        RentalError::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Coarse category, for callers that only branch on the kind of failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RentalError::NotFound { .. } => ErrorKind::NotFound,
            RentalError::CarNotBookable { .. } | RentalError::Overlap { .. } => ErrorKind::Conflict,
            RentalError::Validation(_) => ErrorKind::Validation,
            RentalError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<ValidationError> for RentalError {
    fn from(err: ValidationError) -> Self {
        RentalError::Validation(CoreError::Validation(err))
    }
}

/// A store-level NotFound stays a NotFound; everything else is a persistence failure.
impl From<StoreError> for RentalError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => RentalError::NotFound { entity, id },
            other => RentalError::Persistence(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Persistence,
}

/// Result type for rental service operations.
pub type RentalResult<T> = Result<T, RentalError>;
