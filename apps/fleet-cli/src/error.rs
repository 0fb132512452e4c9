//! # CLI Error Type
//!
//! Every failure leaves the binary as one JSON object on stderr:
//! ```json
//! { "code": "CONFLICT", "message": "Car 3 cannot be booked while rented" }
//! ```

use serde::Serialize;

use fleet_db::DbError;
use fleet_rental::{ErrorKind, RentalError};

use crate::config::ConfigError;

#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    Conflict,
    ValidationError,
    DatabaseError,
    ConfigError,
    Internal,
}

impl ErrorCode {
    /// Process exit status for this code.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCode::NotFound => 3,
            ErrorCode::Conflict => 4,
            ErrorCode::ValidationError | ErrorCode::ConfigError => 2,
            ErrorCode::DatabaseError | ErrorCode::Internal => 1,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

impl From<RentalError> for CliError {
    fn from(err: RentalError) -> Self {
        let code = match err.kind() {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::Persistence => ErrorCode::DatabaseError,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                CliError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
            }
            DbError::ConnectionFailed(_) => {
                tracing::error!("Database connection failed: {}", err);
                CliError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                tracing::error!("Database migration failed: {}", err);
                CliError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            other => {
                tracing::error!("Database error: {}", other);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Cannot encode output: {err}"))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_errors_map_to_codes() {
        let err: CliError = RentalError::not_found("Rental", 9).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Rental not found: 9");

        let err: CliError = RentalError::Overlap { car_id: 1, rental_id: 2 }.into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.code.exit_code(), 4);
    }

    #[test]
    fn test_serializes_screaming_codes() {
        let json = serde_json::to_value(CliError::validation("bad date")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad date");
    }
}
