//! # Validation Module
//!
//! Input validation for records entering the fleet.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: CLI arguments (clap)                                          │
//! │  ├── Type parsing (dates, ids, decimals)                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services (fleet-rental)                                       │
//! │  └── THIS MODULE: business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE constraints                                                 │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fleet_core::validation::{validate_brand, validate_cost};
//!
//! validate_brand("Toyota").unwrap();
//! assert!(validate_cost(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{NewCar, NewUser};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;

/// 1,000,000.00 per day; keeps a year of rental well inside i64 cents.
pub const MAX_DAILY_PRICE_CENTS: i64 = 100_000_000;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a car brand.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_brand(brand: &str) -> ValidationResult<()> {
    validate_text("brand", brand, MAX_NAME_LEN)
}

/// Validates a car model. Same rules as [`validate_brand`].
pub fn validate_model(model: &str) -> ValidationResult<()> {
    validate_text("model", model, MAX_NAME_LEN)
}

/// Validates a username.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, `.`, `-` and `_` only
///
/// ## Example
/// ```rust
/// use fleet_core::validation::validate_username;
///
/// assert!(validate_username("j.smith").is_ok());
/// assert!(validate_username("j smith").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<()> {
    validate_text("username", username, 50)?;

    if !username
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a search term.
///
/// ## Returns
/// The trimmed term, or `None` if it is blank (the criterion is ignored).
pub fn validate_search_term(field: &str, term: &str) -> ValidationResult<Option<String>> {
    let term = term.trim();

    if term.is_empty() {
        return Ok(None);
    }

    if term.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(Some(term.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn validate_non_negative(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a daily price in cents. Zero is allowed, up to
/// [`MAX_DAILY_PRICE_CENTS`].
pub fn validate_daily_price(cents: i64) -> ValidationResult<()> {
    validate_non_negative("daily_price", cents)?;
    if cents > MAX_DAILY_PRICE_CENTS {
        return Err(ValidationError::TooLarge {
            field: "daily_price".to_string(),
            max: MAX_DAILY_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a rental cost in cents. Zero is allowed.
pub fn validate_cost(cents: i64) -> ValidationResult<()> {
    validate_non_negative("total_cost", cents)
}

// =============================================================================
// Record Validators
// =============================================================================

pub fn validate_new_car(car: &NewCar) -> ValidationResult<()> {
    validate_brand(&car.brand)?;
    validate_model(&car.model)?;
    validate_daily_price(car.daily_price_cents)
}

pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    validate_username(&user.username)?;
    validate_text("full_name", &user.full_name, MAX_NAME_LEN)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CarStatus, UserRole};

    #[test]
    fn test_validate_brand_and_model() {
        assert!(validate_brand("Toyota").is_ok());
        assert!(validate_brand("   ").is_err());
        assert!(validate_model(&"X".repeat(101)).is_err());
        assert!(validate_model(&"X".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("anna_k").is_ok());
        assert!(matches!(
            validate_username("anna k"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_username(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_search_term() {
        assert_eq!(validate_search_term("brand", "  ").unwrap(), None);
        assert_eq!(
            validate_search_term("brand", " Audi ").unwrap(),
            Some("Audi".to_string())
        );
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_cost(0).is_ok());
        assert!(validate_daily_price(4_500).is_ok());
        assert!(matches!(
            validate_cost(-1),
            Err(ValidationError::MustNotBeNegative { .. })
        ));

        assert!(validate_daily_price(MAX_DAILY_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_daily_price(MAX_DAILY_PRICE_CENTS + 1),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(validate_daily_price(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_records() {
        let car = NewCar {
            brand: "BMW".to_string(),
            model: "X3".to_string(),
            status: CarStatus::Available,
            daily_price_cents: -5,
        };
        assert!(validate_new_car(&car).is_err());

        let user = NewUser {
            username: "bmw.fan".to_string(),
            full_name: "Alex Morgan".to_string(),
            role: UserRole::Client,
        };
        assert!(validate_new_user(&user).is_ok());
    }
}
