//! # Rental Repository
//!
//! Database operations for bookings, including the per-criterion lookups
//! the search engine intersects.
//!
//! ## Search Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Criterion        │ Query                                               │
//! │───────────────────┼─────────────────────────────────────────────────────│
//! │  client name      │ JOIN users   WHERE username LIKE ? OR full_name ... │
//! │  date range       │ WHERE start_date <= :to AND end_date >= :from       │
//! │  car brand        │ JOIN cars    WHERE brand LIKE ?                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Dates are ISO text, so string comparison is chronological. `LIKE` is
//! case-insensitive for ASCII.

use sqlx::SqlitePool;
use tracing::debug;

use super::contains_pattern;
use crate::error::{DbError, DbResult};
use fleet_core::{CarId, DateRange, NewRental, Rental, RentalId, UserId};

/// Repository for rental database operations.
#[derive(Debug, Clone)]
pub struct RentalRepository {
    pool: SqlitePool,
}

impl RentalRepository {
    /// Creates a new RentalRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RentalRepository { pool }
    }

    /// Gets a rental by its ID.
    pub async fn get_by_id(&self, id: RentalId) -> DbResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            SELECT id, car_id, user_id, start_date, end_date,
                   actual_return_date, total_cost_cents, completed
            FROM rentals
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rental)
    }

    /// Lists every rental, by id.
    pub async fn list(&self) -> DbResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT id, car_id, user_id, start_date, end_date,
                   actual_return_date, total_cost_cents, completed
            FROM rentals
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    /// Lists rentals that are not completed.
    pub async fn list_active(&self) -> DbResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT id, car_id, user_id, start_date, end_date,
                   actual_return_date, total_cost_cents, completed
            FROM rentals
            WHERE completed = 0
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rentals.len(), "Loaded active rentals");
        Ok(rentals)
    }

    pub async fn list_by_car(&self, car_id: CarId) -> DbResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT id, car_id, user_id, start_date, end_date,
                   actual_return_date, total_cost_cents, completed
            FROM rentals
            WHERE car_id = ?1
            ORDER BY id
            "#,
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    pub async fn list_by_user(&self, user_id: UserId) -> DbResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT id, car_id, user_id, start_date, end_date,
                   actual_return_date, total_cost_cents, completed
            FROM rentals
            WHERE user_id = ?1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    /// Rentals whose planned interval overlaps `range`.
    pub async fn list_in_range(&self, range: DateRange) -> DbResult<Vec<Rental>> {
        debug!(from = %range.start(), to = %range.end(), "Searching rentals by date range");

        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT id, car_id, user_id, start_date, end_date,
                   actual_return_date, total_cost_cents, completed
            FROM rentals
            WHERE start_date <= ?2 AND end_date >= ?1
            ORDER BY id
            "#,
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    /// Rentals whose client's username or full name contains `name`.
    pub async fn search_by_client_name(&self, name: &str) -> DbResult<Vec<Rental>> {
        debug!(name = %name, "Searching rentals by client name");

        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT r.id, r.car_id, r.user_id, r.start_date, r.end_date,
                   r.actual_return_date, r.total_cost_cents, r.completed
            FROM rentals r
            INNER JOIN users u ON u.id = r.user_id
            WHERE u.username LIKE ?1 ESCAPE '\'
               OR u.full_name LIKE ?1 ESCAPE '\'
            ORDER BY r.id
            "#,
        )
        .bind(contains_pattern(name))
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    /// Rentals whose car brand contains `brand`.
    pub async fn search_by_car_brand(&self, brand: &str) -> DbResult<Vec<Rental>> {
        debug!(brand = %brand, "Searching rentals by car brand");

        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT r.id, r.car_id, r.user_id, r.start_date, r.end_date,
                   r.actual_return_date, r.total_cost_cents, r.completed
            FROM rentals r
            INNER JOIN cars c ON c.id = r.car_id
            WHERE c.brand LIKE ?1 ESCAPE '\'
            ORDER BY r.id
            "#,
        )
        .bind(contains_pattern(brand))
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    /// Inserts a new, active rental.
    ///
    /// ## Returns
    /// * `Ok(Rental)` - Stored rental with its assigned id
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown car or user
    pub async fn insert(&self, rental: &NewRental) -> DbResult<Rental> {
        debug!(
            car_id = rental.car_id,
            user_id = rental.user_id,
            start = %rental.start_date,
            end = %rental.end_date,
            "Inserting rental"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO rentals (
                car_id, user_id, start_date, end_date,
                actual_return_date, total_cost_cents, completed
            ) VALUES (?1, ?2, ?3, ?4, NULL, ?5, 0)
            "#,
        )
        .bind(rental.car_id)
        .bind(rental.user_id)
        .bind(rental.start_date)
        .bind(rental.end_date)
        .bind(rental.total_cost_cents)
        .execute(&self.pool)
        .await?;

        Ok(Rental {
            id: result.last_insert_rowid(),
            car_id: rental.car_id,
            user_id: rental.user_id,
            start_date: rental.start_date,
            end_date: rental.end_date,
            actual_return_date: None,
            total_cost_cents: rental.total_cost_cents,
            completed: false,
        })
    }

    /// Updates an existing rental.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Rental doesn't exist
    pub async fn update(&self, rental: &Rental) -> DbResult<()> {
        debug!(id = rental.id, completed = rental.completed, "Updating rental");

        let result = sqlx::query(
            r#"
            UPDATE rentals SET
                car_id = ?2,
                user_id = ?3,
                start_date = ?4,
                end_date = ?5,
                actual_return_date = ?6,
                total_cost_cents = ?7,
                completed = ?8
            WHERE id = ?1
            "#,
        )
        .bind(rental.id)
        .bind(rental.car_id)
        .bind(rental.user_id)
        .bind(rental.start_date)
        .bind(rental.end_date)
        .bind(rental.actual_return_date)
        .bind(rental.total_cost_cents)
        .bind(rental.completed)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Rental", rental.id));
        }

        Ok(())
    }

    /// Counts rentals (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rentals")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
