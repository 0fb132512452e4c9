//! # Fine Repository
//!
//! Overdue penalties. Fines are never deleted; the overdue sweep updates the
//! current fine of a rental in place.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use fleet_core::{Fine, FineId, NewFine, RentalId};

#[derive(Debug, Clone)]
pub struct FineRepository {
    pool: SqlitePool,
}

impl FineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        FineRepository { pool }
    }

    pub async fn get_by_id(&self, id: FineId) -> DbResult<Option<Fine>> {
        let fine = sqlx::query_as::<_, Fine>(
            "SELECT id, rental_id, amount_cents, date, reason FROM fines WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fine)
    }

    pub async fn list(&self) -> DbResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            "SELECT id, rental_id, amount_cents, date, reason FROM fines ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(fines)
    }

    /// Fines for one rental, oldest first.
    pub async fn list_by_rental(&self, rental_id: RentalId) -> DbResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            r#"
            SELECT id, rental_id, amount_cents, date, reason
            FROM fines
            WHERE rental_id = ?1
            ORDER BY date, id
            "#,
        )
        .bind(rental_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(fines)
    }

    /// Inserts a new fine.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown rental
    pub async fn insert(&self, fine: &NewFine) -> DbResult<Fine> {
        debug!(rental_id = fine.rental_id, amount = fine.amount_cents, "Inserting fine");

        let result = sqlx::query(
            r#"
            INSERT INTO fines (rental_id, amount_cents, date, reason)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(fine.rental_id)
        .bind(fine.amount_cents)
        .bind(fine.date)
        .bind(&fine.reason)
        .execute(&self.pool)
        .await?;

        Ok(Fine {
            id: result.last_insert_rowid(),
            rental_id: fine.rental_id,
            amount_cents: fine.amount_cents,
            date: fine.date,
            reason: fine.reason.clone(),
        })
    }

    /// Updates amount, date and reason of an existing fine.
    pub async fn update(&self, fine: &Fine) -> DbResult<()> {
        debug!(id = fine.id, amount = fine.amount_cents, "Updating fine");

        let result = sqlx::query(
            r#"
            UPDATE fines SET
                rental_id = ?2,
                amount_cents = ?3,
                date = ?4,
                reason = ?5
            WHERE id = ?1
            "#,
        )
        .bind(fine.id)
        .bind(fine.rental_id)
        .bind(fine.amount_cents)
        .bind(fine.date)
        .bind(&fine.reason)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Fine", fine.id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fines")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
