//! # Car Repository
//!
//! Database operations for the fleet.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use fleet_core::validation::validate_daily_price;
use fleet_core::{Car, CarId, CarStatus, NewCar};

/// Repository for car database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CarRepository::new(pool);
///
/// let available = repo.list_by_status(CarStatus::Available).await?;
/// repo.update_status(car_id, CarStatus::Maintenance).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CarRepository {
    pool: SqlitePool,
}

impl CarRepository {
    /// Creates a new CarRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CarRepository { pool }
    }

    /// Gets a car by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Car))` - Car found
    /// * `Ok(None)` - Car not found
    pub async fn get_by_id(&self, id: CarId) -> DbResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            SELECT id, brand, model, status, daily_price_cents
            FROM cars
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(car)
    }

    /// Lists every car, by id.
    pub async fn list(&self) -> DbResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT id, brand, model, status, daily_price_cents
            FROM cars
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Lists cars in the given status.
    pub async fn list_by_status(&self, status: CarStatus) -> DbResult<Vec<Car>> {
        debug!(status = %status, "Listing cars by status");

        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT id, brand, model, status, daily_price_cents
            FROM cars
            WHERE status = ?1
            ORDER BY id
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Inserts a new car.
    ///
    /// ## Returns
    /// * `Ok(Car)` - The stored car with its assigned id
    /// * `Err(DbError::CheckViolation)` - Negative or oversized daily price
    pub async fn insert(&self, car: &NewCar) -> DbResult<Car> {
        debug!(brand = %car.brand, model = %car.model, "Inserting car");
        validate_daily_price(car.daily_price_cents)?;

        let result = sqlx::query(
            r#"
            INSERT INTO cars (brand, model, status, daily_price_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&car.brand)
        .bind(&car.model)
        .bind(car.status)
        .bind(car.daily_price_cents)
        .execute(&self.pool)
        .await?;

        Ok(Car {
            id: result.last_insert_rowid(),
            brand: car.brand.clone(),
            model: car.model.clone(),
            status: car.status,
            daily_price_cents: car.daily_price_cents,
        })
    }

    /// Updates an existing car.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Car doesn't exist
    pub async fn update(&self, car: &Car) -> DbResult<()> {
        debug!(id = car.id, "Updating car");
        validate_daily_price(car.daily_price_cents)?;

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                brand = ?2,
                model = ?3,
                status = ?4,
                daily_price_cents = ?5
            WHERE id = ?1
            "#,
        )
        .bind(car.id)
        .bind(&car.brand)
        .bind(&car.model)
        .bind(car.status)
        .bind(car.daily_price_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", car.id));
        }

        Ok(())
    }

    /// Sets only the status column.
    pub async fn update_status(&self, id: CarId, status: CarStatus) -> DbResult<()> {
        debug!(id, status = %status, "Updating car status");

        let result = sqlx::query("UPDATE cars SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }

        Ok(())
    }

    /// Counts cars (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use fleet_core::{CarStatus, NewCar};

    fn new_car(brand: &str, price: i64) -> NewCar {
        NewCar {
            brand: brand.to_string(),
            model: "Base".to_string(),
            status: CarStatus::Available,
            daily_price_cents: price,
        }
    }

    #[tokio::test]
    async fn test_insert_get_and_status() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.car_repo();

        let car = repo.insert(&new_car("Volvo", 8_000)).await.unwrap();
        let loaded = repo.get_by_id(car.id).await.unwrap().unwrap();
        assert_eq!(loaded, car);

        repo.update_status(car.id, CarStatus::Maintenance).await.unwrap();
        let in_shop = repo.list_by_status(CarStatus::Maintenance).await.unwrap();
        assert_eq!(in_shop.len(), 1);
        assert_eq!(in_shop[0].id, car.id);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_car_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.car_repo().update_status(404, CarStatus::Rented).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 404, .. }));
    }

    #[tokio::test]
    async fn test_negative_price_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.car_repo().insert(&new_car("Fiat", -1)).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_oversized_price_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.car_repo();

        let err = repo.insert(&new_car("Bugatti", i64::MAX)).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));

        let mut car = repo.insert(&new_car("Fiat", 3_000)).await.unwrap();
        car.daily_price_cents = i64::MAX / 2;
        let err = repo.update(&car).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
        assert_eq!(repo.get_by_id(car.id).await.unwrap().unwrap().daily_price_cents, 3_000);
    }
}
