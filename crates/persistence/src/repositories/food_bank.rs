//! Food bank repository for database operations.

use sqlx::PgPool;

use crate::entities::FoodBankEntity;
use crate::metrics::QueryTimer;

/// Repository for food bank profiles.
#[derive(Clone)]
pub struct FoodBankRepository {
    pool: PgPool,
}

impl FoodBankRepository {
    /// Creates a new FoodBankRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a food bank by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<FoodBankEntity>, sqlx::Error> {
        let timer = QueryTimer::start("find_food_bank_by_id");
        let result = sqlx::query_as::<_, FoodBankEntity>(
            r#"
            SELECT id, name, address, contact_phone, opening_hours, description,
                   created_at, updated_at
            FROM food_banks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish();
        result
    }
}
