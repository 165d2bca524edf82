//! Establishment repository for database operations.

use sqlx::PgPool;

use crate::entities::EstablishmentEntity;
use crate::metrics::QueryTimer;

/// Repository for establishment profiles.
#[derive(Clone)]
pub struct EstablishmentRepository {
    pool: PgPool,
}

impl EstablishmentRepository {
    /// Creates a new EstablishmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find an establishment by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<EstablishmentEntity>, sqlx::Error> {
        let timer = QueryTimer::start("find_establishment_by_id");
        let result = sqlx::query_as::<_, EstablishmentEntity>(
            r#"
            SELECT id, name, address, contact_phone, opening_hours, description,
                   created_at, updated_at
            FROM establishments
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
