//! Assignment repository for database operations.

use sqlx::PgPool;

use crate::entities::AssignmentEntity;
use crate::metrics::QueryTimer;

/// Repository for donation assignment lookups.
///
/// Assignments are created and removed only by the donation lifecycle
/// transitions; this repository reads them for precondition checks and
/// response payloads.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Creates a new AssignmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find the assignment for a donation, if one exists. A donation has at
    /// most one.
    pub async fn find_by_donation_id(
        &self,
        donation_id: i64,
    ) -> Result<Option<AssignmentEntity>, sqlx::Error> {
        let timer = QueryTimer::start("find_assignment_by_donation_id");
        let result = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT id, donation_id, food_bank_id, accepted_at, picked_up_at
            FROM donation_assignments
            WHERE donation_id = $1
            "#,
        )
        .bind(donation_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish();
        result
    }
}
