//! Background job to purge expired donations nobody reserved.

use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

/// Deletes AVAILABLE donations whose expiration date passed more than the
/// retention window ago.
///
/// Reserved and completed donations are never touched: the assignment is the
/// pickup record and outlives the food's shelf life. The NOT EXISTS guard
/// plus the foreign key on donation_assignments keep an assigned row from
/// being removed even if it were to match.
pub struct CleanupExpiredDonationsJob {
    pool: PgPool,
    retention_days: u32,
    batch_size: i64,
}

impl CleanupExpiredDonationsJob {
    pub fn new(pool: PgPool, retention_days: u32) -> Self {
        Self {
            pool,
            retention_days,
            batch_size: 10_000,
        }
    }
}

#[async_trait::async_trait]
impl Job for CleanupExpiredDonationsJob {
    fn name(&self) -> &'static str {
        "cleanup_expired_donations"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let mut total_deleted: u64 = 0;

        loop {
            let result = sqlx::query(
                r#"
                WITH to_delete AS (
                    SELECT id
                    FROM donations
                    WHERE status = 'available'
                      AND expiration_date < NOW() - make_interval(days => $1)
                      AND NOT EXISTS (
                          SELECT 1 FROM donation_assignments a
                          WHERE a.donation_id = donations.id
                      )
                    LIMIT $2
                )
                DELETE FROM donations
                WHERE id IN (SELECT id FROM to_delete)
                "#,
            )
            .bind(self.retention_days as i32)
            .bind(self.batch_size)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete expired donations: {}", e))?;

            let deleted = result.rows_affected();
            total_deleted += deleted;

            if deleted < self.batch_size as u64 {
                break;
            }

            // Let other work interleave between full batches
            tokio::task::yield_now().await;
        }

        if total_deleted > 0 {
            info!(
                total_deleted,
                retention_days = self.retention_days,
                "Removed expired donations"
            );
        }

        Ok(())
    }
}
