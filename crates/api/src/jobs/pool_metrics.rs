//! Connection pool gauge snapshots.

use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};

const SNAPSHOT_EVERY_SECS: u64 = 30;

/// Publishes pool occupancy gauges on a fixed cadence.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(SNAPSHOT_EVERY_SECS)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_job_identity() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/foodbridge")
            .unwrap();
        let job = PoolMetricsJob::new(pool);
        assert_eq!(job.name(), "pool_metrics");
        assert!(matches!(
            job.frequency(),
            JobFrequency::Seconds(SNAPSHOT_EVERY_SECS)
        ));
    }
}
