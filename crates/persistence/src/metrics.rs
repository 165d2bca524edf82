//! Query timing and connection pool instrumentation.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Times one repository query for the `database_query_duration_seconds`
/// histogram.
///
/// ```ignore
/// let timer = QueryTimer::start("reserve_donation");
/// let row = sqlx::query_as::<_, DonationEntity>(...).fetch_optional(&pool).await;
/// timer.finish();
/// ```
pub struct QueryTimer {
    name: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            started: Instant::now(),
        }
    }

    /// Consume the timer and report the elapsed wall time.
    pub fn finish(self) {
        histogram!("database_query_duration_seconds", "query" => self.name)
            .record(self.started.elapsed().as_secs_f64());
    }
}

/// Publish pool occupancy gauges. Driven by the scheduled pool metrics job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle() as u32;

    gauge!("database_connections_total").set(f64::from(size));
    gauge!("database_connections_idle").set(f64::from(idle));
    gauge!("database_connections_active").set(f64::from(size.saturating_sub(idle)));
}
