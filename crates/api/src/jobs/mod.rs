//! Background job scheduler and job implementations.

mod cleanup_expired;
mod pool_metrics;
mod scheduler;

pub use cleanup_expired::CleanupExpiredDonationsJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::JobScheduler;
