//! Periodic background job infrastructure.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// How often a job runs.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)] // Minutes and Daily are available for future jobs
pub enum JobFrequency {
    /// Every N seconds.
    Seconds(u64),
    /// Every N minutes.
    Minutes(u64),
    /// Every hour.
    Hourly,
    /// Every day.
    Daily,
}

impl JobFrequency {
    pub fn period(&self) -> Duration {
        let secs = match self {
            JobFrequency::Seconds(n) => *n,
            JobFrequency::Minutes(n) => n * 60,
            JobFrequency::Hourly => 3_600,
            JobFrequency::Daily => 86_400,
        };
        Duration::from_secs(secs)
    }
}

/// A periodic background job.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// How often the job runs.
    fn frequency(&self) -> JobFrequency;

    /// Run one iteration. A failure is logged and the schedule continues.
    async fn execute(&self) -> Result<(), String>;
}

/// Runs registered jobs on their schedules until shutdown.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    handles: Vec<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            handles: Vec::new(),
            shutdown,
        }
    }

    /// Queue a job; it starts running once start() is called.
    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawn one task per registered job.
    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let task = drive_job(Arc::clone(job), self.shutdown.subscribe());
            self.handles.push(tokio::spawn(task));
        }
    }

    /// Signal every job task to stop. Returns immediately.
    pub fn shutdown(&self) {
        info!("Stopping job scheduler");
        let _ = self.shutdown.send(true);
    }

    /// Wait for the job tasks to finish, up to the timeout.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        info!(?timeout, "Draining job tasks");

        let drain = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Job task panicked");
                }
            }
        };

        if tokio::time::timeout(timeout, drain).await.is_err() {
            warn!(?timeout, "Job shutdown timed out");
        } else {
            info!("All jobs stopped");
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn drive_job(job: Arc<dyn Job>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(job.frequency().period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // An interval fires immediately; consume that tick so the first real
    // run happens one full period after startup
    ticker.tick().await;

    info!(job = job.name(), frequency = ?job.frequency(), "Job scheduled");

    loop {
        // run_once is awaited outside the select! so the non-Send
        // watch::Ref returned by wait_for is dropped before the await
        tokio::select! {
            _ = shutdown.wait_for(|stop| *stop) => {
                info!(job = job.name(), "Job shutting down");
                return;
            }
            _ = ticker.tick() => {}
        }
        run_once(job.as_ref()).await;
    }
}

async fn run_once(job: &dyn Job) {
    let started = std::time::Instant::now();
    info!(job = job.name(), "Job starting");

    match job.execute().await {
        Ok(()) => info!(
            job = job.name(),
            elapsed_ms = started.elapsed().as_millis(),
            "Job completed"
        ),
        Err(e) => error!(
            job = job.name(),
            elapsed_ms = started.elapsed().as_millis(),
            error = %e,
            "Job failed"
        ),
    }
}
