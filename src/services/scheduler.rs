use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::clients::GraphProvider;
use crate::config::SchedulerConfig;
use crate::services::FranchiseService;
use crate::services::refresh::{RefreshReport, refresh_stale_graphs};

const JOB_NAME: &str = "refresh_graphs";

pub struct Scheduler {
    franchises: Arc<dyn FranchiseService>,
    provider: Arc<dyn GraphProvider>,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(
        franchises: Arc<dyn FranchiseService>,
        provider: Arc<dyn GraphProvider>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            franchises,
            provider,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let franchises = Arc::clone(&self.franchises);
        let provider = Arc::clone(&self.provider);
        let running = Arc::clone(&self.running);
        let batch = self.config.refresh_batch_size;

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let franchises = Arc::clone(&franchises);
            let provider = Arc::clone(&provider);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                run_refresh_job(franchises.as_ref(), provider.as_ref(), batch).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_mins = self.config.refresh_interval_minutes.max(1);
        info!("Scheduler running: graph refresh every {}m", interval_mins);

        let mut refresh_interval = interval(Duration::from_secs(u64::from(interval_mins) * 60));

        loop {
            refresh_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            run_refresh_job(
                self.franchises.as_ref(),
                self.provider.as_ref(),
                self.config.refresh_batch_size,
            )
            .await;
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn run_once(&self) -> Result<RefreshReport> {
        info!("Running manual graph refresh...");
        refresh_stale_graphs(
            self.franchises.as_ref(),
            self.provider.as_ref(),
            self.config.refresh_batch_size,
        )
        .await
    }
}

async fn run_refresh_job(
    franchises: &dyn FranchiseService,
    provider: &dyn GraphProvider,
    batch: u64,
) {
    let start = std::time::Instant::now();
    info!(event = "job_started", job_name = JOB_NAME, "Starting scheduled graph refresh");

    match refresh_stale_graphs(franchises, provider, batch).await {
        Ok(report) => info!(
            event = "job_finished",
            job_name = JOB_NAME,
            refreshed = report.refreshed,
            failed = report.failed,
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Scheduled graph refresh finished"
        ),
        Err(e) => error!(
            event = "job_failed",
            job_name = JOB_NAME,
            error = %e,
            "Scheduled graph refresh failed"
        ),
    }
}
