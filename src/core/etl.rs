use crate::core::{LoadSummary, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Loaded(LoadSummary),
    /// Transformation finished and loading was skipped on request.
    DryRun { rows: usize },
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
    dry_run: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("--- Starting ETL Pipeline ---");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("--- Starting Data Extraction ---");
        let raw_data = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(raw_data).await?;
        self.monitor.log_stats("Transform");

        println!("\n--- Transformed Data Preview ---");
        println!("{}", result.preview);
        println!("-------------------------------\n");

        if self.dry_run {
            tracing::info!("🔍 DRY RUN MODE - skipping data loading");
            self.monitor.log_final_stats();
            return Ok(RunOutcome::DryRun {
                rows: result.rows.len(),
            });
        }

        // Load
        tracing::info!("--- Starting Data Loading ---");
        let summary = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        tracing::info!("--- Data Loading Finished ---");

        self.monitor.log_final_stats();
        tracing::info!("--- ETL Pipeline Finished ---");
        Ok(RunOutcome::Loaded(summary))
    }
}
