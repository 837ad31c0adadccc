use clap::Parser;
use topscorer_etl::utils::{logger, validation::Validate};
use topscorer_etl::{
    ApiFootballClient, CliConfig, EtlEngine, EtlError, LocalStorage, MySqlSink, RunOutcome,
    Settings, TopScorersPipeline,
};

fn report_failure(stage: &str, e: &EtlError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

async fn run(settings: Settings) -> Result<RunOutcome, EtlError> {
    let client = ApiFootballClient::new(&settings.source)?;
    let sink = if settings.dry_run {
        None
    } else {
        Some(MySqlSink::connect(&settings.database, &settings.load.table)?)
    };
    let storage = LocalStorage::new(settings.load.output_path.clone());
    let dry_run = settings.dry_run;
    let monitor = settings.monitor;

    let mut pipeline = TopScorersPipeline::new(client, storage, settings);
    if let Some(sink) = sink {
        pipeline = pipeline.with_sink(sink);
    }

    EtlEngine::new_with_monitoring(pipeline, monitor)
        .with_dry_run(dry_run)
        .run()
        .await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 先讀取 .env，clap 的環境變數後備值才會生效
    let dotenv_result = dotenvy::dotenv();

    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose, cli.json_logs);

    match &dotenv_result {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("⚠️ Could not read .env file: {}", e),
    }

    tracing::info!("Starting topscorer-etl");

    let settings = match cli.into_settings() {
        Ok(settings) => settings,
        Err(e) => report_failure("Loading configuration", &e),
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        report_failure("Configuration validation", &e);
    }
    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    match run(settings).await {
        Ok(RunOutcome::Loaded(summary)) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!(
                "✅ Loaded {} rows into `{}` (rows affected: {})",
                summary.rows_written, summary.table, summary.rows_affected
            );
            if let Some(path) = summary.csv_path {
                println!("📁 CSV saved to: {}", path);
            }
        }
        Ok(RunOutcome::DryRun { rows }) => {
            println!("🔍 Dry run finished: {} rows transformed, nothing loaded", rows);
        }
        Err(e) => report_failure("ETL process", &e),
    }

    Ok(())
}
