use clap::Parser;
use priority_ingest::config::SchedulerConfig;
use priority_ingest::ingestion::handlers::router;
use priority_ingest::scheduler::service::Scheduler;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "priority-ingest")]
#[command(about = "In-memory priority batch ingestion service")]
#[command(version)]
struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, env = "INGEST_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Maximum number of ids per batch
    #[arg(long, env = "INGEST_BATCH_SIZE", default_value_t = 3)]
    batch_size: usize,

    /// Latency of the simulated upstream call per id, in milliseconds
    #[arg(long, env = "INGEST_ITEM_LATENCY_MS", default_value_t = 2_000)]
    item_latency_ms: u64,

    /// Minimum processing time per batch, in milliseconds
    #[arg(long, env = "INGEST_MIN_BATCH_MS", default_value_t = 5_000)]
    min_batch_ms: u64,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SchedulerConfig::default()
        .with_max_batch_size(cli.batch_size)
        .with_item_latency(Duration::from_millis(cli.item_latency_ms))
        .with_min_batch_duration(Duration::from_millis(cli.min_batch_ms));

    // 1. Scheduler state, shared for the lifetime of the process:
    let scheduler = Scheduler::new(config)?;
    tracing::info!("Scheduler configured: {:?}", scheduler.config());

    // 2. HTTP Router:
    let app = router(scheduler);

    // 3. Start HTTP server:
    tracing::info!("HTTP server listening on {}", cli.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
