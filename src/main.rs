use tracing_subscriber::EnvFilter;
use UnboundedQueueMini::core::config::DemoConfig;
use UnboundedQueueMini::core::error::QueueError;
use UnboundedQueueMini::core::runner::run_demo;

fn main() -> Result<(), QueueError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = DemoConfig::from_env()?;
    let report = run_demo(&config)?;

    // Append the journal as NDJSON
    let lines = report.journal.append_ndjson(&config.journal_path)?;
    tracing::info!(
        path = %config.journal_path.display(),
        lines,
        produced = report.produced,
        consumed = report.consumed,
        "journal written"
    );
    Ok(())
}
