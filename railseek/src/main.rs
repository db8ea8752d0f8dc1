use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use railseek::api::{ClientConfig, QueryClient};
use railseek::cache::{CacheConfig, CachedClient};
use railseek::cli::Cli;
use railseek::output;
use railseek::query::{EngineConfig, QueryEngine, filter};
use railseek::stations::StationIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "railseek=debug"
    } else {
        "railseek=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Station table: explicit file wins over the bundled default.
    let stations = Arc::new(match &cli.stations_file {
        Some(path) => StationIndex::from_file(path)?,
        None => StationIndex::bundled(),
    });

    let today = chrono::Local::now().date_naive();
    let criteria = cli.criteria(today)?;

    let client = QueryClient::new(
        ClientConfig::new(),
        stations.clone(),
        criteria.seat_classes.clone(),
    )?;
    let cached = CachedClient::new(client, &CacheConfig::default());

    let engine = QueryEngine::new(&cached, stations.as_ref(), EngineConfig::default());
    let outcome = engine.run(&criteria).await?;
    let outcome = filter::cleanup(outcome, &criteria);

    if outcome.is_empty() {
        println!("No trains found.");
        return Ok(());
    }

    let seat_order: Vec<&str> = criteria.seat_classes.iter().map(|c| c.label()).collect();
    println!(
        "{} -> {} on {} (seats column: {})",
        criteria.origin,
        criteria.destination,
        criteria.date,
        seat_order.join("/")
    );
    println!("{}", output::render(&outcome));

    Ok(())
}
