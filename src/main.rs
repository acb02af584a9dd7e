use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

mod api;
mod config;
mod db;
mod error;
mod feed;
mod ingest;
mod models;
mod notify;

use api::AppState;
use config::Config;
use db::Repository;
use error::Result;
use feed::FetchAdapter;
use ingest::{Ingestor, Scheduler};
use notify::Notifier;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    let repository = Arc::new(Repository::new(&config.db_path).await?);

    // Check for --seed-sources flag (register curated feeds and exit)
    if args.len() >= 2 && args[1] == "--seed-sources" {
        let added = db::seed::seed_default_sources(&repository).await?;
        println!("Seeded {} sources", added);
        return Ok(());
    }

    let fetcher = FetchAdapter::new(
        Duration::from_secs(config.fetch_timeout_secs),
        config.newsapi_key.clone(),
    );
    let ingestor = Arc::new(Ingestor::new(repository.clone(), fetcher));

    // Check for --refresh flag (headless refresh)
    if args.len() >= 2 && args[1] == "--refresh" {
        match ingestor.refresh().await? {
            Some(summary) => println!(
                "Processed {} articles ({} new)",
                summary.processed, summary.inserted
            ),
            None => println!("A refresh is already in progress"),
        }
        return Ok(());
    }

    let notifier = Notifier::new();

    let scheduler = Scheduler::new(
        ingestor.clone(),
        notifier.clone(),
        Duration::from_secs(config.refresh_interval_minutes * 60),
        Duration::from_secs(config.initial_delay_secs),
    );
    tokio::spawn(scheduler.run());

    let state = AppState {
        repo: repository,
        ingestor,
        notifier,
    };

    let addr: SocketAddr = config
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address {}: {}", config.listen, e))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
