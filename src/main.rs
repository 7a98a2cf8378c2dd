use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use elog_client::bootstrap::tracing::init_tracing_subscriber;
use elog_client::bootstrap::{
    load_config_or_default, resolve_config_path, resolve_data_dir, wire_dependencies,
};
use elog_client::cli::{entry_line, filters_from_query, spotlight_from_query, CliArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    let config_path = resolve_config_path(args.config_file());
    let config = load_config_or_default(config_path.as_deref())?;

    let log_dir = resolve_data_dir(&config).map(|dir| dir.join("logs"));
    init_tracing_subscriber(log_dir.as_deref()).context("Failed to initialize tracing")?;
    info!(config = ?config_path, pages = args.pages, "elog-client starting");

    let deps = wire_dependencies(&config).await?;

    let spotlight = spotlight_from_query(&args.query);
    let mut snapshot = deps.feed.refresh(filters_from_query(&args.query)).await;
    if let Some(id) = &spotlight {
        snapshot = deps.feed.spotlight(id.clone()).await;
    }
    for _ in 1..args.pages {
        if snapshot.reached_bottom {
            break;
        }
        snapshot = deps.feed.load_more().await;
    }

    for entry in &snapshot.entries {
        println!("{}", entry_line(entry, spotlight.as_ref()));
    }
    if snapshot.reached_bottom {
        println!("-- end of log --");
    }
    if let Some(query) = deps.feed_events.last_query() {
        warn!(query = %query, "Feed replaced the requested filters");
    }

    Ok(())
}
