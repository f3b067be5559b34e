//! meetgraph - import a Meetup event into a Neo4j graph.
//!
//! Fetches the event, its organizing group, every group member with the
//! groups they belong to, and the event RSVPs, then merges them into Neo4j.
//! Re-running with the same event id converges to the same graph.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use meetgraph_core::{parse_event_id, Config};
use meetgraph_graph::{run_sync, GraphClient, GraphStore, SyncOptions};
use meetgraph_meetup::{IntervalGate, MeetupClient};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod output;

#[derive(Parser)]
#[command(name = "meetgraph")]
#[command(about = "Import a Meetup event, its group, members and RSVPs into Neo4j")]
#[command(version)]
struct Cli {
    /// Meetup event id
    #[arg(value_parser = parse_event_id)]
    event_id: i64,

    /// Do not declare constraints and indexes
    #[arg(long)]
    skip_schema: bool,

    /// Delete every node and relationship before importing
    #[arg(long)]
    drop_db: bool,

    /// Configuration file (defaults to ./meetgraph.toml, then the user config dir)
    #[arg(long, env = "MEETGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the sync report as JSON
    #[arg(long)]
    json: bool,
}

/// Initialize tracing with optional file logging.
///
/// In JSON mode console logs go to stderr so stdout carries only the report.
fn init_tracing(log_file: Option<&Path>, verbose: bool, json: bool) -> Result<()> {
    let default_filter = if verbose {
        "meetgraph=debug,meetgraph_graph=debug,meetgraph_meetup=debug,meetgraph_core=debug"
    } else {
        "meetgraph=info,meetgraph_graph=info,meetgraph_meetup=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!json);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.verbose, cli.json)?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let api = MeetupClient::new(&config.meetup).context("Failed to create Meetup client")?;
    let graph = GraphClient::connect(&config.graph)
        .await
        .with_context(|| format!("Failed to connect to Neo4j at {}", config.graph.uri))?;
    let mut gate = IntervalGate::from_millis(config.sync.request_interval_ms);

    let options = SyncOptions {
        skip_schema: cli.skip_schema,
        drop_db: cli.drop_db,
    };

    if !cli.json {
        println!("{} {}", "Importing Meetup event".bold(), cli.event_id.to_string().cyan());
    }

    let report = run_sync(&graph, &api, &mut gate, cli.event_id, options)
        .await
        .with_context(|| format!("Import of event {} failed", cli.event_id))?;

    let counts = match graph.counts().await {
        Ok(counts) => Some(counts),
        Err(e) => {
            warn!(error = %e, "Could not read graph counts");
            None
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report, counts.as_ref());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["meetgraph", "42"]).unwrap();
        assert_eq!(cli.event_id, 42);
        assert!(!cli.skip_schema);
        assert!(!cli.drop_db);
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["meetgraph", "--skip-schema", "--drop-db", "-v", "--json", "7"]).unwrap();
        assert_eq!(cli.event_id, 7);
        assert!(cli.skip_schema);
        assert!(cli.drop_db);
        assert!(cli.verbose);
        assert!(cli.json);
    }

    #[test]
    fn test_rejects_bad_event_id() {
        assert!(Cli::try_parse_from(["meetgraph", "0"]).is_err());
        assert!(Cli::try_parse_from(["meetgraph", "abc"]).is_err());
        assert!(Cli::try_parse_from(["meetgraph"]).is_err());
    }
}
