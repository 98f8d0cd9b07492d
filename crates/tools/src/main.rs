use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use coordinator::{Coordinator, SessionConfig};
use observations::{ObservationStore, RecordSchema, ingest::parse_records_json};
use tools::{parse_event, report, run_script};
use tracing::info;
use tracing_subscriber::EnvFilter;
use views::{ChoroplethView, ScatterView};

/// Replays a linked map/scatter session over a JSON record file.
#[derive(Debug, Parser)]
#[command(name = "linked", version)]
struct Cli {
    /// JSON array of records (one object per entity and year).
    records: PathBuf,

    /// Field holding the entity id.
    #[arg(long, default_value = "entity")]
    entity_field: String,

    /// Field holding the year.
    #[arg(long, default_value = "year")]
    year_field: String,

    /// Session config (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Event to apply, in order: year=Y, year=all, focus=ID, clear, axes=X,Y.
    #[arg(long = "event", value_name = "EVENT")]
    events: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let events = cli
        .events
        .iter()
        .map(|arg| parse_event(arg).map(|t| (arg.clone(), t)))
        .collect::<Result<Vec<_>, _>>()?;

    let config = match &cli.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };

    let payload = fs::read_to_string(&cli.records)
        .with_context(|| format!("read {}", cli.records.display()))?;
    let raw = parse_records_json(&payload)
        .with_context(|| format!("parse {}", cli.records.display()))?;
    let schema = RecordSchema::new(cli.entity_field, cli.year_field);
    let store = ObservationStore::load(raw, &schema)?;

    let mut session = Coordinator::new(
        Arc::new(store),
        ChoroplethView::default(),
        ScatterView::new(),
        &config,
    )?;
    info!(events = events.len(), "replaying session");

    let steps = run_script(&mut session, &events);
    let out = report(&session, steps);
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
