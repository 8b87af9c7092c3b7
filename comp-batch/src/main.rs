use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use comp_core::{CityId, Engine, NeighborhoodId, ReferenceStore, SeniorityLevel};
use comp_data::DataSet;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Batch compensation reports over the reference data.
///
/// Loads the reference CSVs once, runs every location through the
/// calculation pipeline concurrently, and writes the results as CSV.
#[derive(Debug, Parser)]
#[command(name = "comp-batch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the reference CSV files.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Anchor currency of the exchange-rate table.
    #[arg(long, default_value = "GBP")]
    anchor: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Budget tier salaries for every city and neighborhood.
    Tiers {
        /// Output CSV path; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// A job title priced into every city.
    Salaries {
        /// Job title name, as listed in job_titles.csv.
        #[arg(long)]
        job: String,

        /// Seniority band: entry, mid, or senior.
        #[arg(long, default_value = "mid")]
        level: String,

        /// Output CSV path; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── report rows ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TierRow {
    city: String,
    neighborhood: String,
    currency: String,
    monthly_rent: Decimal,
    monthly_essentials: Decimal,
    get_by: Decimal,
    comfortable: Decimal,
    live_well: Decimal,
    effective_rate_comfortable: Decimal,
}

#[derive(Debug, Serialize)]
struct SalaryRow {
    city: String,
    currency: String,
    adjusted_usd: Decimal,
    local_gross: Decimal,
    take_home_rate: Decimal,
}

// ─── batch runs ──────────────────────────────────────────────────────────────

/// Every location tuple a tiers run covers: each city on its own, then
/// each of its neighborhoods.
fn tier_targets(store: &ReferenceStore) -> Vec<(CityId, Option<NeighborhoodId>)> {
    let mut targets = Vec::new();
    for city in store.cities() {
        targets.push((city.id, None));
        for neighborhood in store.neighborhoods_of(city.id) {
            targets.push((city.id, Some(neighborhood.id)));
        }
    }
    targets
}

/// Fans the tuples out over tokio tasks and reassembles the rows in input
/// order. A tuple that fails is logged and skipped; the batch continues.
async fn run_tiers(store: Arc<ReferenceStore>) -> Vec<TierRow> {
    let targets = tier_targets(&store);
    let mut set = JoinSet::new();

    for (index, (city, neighborhood)) in targets.into_iter().enumerate() {
        let store = Arc::clone(&store);
        set.spawn(async move {
            let engine = Engine::new(&store);
            let row = engine.budget_tiers(city, neighborhood).map(|tiers| TierRow {
                city: store.city(city).name.clone(),
                neighborhood: neighborhood
                    .map(|id| store.neighborhood(id).name.clone())
                    .unwrap_or_default(),
                currency: tiers.currency.as_str().to_string(),
                monthly_rent: tiers.monthly_rent,
                monthly_essentials: tiers.monthly_essentials,
                get_by: tiers.get_by,
                comfortable: tiers.comfortable,
                live_well: tiers.live_well,
                effective_rate_comfortable: tiers.effective_rate_comfortable,
            });
            (index, city, neighborhood, row)
        });
    }

    let mut rows = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, _, _, Ok(row))) => rows.push((index, row)),
            Ok((_, city, neighborhood, Err(error))) => {
                warn!(
                    city = %store.city(city).name,
                    neighborhood = neighborhood
                        .map(|id| store.neighborhood(id).name.as_str())
                        .unwrap_or(""),
                    %error,
                    "skipping location"
                );
            }
            Err(error) => warn!(%error, "tier task panicked"),
        }
    }
    rows.sort_by_key(|(index, _)| *index);
    rows.into_iter().map(|(_, row)| row).collect()
}

async fn run_salaries(
    store: Arc<ReferenceStore>,
    job_name: &str,
    level: SeniorityLevel,
) -> anyhow::Result<Vec<SalaryRow>> {
    let job = store
        .resolve_job_title(job_name)
        .with_context(|| format!("job title '{job_name}' not in the reference data"))?;

    let mut set = JoinSet::new();
    for (index, city) in store.cities().map(|c| c.id).enumerate() {
        let store = Arc::clone(&store);
        set.spawn(async move {
            let engine = Engine::new(&store);
            let row = engine.job_salary_profile(job, level, city).map(|profile| {
                SalaryRow {
                    city: store.city(city).name.clone(),
                    currency: profile.currency.as_str().to_string(),
                    adjusted_usd: profile.adjusted_usd,
                    local_gross: profile.local_gross,
                    take_home_rate: profile.take_home_rate,
                }
            });
            (index, city, row)
        });
    }

    let mut rows = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, _, Ok(row))) => rows.push((index, row)),
            Ok((_, city, Err(error))) => {
                warn!(city = %store.city(city).name, %error, "skipping city");
            }
            Err(error) => warn!(%error, "salary task panicked"),
        }
    }
    rows.sort_by_key(|(index, _)| *index);
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}

// ─── output ──────────────────────────────────────────────────────────────────

fn write_rows<T: Serialize>(rows: &[T], out: Option<&PathBuf>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            let mut writer = csv::Writer::from_path(path)
                .with_context(|| format!("cannot open output file: {}", path.display()))?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        None => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let data = DataSet::from_dir(&cli.data_dir)
        .with_context(|| format!("loading reference data from {}", cli.data_dir.display()))?;
    let store = Arc::new(
        data.build_store(&cli.anchor)
            .context("reference data failed validation")?,
    );
    info!(
        cities = store.cities().count(),
        countries = store.countries().count(),
        "reference data loaded"
    );

    match &cli.command {
        Command::Tiers { out } => {
            let rows = run_tiers(Arc::clone(&store)).await;
            info!(rows = rows.len(), "tiers computed");
            write_rows(&rows, out.as_ref())?;
        }
        Command::Salaries { job, level, out } => {
            let level = SeniorityLevel::parse(level)
                .with_context(|| format!("unknown seniority level '{level}'"))?;
            let rows = run_salaries(Arc::clone(&store), job, level).await?;
            info!(rows = rows.len(), "salaries computed");
            write_rows(&rows, out.as_ref())?;
        }
    }

    Ok(())
}
