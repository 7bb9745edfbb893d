//! vernier: batch runner for the community product database.
//!
//! An external scheduler (cron, a systemd timer) invokes one-shot
//! subcommands; `watch` loops in process for deployments without one.
//! Store-level run locks keep an overlapping tick from doubling up.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use vernier_core::config::VernierConfig;
use vernier_core::constants::{ESCALATION_LOCK, SCORING_LOCK};
use vernier_core::models::{ConfidenceDelta, EscalationReport, ScoringReport};
use vernier_core::traits::{DisputeStore, ProductStore, RunLockStore};
use vernier_core::{Dispute, Product, RunControl};
use vernier_escalation::EscalationEngine;
use vernier_scoring::ScoringEngine;
use vernier_store::StorageEngine;

#[derive(Parser)]
#[command(name = "vernier")]
#[command(about = "Maintenance engine for the community product database")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file (falls back to VERNIER_CONFIG,
    /// then to built-in defaults)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database file, overriding the configured path
    #[arg(long, global = true, value_name = "PATH")]
    db_path: Option<PathBuf>,

    /// Print reports as pretty JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one confidence scoring pass
    Score {
        /// Recompute a single product instead of the whole catalog
        #[arg(long, value_name = "SKU")]
        sku: Option<String>,
    },
    /// Run one escalation sweep
    Escalate,
    /// Run both passes, scoring first
    Run,
    /// Keep both passes running on their configured intervals
    Watch,
    /// Import a JSON snapshot of products and disputes
    Import {
        /// Snapshot file: {"products": [...], "disputes": [...]}
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
}

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vernier=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let mut config =
        VernierConfig::resolve(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.db_path {
        config.store.db_path = path;
    }

    let store = StorageEngine::open(&config.store.db_path)
        .with_context(|| format!("opening store at {}", config.store.db_path.display()))?;

    match cli.command {
        Commands::Score { sku } => run_score(&store, &config, sku.as_deref(), cli.json),
        Commands::Escalate => run_escalate(&store, &config, cli.json),
        Commands::Run => run_both(&store, &config, cli.json),
        Commands::Watch => run_watch(&store, &config),
        Commands::Import { file } => run_import(&store, &file, cli.json),
    }
}

// ── subcommands ──

fn run_score(
    store: &StorageEngine,
    config: &VernierConfig,
    sku: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    // A single-product recompute is a targeted fix-up; it skips the
    // batch lock because its one field-scoped write cannot double up.
    if let Some(sku) = sku {
        let engine = ScoringEngine::new();
        let Some(delta) = engine.score_one(store, sku)? else {
            anyhow::bail!("no product with sku {sku:?}");
        };
        print_delta(&delta, as_json)?;
        return Ok(());
    }

    match scoring_pass(store, config, &ScoringEngine::new())? {
        Some(report) => print_scoring_report(&report, as_json)?,
        None => println!("scoring: another run holds the lock, nothing to do"),
    }
    Ok(())
}

fn run_escalate(
    store: &StorageEngine,
    config: &VernierConfig,
    as_json: bool,
) -> anyhow::Result<()> {
    match escalation_pass(store, config, &EscalationEngine::new(&config.escalation))? {
        Some(report) => print_escalation_report(&report, as_json)?,
        None => println!("escalation: another run holds the lock, nothing to do"),
    }
    Ok(())
}

fn run_both(store: &StorageEngine, config: &VernierConfig, as_json: bool) -> anyhow::Result<()> {
    let scoring = scoring_pass(store, config, &ScoringEngine::new())?;
    let escalation =
        escalation_pass(store, config, &EscalationEngine::new(&config.escalation))?;

    if as_json {
        let combined = serde_json::json!({
            "scoring": scoring,
            "escalation": escalation,
        });
        println!("{}", serde_json::to_string_pretty(&combined)?);
        return Ok(());
    }
    match &scoring {
        Some(report) => print_scoring_report(report, false)?,
        None => println!("scoring: another run holds the lock, nothing to do"),
    }
    match &escalation {
        Some(report) => print_escalation_report(report, false)?,
        None => println!("escalation: another run holds the lock, nothing to do"),
    }
    Ok(())
}

/// In-process scheduler for deployments without cron. Each pass runs on
/// its own cadence; a failed pass is logged and retried next interval,
/// the loop itself never stops.
fn run_watch(store: &StorageEngine, config: &VernierConfig) -> anyhow::Result<()> {
    let scoring = ScoringEngine::new();
    let escalation = EscalationEngine::new(&config.escalation);

    info!(
        scoring_enabled = config.scoring.enabled,
        scoring_interval_secs = config.scoring.interval_secs,
        escalation_enabled = config.escalation.enabled,
        escalation_interval_secs = config.escalation.interval_secs,
        "watch loop started"
    );

    let mut next_scoring = Instant::now();
    let mut next_escalation = Instant::now();

    loop {
        let now = Instant::now();

        if config.scoring.enabled && now >= next_scoring {
            if let Err(error) = scoring_pass(store, config, &scoring) {
                warn!(error = %error, "scoring pass failed, retrying next interval");
            }
            next_scoring = now + Duration::from_secs(config.scoring.interval_secs.max(1));
        }

        if config.escalation.enabled && now >= next_escalation {
            if let Err(error) = escalation_pass(store, config, &escalation) {
                warn!(error = %error, "escalation sweep failed, retrying next interval");
            }
            next_escalation = now + Duration::from_secs(config.escalation.interval_secs.max(1));
        }

        std::thread::sleep(Duration::from_secs(1));
    }
}

/// A snapshot as exported by the webapp: camelCase fields, timestamps in
/// whatever shape that dump produced.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Snapshot {
    products: Vec<Product>,
    disputes: Vec<Dispute>,
}

fn run_import(store: &StorageEngine, file: &Path, as_json: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;

    let mut products = 0usize;
    for product in &snapshot.products {
        store
            .upsert_product(product)
            .with_context(|| format!("importing product {}", product.sku))?;
        products += 1;
    }

    let mut disputes = 0usize;
    for dispute in &snapshot.disputes {
        store
            .upsert_dispute(dispute)
            .with_context(|| format!("importing dispute {}", dispute.id))?;
        disputes += 1;
    }

    info!(products, disputes, "snapshot imported");
    if as_json {
        println!(
            "{}",
            serde_json::json!({ "products": products, "disputes": disputes })
        );
    } else {
        println!("imported {products} products, {disputes} disputes");
    }
    Ok(())
}

// ── pass drivers, shared by the one-shot commands and the watch loop ──

fn scoring_pass(
    store: &StorageEngine,
    config: &VernierConfig,
    engine: &ScoringEngine,
) -> anyhow::Result<Option<ScoringReport>> {
    with_run_lock(store, SCORING_LOCK, config.store.run_lock_ttl_secs, || {
        Ok(engine.score_all(store, &RunControl::unbounded())?)
    })
}

fn escalation_pass(
    store: &StorageEngine,
    config: &VernierConfig,
    engine: &EscalationEngine,
) -> anyhow::Result<Option<EscalationReport>> {
    with_run_lock(store, ESCALATION_LOCK, config.store.run_lock_ttl_secs, || {
        Ok(engine.escalate_all(store, &RunControl::unbounded())?)
    })
}

/// Run `f` under the named store lock. When an overlapping scheduler
/// tick finds the lock held, the pass is skipped (`None`) and the
/// process exits cleanly; cron must never see that as a failure.
fn with_run_lock<T>(
    store: &StorageEngine,
    name: &'static str,
    ttl_secs: u64,
    f: impl FnOnce() -> anyhow::Result<T>,
) -> anyhow::Result<Option<T>> {
    let holder = lock_holder();
    if !store.try_acquire(name, &holder, ttl_secs)? {
        warn!(lock = name, holder = %holder, "another run holds the lock, skipping");
        return Ok(None);
    }

    let result = f();

    if let Err(error) = store.release(name, &holder) {
        warn!(lock = name, error = %error, "failed to release run lock");
    }
    result.map(Some)
}

fn lock_holder() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{host}:{}", std::process::id())
}

// ── report printing ──

fn print_delta(delta: &ConfidenceDelta, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(delta)?);
    } else {
        println!("{}: {} -> {}", delta.sku, delta.previous, delta.updated);
    }
    Ok(())
}

fn print_scoring_report(report: &ScoringReport, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!(
        "scoring: scanned {} updated {} unchanged {} errored {}{} in {} ms",
        report.scanned,
        report.updated,
        report.unchanged,
        report.errored,
        if report.partial { " (partial)" } else { "" },
        report.duration_ms,
    );
    for delta in &report.deltas {
        println!("  {}: {} -> {}", delta.sku, delta.previous, delta.updated);
    }
    Ok(())
}

fn print_escalation_report(report: &EscalationReport, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!(
        "escalation: scanned {} granted {} skipped {} race-lost {} errored {}{} in {} ms",
        report.scanned,
        report.granted,
        report.skipped.total(),
        report.race_lost,
        report.errored,
        if report.partial { " (partial)" } else { "" },
        report.duration_ms,
    );
    for outcome in &report.outcomes {
        println!(
            "  {} on {}: {}",
            outcome.dispute_id, outcome.product_sku, outcome.outcome
        );
    }
    Ok(())
}
