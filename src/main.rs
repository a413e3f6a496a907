//! skyroster - mission assignment runner
//!
//! # Usage
//!
//! ```bash
//! # Assign every mission in ./data and record the run
//! skyroster run
//!
//! # See what would happen without touching the workbook
//! skyroster run --dry-run --json
//!
//! # Inspect the roster and past runs
//! skyroster roster
//! skyroster history --limit 5
//!
//! # Write a starter config
//! skyroster init-config
//! ```
//!
//! # Environment Variables
//!
//! - `SKYROSTER_CONFIG`: Path to a dispatch config TOML file
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use skyroster::config::{defaults, DispatchConfig};
use skyroster::storage::ProcessLock;
use skyroster::{
    AssignmentCoordinator, AssignmentLedger, CsvWorkbook, InMemoryStore, MatchPolicy,
    RecordStore, RunReport, TracingSink,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "skyroster")]
#[command(about = "Pilot and drone assignment for field missions")]
#[command(version)]
struct CliArgs {
    /// Dispatch config file (overrides SKYROSTER_CONFIG and ./dispatch_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Assign pilots and drones to every mission in the workbook
    Run {
        /// Workbook directory (overrides roster.data_dir)
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
        /// Run against an in-memory copy; nothing is written or recorded
        #[arg(long)]
        dry_run: bool,
        /// Print the full run report as JSON
        #[arg(long)]
        json: bool,
        /// Do not record this run in the ledger
        #[arg(long)]
        no_ledger: bool,
    },

    /// Show pilots and drones with their status and assignment
    Roster {
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Show recent runs from the ledger
    History {
        #[arg(long, default_value_t = defaults::DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },

    /// Write the default config as TOML
    InitConfig {
        #[arg(long, default_value = defaults::CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = match &args.config {
        Some(path) => DispatchConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DispatchConfig::load(),
    };

    match args.command {
        SubCommand::Run {
            data_dir,
            dry_run,
            json,
            no_ledger,
        } => run(config, data_dir, dry_run, json, no_ledger),
        SubCommand::Roster { data_dir } => show_roster(config, data_dir),
        SubCommand::History { limit } => show_history(&config, limit),
        SubCommand::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            DispatchConfig::default()
                .save_to_file(&path)
                .context("Failed to write config")?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn open_workbook(config: &mut DispatchConfig, data_dir: Option<PathBuf>) -> Result<CsvWorkbook> {
    if let Some(dir) = data_dir {
        config.roster.data_dir = dir;
    }
    CsvWorkbook::from_config(&config.roster).with_context(|| {
        format!(
            "Failed to open roster workbook in {}",
            config.roster.data_dir.display()
        )
    })
}

fn run(
    mut config: DispatchConfig,
    data_dir: Option<PathBuf>,
    dry_run: bool,
    json: bool,
    no_ledger: bool,
) -> Result<()> {
    let mut workbook = open_workbook(&mut config, data_dir)?;
    let policy = MatchPolicy::from(&config.policy);

    let report = if dry_run {
        let mut snapshot =
            InMemoryStore::snapshot(&workbook).context("Failed to load roster for dry run")?;
        AssignmentCoordinator::new(&mut snapshot, TracingSink, policy)
            .dry_run(true)
            .run()
            .context("Dry run failed")?
    } else {
        let _lock = ProcessLock::acquire(workbook.dir())?;
        let report = AssignmentCoordinator::new(&mut workbook, TracingSink, policy)
            .run()
            .context("Assignment run failed")?;
        if config.ledger.enabled && !no_ledger {
            record_run(&config, &report);
        }
        report
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?
        );
    } else {
        print_report(&report);
    }

    if report.unpersisted() > 0 {
        warn!(
            count = report.unpersisted(),
            "Some assignments were not written back to the workbook"
        );
    }
    Ok(())
}

/// A ledger failure is logged; the assignments themselves already landed.
fn record_run(config: &DispatchConfig, report: &RunReport) {
    match AssignmentLedger::open(&config.ledger.path).and_then(|ledger| ledger.record(report)) {
        Ok(()) => info!(path = %config.ledger.path.display(), "Run recorded"),
        Err(e) => error!(path = %config.ledger.path.display(), error = %e, "Failed to record run"),
    }
}

fn print_report(report: &RunReport) {
    for outcome in &report.outcomes {
        let pilot = outcome.pilot.as_deref().unwrap_or("-");
        let drone = outcome.drone.as_deref().unwrap_or("-");
        let cost = outcome
            .cost
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let flag = if outcome.reassigned { " (reassigned)" } else { "" };
        println!(
            "{:<12} {:<16} {:<16} {:<16} {:>10}{}",
            outcome.mission,
            outcome.terminal.to_string(),
            pilot,
            drone,
            cost,
            flag
        );
    }
    let mode = if report.dry_run { " [dry run]" } else { "" };
    println!("{report}{mode}");
}

fn show_roster(mut config: DispatchConfig, data_dir: Option<PathBuf>) -> Result<()> {
    let workbook = open_workbook(&mut config, data_dir)?;
    let pilots = workbook.list_pilots().context("Failed to read pilots")?;
    let drones = workbook.list_drones().context("Failed to read drones")?;

    println!("Pilots ({})", pilots.len());
    for p in &pilots {
        println!(
            "  {:<20} {:<12} {:<14} {:<12} skills: {} | certs: {}",
            p.name,
            p.status.as_str(),
            p.current_assignment.as_deref().unwrap_or("-"),
            p.location,
            p.skills,
            p.certifications
        );
    }
    println!("Drones ({})", drones.len());
    for d in &drones {
        println!(
            "  {:<20} {:<12} {:<14} weather: {}",
            d.drone_id,
            d.status.as_str(),
            d.current_assignment.as_deref().unwrap_or("-"),
            d.weather_resistance
        );
    }
    Ok(())
}

fn show_history(config: &DispatchConfig, limit: usize) -> Result<()> {
    let ledger = AssignmentLedger::open(&config.ledger.path).with_context(|| {
        format!("Failed to open ledger {}", config.ledger.path.display())
    })?;
    let runs = ledger.recent(limit);
    if runs.is_empty() {
        println!("No runs recorded");
        return Ok(());
    }
    for run in &runs {
        println!(
            "{}  {:<12} {}",
            run.finished_at.format("%Y-%m-%d %H:%M:%S"),
            run.backend,
            run
        );
    }
    println!("{} of {} runs shown", runs.len(), ledger.count());
    Ok(())
}
