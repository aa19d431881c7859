use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::combat::{Attacker, Rng, Weapon};
use crate::data::load_config;
use crate::error::SimError;
use crate::export_csv::{write_report, ReportError, ReportFormat};
use crate::logging;
use crate::parallel::{TrialRunner, WorkerPool};
use crate::sweep::{run_sweep, SweepOptions};

#[derive(Debug, Parser)]
#[command(name = "critsim", about = "Estimate hit, crit and damage-per-round rates by simulation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run batches of rounds, one per armor class, and write the summary report.
    Simulate(SimulateArgs),
    /// Load and check a config without simulating.
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Path to the YAML config.
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,
    /// Report destination; stdout when omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Rounds simulated per armor class.
    #[arg(
        short = 'i',
        long = "iterations",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub iterations: u32,
    /// Re-run this many more times, adding 1 to the target armor class each time.
    #[arg(long = "ac", default_value_t = 0)]
    pub vary_ac: u32,
    /// 0 none, 1 error, 2 warning, 3 info, 4 trace.
    #[arg(
        short = 'l',
        long = "log-level",
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=4)
    )]
    pub log_level: u8,
    /// Seed for reproducible runs; drawn from the OS when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Worker threads; 0 uses every core.
    #[arg(long, default_value_t = 0)]
    pub workers: usize,
    /// Simulate on the calling thread only.
    #[arg(long)]
    pub sequential: bool,
    /// csv or json.
    #[arg(long, default_value = "csv")]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,
    #[arg(
        short = 'l',
        long = "log-level",
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=4)
    )]
    pub log_level: u8,
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };

    match cli.command {
        Command::Simulate(args) => handle_simulate(&args),
        Command::Validate(args) => handle_validate(&args),
    }
}

fn handle_simulate(args: &SimulateArgs) -> i32 {
    logging::init(args.log_level);
    match simulate(args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            1
        }
    }
}

/// Load the config, sweep the armor classes and write the report.
pub fn simulate(args: &SimulateArgs) -> Result<(), SimError> {
    let config = load_config(&args.config)?;
    let seed = args.seed.unwrap_or_else(Rng::entropy_seed);
    tracing::info!(
        name = %config.name,
        seed,
        trials = args.iterations,
        start_ac = config.target.armor_class,
        steps = args.vary_ac,
        "starting simulation"
    );

    let mut runner = TrialRunner::new(&config).with_pool(WorkerPool::with_workers(args.workers));
    if args.sequential {
        runner = runner.sequential();
    }
    let rows = run_sweep(
        &runner,
        config.target.armor_class,
        SweepOptions {
            steps: args.vary_ac,
            trials: args.iterations as usize,
            seed,
        },
    )?;

    match &args.output {
        Some(path) => write_report(BufWriter::new(create_output(path)?), &rows, args.format)?,
        None => write_report(io::stdout().lock(), &rows, args.format)?,
    }
    Ok(())
}

fn create_output(path: &Path) -> Result<File, ReportError> {
    File::create(path).map_err(|source| ReportError::Create {
        path: path.to_path_buf(),
        source,
    })
}

fn handle_validate(args: &ValidateArgs) -> i32 {
    logging::init(args.log_level);
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let attacker = Attacker::new(&config);
    let weapon = Weapon::new(&config);
    let feats: Vec<_> = config.feats.active().map(|feat| feat.as_str()).collect();
    println!(
        "config ok: '{}' attacks={} (+{} extra) threat={}-20 multiplier=x{} feats=[{}] ac={}",
        config.name,
        attacker.attacks_per_round(),
        attacker.extra_attacks(),
        weapon.modified_critical_threat().max(1),
        weapon.modified_crit_multiplier(),
        feats.join(","),
        config.target.armor_class
    );
    0
}
