//! Slot Machine Command Line
//!
//! Usage:
//!   rf-slot-sim spin --seed 7                 - One spin, JSON result
//!   rf-slot-sim analyze --config machine.yaml - Closed-form RTP report
//!   rf-slot-sim simulate --spins 1000000      - Parallel batch simulation
//!
//! Without `--config` the classic 5×3 preset is used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use rf_slot_engine::{
    MachineConfig, MachineParser, Money, RtpAnalyzer, RtpReport, SessionStats, SimulationConfig,
    Simulator, SpinResult, spin,
};

#[derive(Parser)]
#[command(name = "rf-slot-sim", about = "Slot machine spins, RTP analysis and simulation")]
struct Cli {
    /// Machine definition (.json, .yaml, .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin and print each result
    Spin {
        /// Wager in minor units (default: the bet increment)
        #[arg(short, long)]
        wager: Option<i64>,
        /// RNG seed (default: OS entropy)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Closed-form RTP report
    Analyze,
    /// Batch simulation
    Simulate {
        /// Number of spins
        #[arg(long, default_value_t = 1_000_000)]
        spins: u64,
        /// Wager in minor units (default: the bet increment)
        #[arg(short, long)]
        wager: Option<i64>,
        /// Base seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        /// Spins per parallel chunk
        #[arg(long, default_value_t = 10_000)]
        chunk_size: u64,
        /// Include the analytical report and the difference
        #[arg(long)]
        compare: bool,
    },
}

/// Simulation output
#[derive(Serialize)]
struct SimulationReport {
    machine: String,
    params: SimulationConfig,
    rtp: f64,
    line_rtp: f64,
    hit_rate: f64,
    stats: SessionStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<Comparison>,
}

#[derive(Serialize)]
struct Comparison {
    report: RtpReport,
    /// Simulated minus analytical total RTP
    rtp_difference: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let machine = load_machine(cli.config.as_deref())?;

    match cli.command {
        Commands::Spin { wager, seed, count } => run_spins(&machine, wager, seed, count),
        Commands::Analyze => print_json(&RtpAnalyzer::new(&machine).analyze()),
        Commands::Simulate {
            spins,
            wager,
            seed,
            chunk_size,
            compare,
        } => {
            let params = SimulationConfig {
                spins,
                wager: resolve_wager(&machine, wager),
                seed,
                chunk_size,
            };
            print_json(&simulate(&machine, params, compare)?)
        }
    }
}

fn load_machine(path: Option<&Path>) -> Result<MachineConfig> {
    match path {
        Some(path) => MachineParser::new()
            .load_file(path)
            .with_context(|| format!("Failed to load machine from {}", path.display())),
        None => MachineConfig::classic_5x3().context("Classic preset is invalid"),
    }
}

fn resolve_wager(machine: &MachineConfig, wager: Option<i64>) -> Money {
    wager.map_or(machine.min_bet_increment(), Money)
}

fn run_spins(
    machine: &MachineConfig,
    wager: Option<i64>,
    seed: Option<u64>,
    count: u32,
) -> Result<()> {
    if count == 0 {
        bail!("Spin count must be at least 1");
    }
    let wager = resolve_wager(machine, wager);
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let results = (0..count)
        .map(|_| spin(machine, wager, &mut rng))
        .collect::<Result<Vec<SpinResult>, _>>()
        .context("Spin failed")?;

    match results.as_slice() {
        [single] => print_json(single),
        _ => print_json(&results),
    }
}

fn simulate(
    machine: &MachineConfig,
    params: SimulationConfig,
    compare: bool,
) -> Result<SimulationReport> {
    let stats = Simulator::new(machine, params.clone())
        .run()
        .context("Simulation failed")?;

    let analysis = compare.then(|| {
        let report = RtpAnalyzer::new(machine).analyze();
        Comparison {
            rtp_difference: stats.rtp() - report.total_rtp,
            report,
        }
    });

    Ok(SimulationReport {
        machine: machine.name().to_string(),
        params,
        rtp: stats.rtp(),
        line_rtp: stats.line_rtp(),
        hit_rate: stats.hit_rate(),
        stats,
        analysis,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
