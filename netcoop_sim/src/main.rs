//! NetCoop Simulator CLI
//!
//! Run seeded sessions of the network cooperation experiment.

use clap::Parser;
use netcoop_env::SessionConfig;
use netcoop_sim::scenarios::ScenarioId;
use netcoop_sim::{ScenarioResult, ScenarioRunner, SimExport};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// NetCoop deterministic session simulator
#[derive(Parser, Debug)]
#[command(name = "netcoop-sim")]
#[command(about = "Run seeded simulated sessions of the network cooperation experiment", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of groups per session
    #[arg(short, long, default_value = "4")]
    groups: usize,

    /// Scenario to run (ring_baseline, hub_baseline, free_riders, bayesian_ring, bayesian_hub, noisy_signals, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Number of consecutive seeds to test
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Session config JSON (network_type and parameter overrides)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export round-by-round data of a single scenario to a JSON file
    #[arg(long)]
    export: Option<String>,
}

impl Args {
    /// Rejects flag combinations that cannot be honoured.
    fn check(&self) -> Result<(), String> {
        if self.export.is_some() {
            if self.scenario == "all" {
                return Err("--export only supports a single scenario, not 'all'".to_string());
            }
            if self.seeds > 1 {
                return Err(format!("--export writes a single seed, got --seeds {}", self.seeds));
            }
        }
        Ok(())
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = args.check() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if !args.json {
        info!("NetCoop Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        match args.scenario.parse() {
            Ok(scenario) => vec![scenario],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Available scenarios: ring_baseline, hub_baseline, free_riders, bayesian_ring, bayesian_hub, noisy_signals, all");
                std::process::exit(1);
            }
        }
    };

    let session = match &args.config {
        Some(path) => match SessionConfig::load(path) {
            Ok(session) => Some(session),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let make_runner = |seed: u64| {
        let runner = ScenarioRunner::new(seed, args.groups);
        match &session {
            Some(session) => runner.with_session(session.clone()),
            None => runner,
        }
    };

    // Handle --export mode
    if let Some(export_path) = &args.export {
        let scenario = scenarios[0];
        let runner = make_runner(base_seed);

        info!("Running with export to: {}", export_path);
        let (world, report) = match runner.run_world(scenario) {
            Ok(done) => done,
            Err(e) => {
                error!("✗ {} FAILED: {}", scenario.name(), e);
                std::process::exit(1);
            }
        };
        let result = runner.evaluate(scenario, &world, &report);

        let mut export = SimExport::from_world(scenario.name(), &world);
        export.finalize(result.passed, result.failure_reason.clone());
        if let Err(e) = export.write_to_file(export_path) {
            error!("Failed to write export: {:?}", e);
            std::process::exit(1);
        }
        info!("Exported {} rounds to {}", export.frames.len(), export_path);

        if result.passed {
            info!("✓ {} (seed={}) PASSED", scenario.name(), base_seed);
        } else {
            error!(
                "✗ {} FAILED: {}",
                scenario.name(),
                result.failure_reason.as_deref().unwrap_or("unknown")
            );
            std::process::exit(1);
        }
        return;
    }

    // Run simulations
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = make_runner(seed);

        for scenario in &scenarios {
            let result = runner.run(*scenario);

            if !args.json {
                if result.passed {
                    info!(
                        "✓ {} (seed={}) PASSED | contribution={:.2} brier={:.3} signal_acc={:.3}",
                        scenario.name(),
                        seed,
                        result.metrics.mean_contribution_rate,
                        result.metrics.mean_brier_score,
                        result.metrics.signal_match_rate
                    );
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            if !result.passed {
                failed_count += 1;
            }

            all_results.push(result);
        }
    }

    // Summary
    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        // JSON output for CI parsing
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "rounds": r.metrics.rounds_played,
                    "groups": r.metrics.groups,
                    "contribution_rate": r.metrics.mean_contribution_rate,
                    "brier_score": r.metrics.mean_brier_score,
                    "signal_match_rate": r.metrics.signal_match_rate,
                    "bayesian_gap": r.metrics.mean_bayesian_gap,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);

            // List failed seeds
            for result in &all_results {
                if !result.passed {
                    error!(
                        "  - {} seed={}: {}",
                        result.scenario.name(),
                        result.seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
