use lobsim_sim::{RunSummary, SimulationConfig, SimulationRunner};
use std::path::{Path, PathBuf};

fn print_help() {
    eprintln!(
        r#"lobsim - Hawkes-driven limit order book simulator

USAGE:
    lobsim [OPTIONS]

OPTIONS:
    --config <PATH>     Load run configuration from a JSON file
    --events <N>        Override the number of events to simulate
    --seed <N>          Override the event-process seed
    --output <PATH>     Write per-event CSV records to PATH
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run with defaults (six-dimensional Hawkes, 800 events)
    lobsim

    # Run a configured simulation and record it
    lobsim --config run.json --output lob_events.csv

    # Quick reproducible spot check
    lobsim --events 200 --seed 7
"#
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut events_override: Option<u64> = None;
    let mut seed_override: Option<u64> = None;
    let mut output_override: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return;
            }
            "--config" | "-c" => {
                i += 1;
                config_path = Some(require_value(&args, i, "--config"));
            }
            "--events" => {
                i += 1;
                events_override = Some(require_number(&args, i, "--events"));
            }
            "--seed" => {
                i += 1;
                seed_override = Some(require_number(&args, i, "--seed"));
            }
            "--output" | "-o" => {
                i += 1;
                output_override = Some(PathBuf::from(require_value(&args, i, "--output")));
            }
            arg => {
                eprintln!("Unknown argument: {arg}");
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {path}");
            match SimulationConfig::from_file(Path::new(&path)) {
                Ok(config) => config,
                Err(error) => {
                    eprintln!("Failed to load {path}: {error}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            log::info!("Using default configuration");
            SimulationConfig::default()
        }
    };

    if let Some(events) = events_override {
        config.num_events = events;
    }
    if let Some(seed) = seed_override {
        config.seed = seed;
    }
    if let Some(path) = output_override {
        config.output = Some(path);
    }

    log::info!(
        "Starting simulation: symbol={} events={} seed={} at {}",
        config.symbol,
        config.num_events,
        config.seed,
        chrono::Utc::now().to_rfc3339()
    );
    if let Some(path) = &config.output {
        log::info!("Recording events to {}", path.display());
    }

    let mut runner = match SimulationRunner::new(config) {
        Ok(runner) => runner,
        Err(error) => {
            eprintln!("Failed to start simulation: {error}");
            std::process::exit(1);
        }
    };

    match runner.run() {
        Ok(summary) => print_summary(&summary),
        Err(error) => {
            eprintln!("Simulation failed: {error}");
            std::process::exit(1);
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("=== Run summary ===");
    println!("Events generated: {}", summary.events_generated);
    println!("Events applied:   {}", summary.events_applied);
    println!("Events rejected:  {}", summary.events_rejected);
    println!("Side refills:     {}", summary.refills);
    println!("End time:         {:.3}", summary.end_time);
    println!("Average spread:   {:.4}", summary.avg_spread);
    if let Some(mid) = summary.final_mid {
        println!("Final mid:        {mid:.4}");
    }
}

fn require_value(args: &[String], index: usize, flag: &str) -> String {
    match args.get(index) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {flag} requires a value");
            std::process::exit(1);
        }
    }
}

fn require_number(args: &[String], index: usize, flag: &str) -> u64 {
    let raw = require_value(args, index, flag);
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Error: {flag} expects a number, got {raw}");
            std::process::exit(1);
        }
    }
}
