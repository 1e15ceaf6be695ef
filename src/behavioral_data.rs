use clap::Parser;
use colored::Colorize;
use log::info;

use defi_fixtures::assembler::{assemble, behavioral_table};
use defi_fixtures::behavioral::BehavioralGenerator;
use defi_fixtures::cli::{init_logger, CommonArgs, GeneratorConfig};
use defi_fixtures::clock::SimClock;
use defi_fixtures::constants::{simulation_start, DEFAULT_BEHAVIORAL_COUNT, DEFAULT_INDEX_NAME};
use defi_fixtures::error::Result;
use defi_fixtures::output::{write_json, write_ndjson};
use defi_fixtures::stats::{behavioral_stats, display_behavioral_stats};

/// Generate swap transactions that carry behavioral fraud patterns
#[derive(Parser, Debug)]
#[command(name = "generate_behavioral_data", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Index name written into each NDJSON bulk directive
    #[arg(long, default_value = DEFAULT_INDEX_NAME)]
    index: String,

    /// Skip the NDJSON bulk file
    #[arg(long)]
    no_ndjson: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.common.verbose)?;

    let config = GeneratorConfig::from_args(&cli.common, DEFAULT_BEHAVIORAL_COUNT)?;
    config.ensure_out_dir()?;

    info!("Simulation clock starts at {}", simulation_start().to_rfc3339());
    let mut generator = BehavioralGenerator::new(config.rng(), SimClock::new(simulation_start()));
    let transactions = assemble(&mut generator, &behavioral_table(), config.count);

    let json_path = config.output_path(&format!("behavioral_defi_data_{}.json", config.count));
    write_json(&json_path, &transactions)?;
    println!("{} {}", "Saved to".green(), json_path.display());

    if !cli.no_ndjson {
        let ndjson_path = config.output_path(&format!("behavioral_defi_data_{}.ndjson", config.count));
        write_ndjson(&ndjson_path, &cli.index, &transactions)?;
        println!("{} {}", "Saved NDJSON to".green(), ndjson_path.display());
    }

    display_behavioral_stats(&behavioral_stats(&transactions));

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
