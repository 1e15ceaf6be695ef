use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use log::info;

use defi_fixtures::assembler::{assemble, defi_table};
use defi_fixtures::cli::{init_logger, CommonArgs, GeneratorConfig};
use defi_fixtures::constants::DEFAULT_DEFI_COUNT;
use defi_fixtures::defi::DefiGenerator;
use defi_fixtures::error::Result;
use defi_fixtures::output::write_json;
use defi_fixtures::stats::{defi_stats, display_defi_stats, sample_attack};

/// Generate attack-tagged DeFi transactions with protocol events
#[derive(Parser, Debug)]
#[command(name = "generate_defi_data", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.common.verbose)?;

    let config = GeneratorConfig::from_args(&cli.common, DEFAULT_DEFI_COUNT)?;
    config.ensure_out_dir()?;

    // Timestamps are spread backwards from one anchor taken at startup
    let anchor = Utc::now();
    info!("Anchoring defi dataset at {}", anchor.to_rfc3339());

    let mut generator = DefiGenerator::new(config.rng(), anchor);
    let transactions = assemble(&mut generator, &defi_table(), config.count);

    let path = config.output_path(&format!("defi_transactions_{}.json", config.count));
    write_json(&path, &transactions)?;
    println!("{} {}", "Saved to".green(), path.display());

    let stats = defi_stats(&transactions);
    let sample = sample_attack(&transactions)?;
    display_defi_stats(&stats, sample.as_deref());

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
