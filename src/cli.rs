//! Command-line flags and run setup shared by both generator binaries.

use std::path::{Path, PathBuf};

use clap::Args;
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simple_logger::SimpleLogger;

use crate::error::{FixtureError, Result};

/// Flags common to every generator.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Requested number of transactions (realized count may be slightly lower)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Seed for reproducible output; omitted means a fresh entropy seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Directory the fixture files are written to
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub count: usize,
    pub seed: Option<u64>,
    pub out_dir: PathBuf,
}

impl GeneratorConfig {
    pub fn from_args(args: &CommonArgs, default_count: usize) -> Result<Self> {
        let count = args.count.unwrap_or(default_count);
        if count == 0 {
            return Err(FixtureError::Config("transaction count must be greater than zero".to_string()));
        }
        if args.out_dir.exists() && !args.out_dir.is_dir() {
            return Err(FixtureError::Config(format!(
                "output path {} is not a directory",
                args.out_dir.display()
            )));
        }
        Ok(GeneratorConfig {
            count,
            seed: args.seed,
            out_dir: args.out_dir.clone(),
        })
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.out_dir.join(file_name)
    }

    pub fn ensure_out_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.out_dir)?;
        Ok(&self.out_dir)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => {
                info!("Using seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }
}

pub fn init_logger(verbose: bool) -> Result<()> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|e| FixtureError::Logger(format!("Failed to initialize logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn args(count: Option<usize>) -> CommonArgs {
        CommonArgs {
            count,
            seed: Some(7),
            out_dir: PathBuf::from("."),
            verbose: false,
        }
    }

    #[test]
    fn test_default_count_applies() {
        let config = GeneratorConfig::from_args(&args(None), 1500).unwrap();
        assert_eq!(config.count, 1500);
        assert_eq!(config.output_path("a.json"), PathBuf::from("./a.json"));
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = GeneratorConfig::from_args(&args(Some(0)), 1500).unwrap_err();
        assert!(matches!(err, FixtureError::Config(_)));
    }

    #[test]
    fn test_file_as_out_dir_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut a = args(Some(10));
        a.out_dir = file.path().to_path_buf();
        assert!(GeneratorConfig::from_args(&a, 10).is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = GeneratorConfig::from_args(&args(Some(5)), 1).unwrap();
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
