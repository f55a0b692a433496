use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use preclab::config::{HarnessConfig, RhsConditioning};
use preclab::harness::{render, Harness};
use preclab::logging::{init_logging, LogOptions};

#[derive(Parser, Debug)]
#[command(name = "eigen_harness")]
#[command(about = "Smallest generalized eigenvalue of a seeded random pencil, computed in several precisions")]
struct Args {
    /// Matrix dimension
    n: NonZeroUsize,

    /// YAML harness configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print bare values without regime labels
    #[arg(long)]
    plain: bool,

    /// Solve against the right-hand random matrix as drawn
    #[arg(long)]
    raw_rhs: bool,

    /// Also run the f64 LAPACK regime
    #[arg(long)]
    baseline: bool,

    /// Working precision of the MPFR regimes, in bits
    #[arg(long)]
    mpfr_bits: Option<u32>,

    #[arg(long)]
    lhs_seed: Option<u64>,

    #[arg(long)]
    rhs_seed: Option<u64>,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&LogOptions { level: args.log_level.clone(), json: args.log_json });

    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(bits) = args.mpfr_bits {
        config = config.with_mpfr_bits(bits);
    }
    if let Some(seed) = args.lhs_seed {
        config.lhs_seed = seed;
    }
    if let Some(seed) = args.rhs_seed {
        config.rhs_seed = seed;
    }
    if args.raw_rhs {
        config.rhs_conditioning = RhsConditioning::Raw;
    }
    if args.baseline {
        config = config.with_baseline();
    }
    config.validate().context("invalid harness configuration")?;

    let reports = Harness::new(config).run(args.n.get())?;
    print!("{}", render(&reports, !args.plain));

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        error!(failed, total = reports.len(), "some regimes failed");
    }
    Ok(())
}
