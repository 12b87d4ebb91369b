// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — epoch-gen
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Generate binary particle files for EPOCH.
//!
//! Usage:
//!   epoch-gen -d 2 --xmin -5e-6 --xmax 5e-6 --ymin -5e-6 --ymax 5e-6 \
//!     --nx 100 --ny 100 --ppc 16 -o run/ -p

use clap::Parser;
use epoch_cli::args::Args;
use epoch_cli::pipeline::run;
use std::process;
use tracing::{error, info};

fn main() {
    epoch_cli::init_logging();

    let args = Args::parse();
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    match run(&config) {
        Ok(report) => {
            for path in &report.files {
                info!("  {}", path.display());
            }
            if let Some(plot) = &report.plot {
                info!("  {}", plot.display());
            }
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
