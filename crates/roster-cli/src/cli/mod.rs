//! CLI for the roster image auditor.

use anyhow::Result;
use clap::Parser;
use roster_core::audit;
use roster_core::config::{self, AuditConfig};
use std::io;
use std::path::PathBuf;

/// Check every player's image URL in a roster file and save an unmodified copy.
#[derive(Debug, Parser)]
#[command(name = "roster-audit")]
#[command(about = "Check player image URLs in a roster file", long_about = None)]
pub struct Cli {
    /// Roster JSON to read [default: currentroster.json].
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Where to write the copy [default: currentroster_02.json, or <input stem>_02.json with --input].
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Seconds each image HEAD probe may take, at least 1 [default: 5].
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("config unavailable, using defaults: {:#}", e);
                AuditConfig::default()
            }
        };
        let cfg = cli.apply(cfg);
        tracing::debug!("effective config: {:?}", cfg);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        audit::run_audit(&cfg, &mut out)?;
        Ok(())
    }

    /// Layer command-line overrides on top of the loaded config.
    pub fn apply(&self, mut cfg: AuditConfig) -> AuditConfig {
        if let Some(input) = &self.input {
            cfg.input_path = input.clone();
            cfg.output_path = config::sibling_output_path(input);
        }
        if let Some(output) = &self.output {
            cfg.output_path = output.clone();
        }
        if let Some(secs) = self.timeout_secs {
            cfg.probe_timeout_secs = secs;
        }
        cfg
    }
}
