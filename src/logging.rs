// Logging setup shared by both binaries

use crate::config::Config;
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io::Write;

/// Initialize logging, optionally redirected to the configured log file.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging(config: &Config) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    // Create/clear log file if enabled
    if config.debug.log_to_file {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&config.debug.log_file)
            .with_context(|| format!("Failed to open log file: {}", config.debug.log_file))?;

        writeln!(file, "=== Raytracer Log ===")?;
        writeln!(file, "Started: {:?}", std::time::SystemTime::now())?;
        writeln!(file)?;

        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Logger already initialized")?;
    Ok(())
}
