use crate::conf::load_or_default;
use crate::generator::LogGenerator;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Path to the HCL config file (defaults to ./logwatch.hcl when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log file to append to
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Average lines per minute
    #[arg(long)]
    pub rate: Option<f64>,

    /// Truncate the log before writing
    #[arg(long)]
    pub clear: bool,
}

impl GenerateArgs {
    pub fn build(&self) -> Result<LogGenerator> {
        let file = load_or_default(self.config.as_deref())
            .context("failed to load configuration")?
            .generator;

        let path = self.log.clone().unwrap_or(file.log_path);
        let rate = self.rate.unwrap_or(file.rate);

        Ok(LogGenerator::new(path, rate)?)
    }
}

/// Writes synthetic entries until Ctrl-C.
pub async fn run_generate(args: GenerateArgs) -> Result<()> {
    let generator = args.build()?;

    if args.clear {
        generator
            .clear()
            .with_context(|| format!("failed to clear {}", generator.path().display()))?;
    }

    let handle = generator.start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    info!("stopping log generator");
    handle.shutdown().await;

    Ok(())
}
