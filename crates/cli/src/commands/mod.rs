pub mod inspect;
pub mod run;
pub mod strategies;
pub mod version;

use std::path::Path;

use anyhow::{Context, Result};
use mazeprobe_kernel::config::ProbeConfig;

/// Logs go to stderr so stdout carries only the report.
pub fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults + `<root>/.mazeprobe/config.yaml` + environment.
pub fn load_config(root: &Path) -> Result<ProbeConfig> {
    let mut config = ProbeConfig::load(Some(root))
        .with_context(|| format!("failed to load config under {}", root.display()))?;
    config.apply_env();
    Ok(config)
}
