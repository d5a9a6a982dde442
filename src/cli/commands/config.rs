//! Configuration command implementations

use anyhow::Result;

use crate::cli::Output;
use crate::config::BatchprocConfig;

/// Print the merged configuration as TOML
pub fn show(config: &BatchprocConfig, output: &Output) -> Result<()> {
    output.plain(&config.to_toml()?);
    Ok(())
}
