//! Implementation of the `funcpack bundle` command.
//!
//! Runs the build commands and packages the distribution directory, without
//! discovering functions or writing a plan.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use funcpack_lib::bundle;
use funcpack_lib::config::ProjectConfig;

use crate::output::{OutputFormat, print_archive, render};

pub fn cmd_bundle(config_path: &Path, variant: Option<&str>, skip_build: bool, format: OutputFormat) -> Result<()> {
  let config = ProjectConfig::load(config_path).context("Failed to load config")?;
  let spec = config
    .bundle_spec(variant, skip_build)
    .context("Failed to resolve build")?;

  info!(commands = spec.commands.len(), dist = %spec.dist.display(), "bundling");

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let archive = rt.block_on(bundle::build(&spec)).context("Bundle failed")?;
  let elapsed = started.elapsed();

  render(format, &archive, |archive| print_archive(archive, elapsed))
}
