//! Implementation of the `funcpack plan` command.
//!
//! Runs the whole pipeline: discovery and bundling, route projection, and the
//! deployment plan.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use funcpack_lib::config::ProjectConfig;
use funcpack_lib::pipeline::{self, PipelineOptions};

use crate::output::{OutputFormat, print_plan, render};

pub struct PlanArgs<'a> {
  pub variant: Option<&'a str>,
  pub skip_build: bool,
  pub out: Option<PathBuf>,
  pub no_write: bool,
  pub format: OutputFormat,
}

/// Execute the plan command.
///
/// # Errors
///
/// Returns an error if the config is invalid, discovery or the build fails, or
/// the plan cannot be written. Nothing is reported as planned on failure.
pub fn cmd_plan(config_path: &Path, args: PlanArgs<'_>) -> Result<()> {
  let config = ProjectConfig::load(config_path).context("Failed to load config")?;
  let options = PipelineOptions {
    variant: args.variant.map(str::to_string),
    skip_build: args.skip_build,
    plan_path: args.out,
    no_write: args.no_write,
  };

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt
    .block_on(pipeline::run(&config, &options))
    .context("Failed to produce deployment plan")?;
  let elapsed = started.elapsed();

  render(args.format, &result.plan, |_| print_plan(&result, elapsed))
}
