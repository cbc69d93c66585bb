//! Implementation of the `funcpack discover` command.

use std::path::Path;

use anyhow::{Context, Result};

use funcpack_lib::config::ProjectConfig;
use funcpack_lib::discover::modules_root;
use funcpack_lib::pipeline::discover_functions;

use crate::output::{OutputFormat, print_functions, render};

pub fn cmd_discover(config_path: &Path, format: OutputFormat, verbose: bool) -> Result<()> {
  let config = ProjectConfig::load(config_path).context("Failed to load config")?;
  let functions = discover_functions(&config).context("Discovery failed")?;

  let empty_hint = format!(
    "No .{} functions found under {}",
    config.functions.extension.trim_start_matches('.'),
    modules_root(&config.source_dir).display()
  );
  render(format, functions.as_slice(), |functions| {
    print_functions(functions, &empty_hint, verbose)
  })
}
