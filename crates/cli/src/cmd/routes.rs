//! Implementation of the `funcpack routes` command.
//!
//! Prints the route table the plan would carry, without building anything.

use std::path::Path;

use anyhow::{Context, Result};

use funcpack_lib::config::ProjectConfig;
use funcpack_lib::pipeline::route_table;

use crate::output::{OutputFormat, print_collisions, print_routes, render};

pub fn cmd_routes(config_path: &Path, format: OutputFormat) -> Result<()> {
  let config = ProjectConfig::load(config_path).context("Failed to load config")?;
  let table = route_table(&config).context("Discovery failed")?;

  render(format, table.entries(), print_routes)?;
  print_collisions(&table.name_collisions());

  Ok(())
}
