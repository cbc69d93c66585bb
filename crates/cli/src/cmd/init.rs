//! Implementation of the `funcpack init` command.
//!
//! This command scaffolds a project directory with a `funcpack.toml` and an
//! empty modules root.

use std::path::Path;

use anyhow::{Context, Result};

use funcpack_lib::init::{InitOptions, init};

use crate::output::print_init;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if `funcpack.toml` already exists or if there are permission issues.
pub fn cmd_init(path: &Path, stack_name: Option<String>, extension: &str) -> Result<()> {
  let options = InitOptions {
    project_dir: path.to_path_buf(),
    stack_name,
    extension: extension.to_string(),
  };

  let result = init(&options).context("Failed to initialize project")?;

  print_init(&result, extension);

  Ok(())
}
