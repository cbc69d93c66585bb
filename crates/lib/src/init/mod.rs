//! Initialize a new funcpack project.
//!
//! This module provides the core logic for the `funcpack init` command, which
//! scaffolds a project directory with:
//! - `funcpack.toml` with commented defaults
//! - an empty `src/modules` tree

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_FILENAME, MODULES_DIR};

pub use templates::CONFIG_TEMPLATE;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },

  #[error("failed to canonicalize path {}: {source}", path.display())]
  Canonicalize { path: PathBuf, source: std::io::Error },
}

/// Options for initializing a project.
pub struct InitOptions {
  /// Project directory to create or populate
  pub project_dir: PathBuf,
  /// Stack name; derived from the directory name when unset
  pub stack_name: Option<String>,
  /// Function source extension
  pub extension: String,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  /// The project directory (canonicalized)
  pub project_dir: PathBuf,
  /// Path to created funcpack.toml
  pub config_file: PathBuf,
  /// Path to the modules root
  pub modules_dir: PathBuf,
  /// Stack name written to the config
  pub stack_name: String,
}

/// Initialize a new funcpack project.
///
/// # Errors
///
/// Returns an error if:
/// - `funcpack.toml` already exists
/// - Directory creation fails
/// - File writing fails
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  let project_dir = &options.project_dir;

  fs::create_dir_all(project_dir).map_err(|e| InitError::CreateDir {
    path: project_dir.clone(),
    source: e,
  })?;

  let project_dir = dunce::canonicalize(project_dir).map_err(|e| InitError::Canonicalize {
    path: options.project_dir.clone(),
    source: e,
  })?;

  let config_file = project_dir.join(CONFIG_FILENAME);
  if config_file.exists() {
    return Err(InitError::PathExists { path: config_file });
  }

  let modules_dir = project_dir.join(MODULES_DIR);
  fs::create_dir_all(&modules_dir).map_err(|e| InitError::CreateDir {
    path: modules_dir.clone(),
    source: e,
  })?;

  let gitkeep = modules_dir.join(".gitkeep");
  if !gitkeep.exists() {
    fs::write(&gitkeep, "").map_err(|e| InitError::WriteFile {
      path: gitkeep.clone(),
      source: e,
    })?;
  }

  let stack_name = options
    .stack_name
    .clone()
    .unwrap_or_else(|| stack_name_from_dir(&project_dir));
  let extension = options.extension.trim_start_matches('.');

  let content = CONFIG_TEMPLATE
    .replace("{stack_name}", &stack_name)
    .replace("{extension}", extension);
  fs::write(&config_file, content).map_err(|e| InitError::WriteFile {
    path: config_file.clone(),
    source: e,
  })?;

  debug!(path = %config_file.display(), stack = %stack_name, "initialized project");

  Ok(InitResult {
    project_dir,
    config_file,
    modules_dir,
    stack_name,
  })
}

/// Lowercase the directory name and replace anything outside `[a-z0-9-]` with `-`.
fn stack_name_from_dir(dir: &Path) -> String {
  let raw = dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
  let name: String = raw
    .to_lowercase()
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
    .collect();
  let name = name.trim_matches('-');
  if name.is_empty() {
    "stack".to_string()
  } else {
    name.to_string()
  }
}
