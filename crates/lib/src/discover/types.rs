use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One invocable unit of source code, found at
/// `{source_dir}/src/modules/{module}/{function}.{ext}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleFunction {
  /// Name of the directory directly under the modules root.
  pub module: String,
  /// File name with the extension stripped.
  pub function: String,
  /// Path to the source file.
  pub source_file_path: PathBuf,
  /// `source_file_path` without its extension.
  pub import_path: PathBuf,
}

impl ModuleFunction {
  /// `module/function`, the key used in logs and route lookups.
  pub fn key(&self) -> String {
    format!("{}/{}", self.module, self.function)
  }
}

impl std::fmt::Display for ModuleFunction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.module, self.function)
  }
}

/// Errors that can occur while scanning the modules root.
#[derive(Debug, Error)]
pub enum DiscoverError {
  #[error("modules root not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read {}: {message}", path.display())]
  Read { path: PathBuf, message: String },
}
