use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a build command did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFailure {
  /// The command exited non-zero. `None` means it was terminated by a signal.
  Exit(Option<i32>),
  /// The command exceeded its wall-clock limit and was killed.
  TimedOut(Duration),
  /// The shell could not be started.
  Spawn(String),
}

impl std::fmt::Display for CommandFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      CommandFailure::Exit(Some(code)) => write!(f, "exit code {}", code),
      CommandFailure::Exit(None) => write!(f, "terminated by signal"),
      CommandFailure::TimedOut(limit) => write!(f, "timed out after {}", humantime::format_duration(*limit)),
      CommandFailure::Spawn(message) => write!(f, "failed to spawn: {}", message),
    }
  }
}

/// Errors that can occur while building and archiving a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
  #[error("source directory not found: {}", path.display())]
  SourceNotFound { path: PathBuf },

  #[error("build command failed ({reason}): {cmd}")]
  BuildCommand { cmd: String, reason: CommandFailure },

  #[error("packaging failed at {}: {message}", path.display())]
  Packaging { path: PathBuf, message: String },
}

impl BundleError {
  pub(crate) fn packaging(path: &Path, message: impl std::fmt::Display) -> Self {
    BundleError::Packaging {
      path: path.to_path_buf(),
      message: message.to_string(),
    }
  }
}

/// A produced archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveInfo {
  /// Absolute path of the archive.
  pub path: PathBuf,
  /// Hex SHA-256 of the archive bytes.
  pub sha256: String,
  /// Archive size in bytes.
  pub size: u64,
  /// Number of file entries.
  pub entries: usize,
}

/// Everything needed to build one bundle.
#[derive(Debug, Clone)]
pub struct BundleSpec {
  /// Working directory for the build commands.
  pub source_dir: PathBuf,
  /// Commands run in order before archiving.
  pub commands: Vec<String>,
  /// Distribution directory, relative to `source_dir`.
  pub dist: PathBuf,
  /// Archive path; relative paths resolve against `source_dir`.
  /// Defaults to `{source_dir}.zip` next to the source directory.
  pub output: Option<PathBuf>,
  /// Extra environment for the build commands.
  pub env: BTreeMap<String, String>,
  /// Shell override.
  pub shell: Option<String>,
  /// Per-command wall-clock limit.
  pub timeout: Option<Duration>,
}

impl BundleSpec {
  pub fn new(source_dir: impl Into<PathBuf>, dist: impl Into<PathBuf>) -> Self {
    Self {
      source_dir: source_dir.into(),
      commands: Vec::new(),
      dist: dist.into(),
      output: None,
      env: BTreeMap::new(),
      shell: None,
      timeout: None,
    }
  }

  pub fn with_command(mut self, cmd: &str) -> Self {
    self.commands.push(cmd.to_string());
    self
  }

  pub fn with_commands(mut self, cmds: impl IntoIterator<Item = String>) -> Self {
    self.commands.extend(cmds);
    self
  }

  pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
    self.output = Some(output.into());
    self
  }

  pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
    self.env = env;
    self
  }

  pub fn with_shell(mut self, shell: &str) -> Self {
    self.shell = Some(shell.to_string());
    self
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }
}
