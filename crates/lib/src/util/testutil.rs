//! Test utilities for funcpack-lib.
//!
//! Cross-platform helpers for tests that run build commands through the
//! platform shell and need fixture trees on disk.

use std::fs;
use std::path::Path;

/// Returns a shell command that exits with the given code.
pub fn exit_with(code: i32) -> String {
  format!("exit {}", code)
}

/// Returns a shell command that sleeps for the given number of seconds.
#[cfg(unix)]
pub fn sleep_secs(secs: u64) -> String {
  format!("sleep {}", secs)
}

#[cfg(windows)]
pub fn sleep_secs(secs: u64) -> String {
  format!("Start-Sleep -Seconds {}", secs)
}

/// Returns a shell command that writes `content` to `relative` (parents must exist).
#[cfg(unix)]
pub fn write_file_cmd(relative: &str, content: &str) -> String {
  format!("printf '%s' '{}' > {}", content, relative)
}

#[cfg(windows)]
pub fn write_file_cmd(relative: &str, content: &str) -> String {
  format!("Set-Content -NoNewline -Path '{}' -Value '{}'", relative, content)
}

/// Returns a shell command that prints an environment variable.
#[cfg(unix)]
pub fn echo_env(var: &str) -> String {
  format!("echo ${}", var)
}

#[cfg(windows)]
pub fn echo_env(var: &str) -> String {
  format!("Write-Output $env:{}", var)
}

/// Write a file relative to `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
}
