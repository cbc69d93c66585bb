//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project directory with a `funcpack.toml`.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  pub fn new(config: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("funcpack.toml");
    std::fs::write(&config_path, config).unwrap();
    Self { temp, config_path }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Add `src/modules/{module}/{function}.ts`.
  pub fn add_function(&self, module: &str, function: &str) {
    self.write_file(
      &format!("src/modules/{}/{}.ts", module, function),
      "export default async () => ({ statusCode: 200 });",
    );
  }

  /// Command running in the project directory with the project's config.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("funcpack");
    cmd.current_dir(self.temp.path());
    cmd.arg("--config").arg(&self.config_path);
    cmd
  }

  /// Run a command with `--format json` and parse stdout.
  pub fn json(&self, args: &[&str]) -> serde_json::Value {
    let output = self.cmd().args(args).args(["--format", "json"]).output().unwrap();
    assert!(
      output.status.success(),
      "command {:?} failed: {}",
      args,
      String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
  }
}

/// Shell command writing `content` to `rel`, relative to the working directory.
#[cfg(unix)]
pub fn write_cmd(rel: &str, content: &str) -> String {
  format!("mkdir -p $(dirname {rel}) && printf '%s' '{content}' > {rel}")
}

#[cfg(windows)]
pub fn write_cmd(rel: &str, content: &str) -> String {
  format!(
    "New-Item -ItemType Directory -Force -Path (Split-Path '{rel}') | Out-Null; Set-Content -NoNewline -Path '{rel}' -Value '{content}'"
  )
}

pub fn fail_cmd(code: i32) -> String {
  format!("exit {code}")
}
