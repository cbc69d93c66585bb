//! Build command execution.
//!
//! Commands run through the platform shell with the source directory as the
//! working directory. The caller's environment is inherited so toolchains on
//! `PATH` keep working; configured variables are layered on top.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use super::types::{BundleError, CommandFailure};
use crate::consts::SOURCE_DATE_EPOCH;

/// Execute one build command.
///
/// # Arguments
///
/// * `cmd` - The command string, passed to the shell as a single argument
/// * `cwd` - Working directory
/// * `env` - Extra environment variables
/// * `shell` - Shell override (defaults to /bin/sh on Unix, powershell.exe on Windows)
/// * `timeout` - Wall-clock limit; the child is killed when it is exceeded
///
/// # Returns
///
/// The stdout of the command on success (trimmed).
pub async fn execute_cmd(
  cmd: &str,
  cwd: &Path,
  env: &BTreeMap<String, String>,
  shell: Option<&str>,
  timeout: Option<Duration>,
) -> Result<String, BundleError> {
  info!(cmd = %cmd, "running build command");

  let (shell_cmd, shell_args) = get_shell(shell);

  let mut command = Command::new(&shell_cmd);
  command
    .args(&shell_args)
    .arg(cmd)
    .current_dir(cwd)
    .env("SOURCE_DATE_EPOCH", SOURCE_DATE_EPOCH)
    .envs(env)
    .stdin(Stdio::null())
    .kill_on_drop(true);

  debug!(shell = %shell_cmd, working_dir = ?cwd, "spawning process");

  let output = match timeout {
    Some(limit) => match tokio::time::timeout(limit, command.output()).await {
      Ok(result) => result,
      Err(_) => {
        return Err(BundleError::BuildCommand {
          cmd: cmd.to_string(),
          reason: CommandFailure::TimedOut(limit),
        });
      }
    },
    None => command.output().await,
  };

  let output = output.map_err(|e| BundleError::BuildCommand {
    cmd: cmd.to_string(),
    reason: CommandFailure::Spawn(e.to_string()),
  })?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !stderr.is_empty() {
      debug!(stderr = %stderr, "command stderr");
    }
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }

    return Err(BundleError::BuildCommand {
      cmd: cmd.to_string(),
      reason: CommandFailure::Exit(output.status.code()),
    });
  }

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

  if !stdout.is_empty() {
    debug!(stdout = %stdout, "command output");
  }

  Ok(stdout)
}

/// Get the shell command and arguments for the current platform.
///
/// Returns `(shell_command, shell_arguments)`; the command string is appended
/// after the arguments.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      powershell_args()
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      // Assume Unix-style shell (bash, sh, zsh, etc.)
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    ("powershell.exe".to_string(), powershell_args())
  }
}

fn powershell_args() -> Vec<String> {
  vec![
    "-NoProfile".to_string(),
    "-ExecutionPolicy".to_string(),
    "Bypass".to_string(),
    "-Command".to_string(),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{echo_env, exit_with, sleep_secs, write_file_cmd};
  use tempfile::TempDir;

  #[tokio::test]
  async fn execute_simple_command() {
    let temp_dir = TempDir::new().unwrap();

    let result = execute_cmd("echo hello", temp_dir.path(), &BTreeMap::new(), None, None)
      .await
      .unwrap();

    assert_eq!(result, "hello");
  }

  #[tokio::test]
  async fn execute_command_with_env() {
    let temp_dir = TempDir::new().unwrap();

    let mut env = BTreeMap::new();
    env.insert("MY_VAR".to_string(), "my_value".to_string());

    let result = execute_cmd(&echo_env("MY_VAR"), temp_dir.path(), &env, None, None)
      .await
      .unwrap();

    assert_eq!(result, "my_value");
  }

  #[tokio::test]
  async fn execute_command_has_source_date_epoch() {
    let temp_dir = TempDir::new().unwrap();

    let result = execute_cmd(
      &echo_env("SOURCE_DATE_EPOCH"),
      temp_dir.path(),
      &BTreeMap::new(),
      None,
      None,
    )
    .await
    .unwrap();

    assert_eq!(result, "315532800");
  }

  #[tokio::test]
  async fn execute_command_runs_in_cwd() {
    let temp_dir = TempDir::new().unwrap();

    execute_cmd(
      &write_file_cmd("cwd_marker", "x"),
      temp_dir.path(),
      &BTreeMap::new(),
      None,
      None,
    )
    .await
    .unwrap();

    assert!(temp_dir.path().join("cwd_marker").exists());
  }

  #[tokio::test]
  async fn execute_command_failure_carries_exit_code() {
    let temp_dir = TempDir::new().unwrap();

    let result = execute_cmd(&exit_with(3), temp_dir.path(), &BTreeMap::new(), None, None).await;

    match result {
      Err(BundleError::BuildCommand { cmd, reason }) => {
        assert_eq!(cmd, exit_with(3));
        assert_eq!(reason, CommandFailure::Exit(Some(3)));
      }
      other => panic!("expected BuildCommand error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn execute_command_times_out() {
    let temp_dir = TempDir::new().unwrap();
    let limit = Duration::from_millis(200);

    let result = execute_cmd(
      &sleep_secs(10),
      temp_dir.path(),
      &BTreeMap::new(),
      None,
      Some(limit),
    )
    .await;

    assert!(matches!(
      result,
      Err(BundleError::BuildCommand {
        reason: CommandFailure::TimedOut(d),
        ..
      }) if d == limit
    ));
  }

  #[tokio::test]
  async fn execute_command_missing_shell_is_spawn_failure() {
    let temp_dir = TempDir::new().unwrap();

    let result = execute_cmd(
      "echo hi",
      temp_dir.path(),
      &BTreeMap::new(),
      Some("/definitely/not/a/shell"),
      None,
    )
    .await;

    assert!(matches!(
      result,
      Err(BundleError::BuildCommand {
        reason: CommandFailure::Spawn(_),
        ..
      })
    ));
  }

  #[test]
  fn get_shell_with_override() {
    let (shell, arg) = get_shell(Some("/usr/bin/bash"));
    assert_eq!(shell, "/usr/bin/bash");
    assert_eq!(arg, vec!["-c"]);
  }

  #[test]
  fn get_shell_with_pwsh_override() {
    let (shell, args) = get_shell(Some("pwsh"));
    assert_eq!(shell, "pwsh");
    assert_eq!(args, vec!["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"]);
  }

  #[test]
  fn get_shell_with_cmd_override() {
    let (shell, args) = get_shell(Some("cmd.exe"));
    assert_eq!(shell, "cmd.exe");
    assert_eq!(args, vec!["/C"]);
  }

  #[test]
  fn get_shell_default() {
    let (shell, args) = get_shell(None);
    #[cfg(unix)]
    {
      assert_eq!(shell, "/bin/sh");
      assert_eq!(args, vec!["-c"]);
    }
    #[cfg(windows)]
    {
      assert_eq!(shell, "powershell.exe");
      assert_eq!(args, vec!["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"]);
    }
  }
}
