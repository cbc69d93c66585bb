//! Bundle command: build commands, variants and archive output.

use predicates::prelude::*;

use crate::common::{TestEnv, fail_cmd, write_cmd};

fn config(build: &str) -> String {
  format!("stack_name = \"shop\"\n[build]\noutput = \"out/bundle.zip\"\n{}", build)
}

#[test]
fn bundle_runs_commands_then_archives_dist() {
  let env = TestEnv::new(&config(&format!(
    "commands = [\"{}\"]\n",
    write_cmd("dist/modules/users/create.js", "built")
  )));

  let archive = env.json(&["bundle"]);

  assert_eq!(archive["entries"], 1);
  assert_eq!(archive["sha256"].as_str().unwrap().len(), 64);
  assert!(env.root().join("out/bundle.zip").exists());
}

#[test]
fn bundle_uses_selected_variant() {
  let env = TestEnv::new(&config(&format!(
    "commands = [\"{}\"]\n[build.variants]\nlocal = [\"{}\", \"{}\"]\n",
    fail_cmd(3),
    write_cmd("dist/a.js", "a"),
    write_cmd("dist/b.js", "b")
  )));

  let archive = env.json(&["bundle", "--variant", "local"]);

  assert_eq!(archive["entries"], 2);
}

#[test]
fn failed_command_fails_without_archive() {
  let env = TestEnv::new(&config(&format!("commands = [\"{}\"]\n", fail_cmd(3))));
  env.write_file("dist/index.js", "stale");
  env.write_file("out/bundle.zip", "previous");

  env
    .cmd()
    .arg("bundle")
    .assert()
    .failure()
    .stderr(predicate::str::contains("exit code 3"));

  assert!(!env.root().join("out/bundle.zip").exists());
}

#[test]
fn skip_build_archives_existing_dist() {
  let env = TestEnv::new(&config(&format!("commands = [\"{}\"]\n", fail_cmd(3))));
  env.write_file("dist/index.js", "prebuilt");

  let archive = env.json(&["bundle", "--skip-build"]);

  assert_eq!(archive["entries"], 1);
}

#[test]
fn identical_dist_produces_identical_digest() {
  let env = TestEnv::new(&config(""));
  env.write_file("dist/index.js", "same");
  env.write_file("dist/modules/users/create.js", "same");

  let first = env.json(&["bundle"]);
  let second = env.json(&["bundle"]);

  assert_eq!(first["sha256"], second["sha256"]);
}

#[test]
fn missing_dist_fails() {
  let env = TestEnv::new(&config(""));

  env
    .cmd()
    .arg("bundle")
    .assert()
    .failure()
    .stderr(predicate::str::contains("distribution directory not found"));
}
