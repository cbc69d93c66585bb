//! Plan command: the full pipeline from config to plan.json.

use predicates::prelude::*;

use crate::common::{TestEnv, fail_cmd, write_cmd};

const CONFIG: &str = r#"
stack_name = "shop"

[build]
output = "out/bundle.zip"

[env]
TABLE_NAME = "shop-table"

[modules.orders.env]
TABLE_NAME = "orders-table"
"#;

fn seeded(config: &str) -> TestEnv {
  let env = TestEnv::new(config);
  env.add_function("users", "create");
  env.add_function("orders", "list");
  env.write_file("dist/modules/users/create.js", "built");
  env.write_file("dist/modules/orders/list.js", "built");
  env
}

#[test]
fn plan_writes_json_next_to_archive() {
  let env = seeded(CONFIG);

  env
    .cmd()
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("Plan ready"));

  let content = std::fs::read_to_string(env.root().join("out/plan.json")).unwrap();
  let plan: serde_json::Value = serde_json::from_str(&content).unwrap();

  assert_eq!(plan["stack_name"], "shop");
  assert_eq!(plan["archive"]["entries"], 2);
  assert_eq!(plan["functions"].as_array().unwrap().len(), 2);
  assert_eq!(plan["functions"][0]["route"]["path"], "/orders/list");
  assert_eq!(plan["functions"][0]["environment"]["TABLE_NAME"], "orders-table");
  assert_eq!(plan["functions"][1]["environment"]["TABLE_NAME"], "shop-table");
}

#[test]
fn plan_out_overrides_location() {
  let env = seeded(CONFIG);
  let out = env.root().join("deploy/plan.json");

  env.cmd().arg("plan").arg("--out").arg(&out).assert().success();

  assert!(out.exists());
  assert!(!env.root().join("out/plan.json").exists());
}

#[test]
fn plan_no_write_prints_json_only() {
  let env = seeded(CONFIG);

  let plan = env.json(&["plan", "--no-write"]);

  assert_eq!(plan["functions"][1]["route"]["name"], "shop-users-create");
  assert!(!env.root().join("out/plan.json").exists());
}

#[test]
fn plan_id_is_stable_across_runs() {
  let env = seeded(CONFIG);

  let first = env.json(&["plan", "--no-write"]);
  let second = env.json(&["plan", "--no-write"]);

  assert_eq!(first["id"], second["id"]);
}

#[test]
fn failed_build_writes_no_plan() {
  let env = seeded(&format!(
    "stack_name = \"shop\"\n[build]\noutput = \"out/bundle.zip\"\ncommands = [\"{}\"]\n",
    fail_cmd(2)
  ));

  env.cmd().arg("plan").assert().failure();

  assert!(!env.root().join("out/plan.json").exists());
  assert!(!env.root().join("out/bundle.zip").exists());
}

#[test]
fn plan_with_variant_archives_its_output() {
  let config = format!(
    "stack_name = \"shop\"\n[build]\noutput = \"out/bundle.zip\"\n[build.variants]\nci = [\"{}\"]\n",
    write_cmd("dist/generated.js", "ci")
  );
  let env = seeded(&config);

  let plan = env.json(&["plan", "--variant", "ci", "--no-write"]);

  assert_eq!(plan["archive"]["entries"], 3);
}
