//! Discovery and route table output.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn routes_json_is_sorted_by_module_then_function() {
  let env = TestEnv::new("stack_name = \"shop\"\n");
  env.add_function("users", "delete");
  env.add_function("orders", "list");
  env.add_function("users", "create");

  let routes = env.json(&["routes"]);
  let paths: Vec<&str> = routes
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["path"].as_str().unwrap())
    .collect();

  assert_eq!(paths, vec!["/orders/list", "/users/create", "/users/delete"]);
  assert_eq!(routes[0]["method"], "ANY");
  assert_eq!(routes[0]["handler"], "modules/orders/list.default");
}

#[test]
fn routes_respect_naming_config() {
  let env = TestEnv::new(
    "stack_name = \"inventory-service-production\"\n\
     [functions]\nhandler_export = \"handler\"\n\
     [naming]\nceiling = 24\nreserved_suffix = 4\n",
  );
  env.add_function("warehouses", "rebalance");

  let routes = env.json(&["routes"]);
  let name = routes[0]["name"].as_str().unwrap();

  assert_eq!(name.chars().count(), 20);
  assert!(name.starts_with("inventory-service"));
  assert_eq!(routes[0]["handler"], "modules/warehouses/rebalance.handler");
}

#[test]
fn discover_ignores_other_extensions_and_nested_files() {
  let env = TestEnv::new("stack_name = \"shop\"\n");
  env.add_function("users", "create");
  env.write_file("src/modules/users/README.md", "docs");
  env.write_file("src/modules/users/helpers/format.ts", "export {}");
  env.write_file("src/modules/stray.ts", "export {}");

  let functions = env.json(&["discover"]);
  let functions = functions.as_array().unwrap();

  assert_eq!(functions.len(), 1);
  assert_eq!(functions[0]["module"], "users");
  assert_eq!(functions[0]["function"], "create");
}

#[test]
fn discover_reports_empty_modules_root() {
  let env = TestEnv::new("stack_name = \"shop\"\n");
  std::fs::create_dir_all(env.root().join("src/modules")).unwrap();

  env
    .cmd()
    .arg("discover")
    .assert()
    .success()
    .stdout(predicate::str::contains("No .ts functions"));
}

#[test]
fn routes_use_configured_extension() {
  let env = TestEnv::new("stack_name = \"shop\"\n[functions]\nextension = \".js\"\n");
  env.add_function("users", "create");
  env.write_file("src/modules/users/list.js", "module.exports = {};");

  let routes = env.json(&["routes"]);

  assert_eq!(routes.as_array().unwrap().len(), 1);
  assert_eq!(routes[0]["path"], "/users/list");
}

#[test]
fn routes_warn_about_truncation_collisions() {
  let env = TestEnv::new("stack_name = \"shop\"\n[naming]\nceiling = 10\nreserved_suffix = 2\n");
  env.add_function("users", "create");
  env.add_function("users", "delete");

  env
    .cmd()
    .arg("routes")
    .assert()
    .success()
    .stdout(predicate::str::contains("Routes (2):"))
    .stderr(predicate::str::contains(
      "resource name 'shop-use' is shared by /users/create, /users/delete",
    ));
}
