//! Route table projection.
//!
//! Projects discovered functions onto `/{module}/{function}` routes. Resource
//! names and handler identifiers come from injected policies, so different
//! deployment targets can share the projection. Projection is pure and keeps
//! the input order.

pub mod naming;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::discover::ModuleFunction;

pub use naming::{HandlerNamer, ResourceNamer, truncate_name};

/// HTTP method a route matches. Projected routes always use `Any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
  Any,
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      Method::Any => "ANY",
    }
  }
}

impl std::fmt::Display for Method {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One routable function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
  pub path: String,
  pub method: Method,
  pub handler: String,
  /// Deployable resource name.
  pub name: String,
  pub module: String,
  pub function: String,
}

/// Route path for a module/function pair.
pub fn route_path(module: &str, function: &str) -> String {
  format!("/{}/{}", module, function)
}

/// Split a `/{module}/{function}` path back into its parts.
pub fn parse_route_path(path: &str) -> Option<(&str, &str)> {
  let rest = path.strip_prefix('/')?;
  let (module, function) = rest.split_once('/')?;
  if module.is_empty() || function.is_empty() || function.contains('/') {
    return None;
  }
  Some((module, function))
}

/// Project functions onto routes, one entry per function, in input order.
pub fn project<N, H>(functions: &[ModuleFunction], name_builder: N, handler_builder: H) -> Vec<RouteEntry>
where
  N: Fn(&ModuleFunction) -> String,
  H: Fn(&ModuleFunction) -> String,
{
  functions
    .iter()
    .map(|f| RouteEntry {
      path: route_path(&f.module, &f.function),
      method: Method::Any,
      handler: handler_builder(f),
      name: name_builder(f),
      module: f.module.clone(),
      function: f.function.clone(),
    })
    .collect()
}

/// Projected routes with lookup by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
  entries: Vec<RouteEntry>,
}

impl RouteTable {
  pub fn new(entries: Vec<RouteEntry>) -> Self {
    Self { entries }
  }

  /// Project with the standard naming policies.
  pub fn build(functions: &[ModuleFunction], namer: &ResourceNamer, handlers: &HandlerNamer) -> Self {
    Self::new(project(functions, |f| namer.name(f), |f| handlers.handler(f)))
  }

  pub fn entries(&self) -> &[RouteEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
    let (module, function) = parse_route_path(path)?;
    self
      .entries
      .iter()
      .find(|e| e.module == module && e.function == function)
  }

  /// Resource names shared by more than one route, with the paths using them.
  ///
  /// Truncation can map distinct functions to one name; the provisioning
  /// engine rejects that, and this lets callers warn before handing it over.
  pub fn name_collisions(&self) -> BTreeMap<&str, Vec<&str>> {
    let mut by_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for entry in &self.entries {
      by_name.entry(entry.name.as_str()).or_default().push(entry.path.as_str());
    }
    by_name.retain(|_, paths| paths.len() > 1);
    by_name
  }

  pub fn into_entries(self) -> Vec<RouteEntry> {
    self.entries
  }
}
