//! Deployment plan.
//!
//! The plan is everything the infrastructure declaration layer needs for one
//! run: the archive, and per function its route and environment. It is
//! written as JSON next to the archive.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::bundle::ArchiveInfo;
use crate::consts::PLAN_FILENAME;
use crate::discover::ModuleFunction;
use crate::route::RouteEntry;
use crate::util::hash::{Hashable, ObjectHash};

/// Errors that can occur while assembling or writing a plan.
#[derive(Debug, Error)]
pub enum PlanError {
  #[error("route table does not match discovered functions: {0}")]
  Mismatch(String),

  #[error("failed to serialize plan: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("failed to write plan {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },

  #[error("failed to read plan {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },
}

/// One deployable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDeployment {
  pub function: ModuleFunction,
  pub route: RouteEntry,
  pub environment: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPlan {
  /// Hash of the rest of the plan.
  pub id: ObjectHash,
  pub stack_name: String,
  pub archive: ArchiveInfo,
  pub functions: Vec<FunctionDeployment>,
}

/// Hashed content of a plan; the id is not part of its own hash.
#[derive(Serialize)]
struct PlanContent<'a> {
  stack_name: &'a str,
  archive: &'a ArchiveInfo,
  functions: &'a [FunctionDeployment],
}

impl Hashable for PlanContent<'_> {}

impl DeploymentPlan {
  /// Assemble a plan. `routes` must be the projection of `functions`, in order.
  pub fn new<E>(
    stack_name: &str,
    archive: ArchiveInfo,
    functions: Vec<ModuleFunction>,
    routes: Vec<RouteEntry>,
    env_for: E,
  ) -> Result<Self, PlanError>
  where
    E: Fn(&ModuleFunction) -> BTreeMap<String, String>,
  {
    if functions.len() != routes.len() {
      return Err(PlanError::Mismatch(format!(
        "{} functions but {} routes",
        functions.len(),
        routes.len()
      )));
    }

    let mut deployments = Vec::with_capacity(functions.len());
    for (function, route) in functions.into_iter().zip(routes) {
      if route.module != function.module || route.function != function.function {
        return Err(PlanError::Mismatch(format!("route {} is not for {}", route.path, function)));
      }
      let environment = env_for(&function);
      deployments.push(FunctionDeployment {
        function,
        route,
        environment,
      });
    }

    let id = PlanContent {
      stack_name,
      archive: &archive,
      functions: &deployments,
    }
    .compute_hash()?;

    Ok(Self {
      id,
      stack_name: stack_name.to_string(),
      archive,
      functions: deployments,
    })
  }

  /// Default plan location: next to the archive.
  pub fn default_path(&self) -> PathBuf {
    self
      .archive
      .path
      .parent()
      .map(|p| p.join(PLAN_FILENAME))
      .unwrap_or_else(|| PathBuf::from(PLAN_FILENAME))
  }

  /// Write the plan as pretty JSON.
  ///
  /// Uses atomic write (write to temp, then rename) so readers never see a
  /// partial plan.
  pub fn write(&self, path: &Path) -> Result<(), PlanError> {
    let write_err = |source: std::io::Error| PlanError::Write {
      path: path.to_path_buf(),
      source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let content = serde_json::to_string_pretty(self)?;
    fs::write(&temp_path, &content).map_err(write_err)?;
    fs::rename(&temp_path, path).map_err(write_err)?;

    debug!(path = %path.display(), id = %self.id, "plan written");
    Ok(())
  }

  /// Read a plan written by [`DeploymentPlan::write`].
  pub fn read(path: &Path) -> Result<Self, PlanError> {
    let content = fs::read_to_string(path).map_err(|source| PlanError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(serde_json::from_str(&content)?)
  }
}
