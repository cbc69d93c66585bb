//! End-to-end run for one project.
//!
//! Discovery and bundling touch disjoint parts of the project and run
//! concurrently; projection waits for discovery. Both are always awaited, so
//! no archiving is still in flight when `run` returns. A failed run reports
//! one error and leaves no archive behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bundle::{self, ArchiveInfo, BundleError};
use crate::config::{ConfigError, ProjectConfig};
use crate::discover::{self, DiscoverError, ModuleFunction};
use crate::plan::{DeploymentPlan, PlanError};
use crate::route::RouteTable;

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Discover(#[from] DiscoverError),

  #[error(transparent)]
  Bundle(#[from] BundleError),

  #[error(transparent)]
  Plan(#[from] PlanError),

  #[error("discovery task failed: {0}")]
  Join(String),
}

/// Options for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
  /// Build command variant; `None` runs `build.commands`.
  pub variant: Option<String>,
  /// Archive the existing distribution directory without building.
  pub skip_build: bool,
  /// Where to write the plan; defaults to next to the archive.
  pub plan_path: Option<PathBuf>,
  /// Skip writing the plan file.
  pub no_write: bool,
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
  pub plan: DeploymentPlan,
  /// Where the plan was written, if it was.
  pub plan_path: Option<PathBuf>,
}

/// Discover the project's functions.
pub fn discover_functions(config: &ProjectConfig) -> Result<Vec<ModuleFunction>, DiscoverError> {
  discover::discover(&config.source_dir, &config.functions.extension)
}

/// Discover and project the project's routes.
pub fn route_table(config: &ProjectConfig) -> Result<RouteTable, DiscoverError> {
  let functions = discover_functions(config)?;
  Ok(RouteTable::build(
    &functions,
    &config.resource_namer(),
    &config.handler_namer(),
  ))
}

/// Run discovery, bundling and projection, and assemble the deployment plan.
pub async fn run(config: &ProjectConfig, options: &PipelineOptions) -> Result<PipelineResult, PipelineError> {
  let spec = config.bundle_spec(options.variant.as_deref(), options.skip_build)?;

  info!(stack = %config.stack_name, source = %config.source_dir.display(), "starting pipeline");

  let discovery_config = config.clone();
  let discovery = async move {
    tokio::task::spawn_blocking(move || discover_functions(&discovery_config))
      .await
      .map_err(|e| PipelineError::Join(e.to_string()))?
      .map_err(PipelineError::from)
  };
  let bundling = async { bundle::build(&spec).await.map_err(PipelineError::from) };

  let (functions, archive) = match tokio::join!(discovery, bundling) {
    (Ok(functions), Ok(archive)) => (functions, archive),
    (Err(e), Ok(archive)) => {
      discard_archive(&archive.path);
      return Err(e);
    }
    (Err(e), Err(_)) | (Ok(_), Err(e)) => return Err(e),
  };

  let archive_path = archive.path.clone();
  let result = assemble(config, options, functions, archive);
  if result.is_err() {
    discard_archive(&archive_path);
  }
  let (plan, plan_path) = result?;

  info!(id = %plan.id, functions = plan.functions.len(), "pipeline complete");

  Ok(PipelineResult { plan, plan_path })
}

/// Project routes, build the plan and write it.
fn assemble(
  config: &ProjectConfig,
  options: &PipelineOptions,
  functions: Vec<ModuleFunction>,
  archive: ArchiveInfo,
) -> Result<(DeploymentPlan, Option<PathBuf>), PipelineError> {
  info!(count = functions.len(), "discovered functions");

  let table = RouteTable::build(&functions, &config.resource_namer(), &config.handler_namer());
  for (name, paths) in table.name_collisions() {
    warn!(name = %name, paths = ?paths, "resource name shared by several routes after truncation");
  }

  let plan = DeploymentPlan::new(
    &config.stack_name,
    archive,
    functions,
    table.into_entries(),
    |f| config.env_for(f),
  )?;

  let plan_path = if options.no_write {
    None
  } else {
    let path = options.plan_path.clone().unwrap_or_else(|| plan.default_path());
    plan.write(&path)?;
    Some(path)
  };

  Ok((plan, plan_path))
}

fn discard_archive(path: &Path) {
  match fs::remove_file(path) {
    Ok(()) => debug!(path = %path.display(), "removed archive of failed run"),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => warn!(path = %path.display(), error = %e, "failed to remove archive of failed run"),
  }
}
