//! Bundle building.
//!
//! A bundle is produced in strictly sequential phases:
//!
//! 1. Any stale archive at the output path is removed
//! 2. Build commands run in `source_dir`, in order; the first failure stops the run
//! 3. The distribution directory is zipped into the output path
//!
//! Determinism of the archive contents is a property of the build commands;
//! the archiver itself adds no timestamps or ordering noise.
//!
//! # Submodules
//!
//! - [`archive`] - Zip writer for the distribution directory
//! - [`cmd`] - Shell command execution with timeouts

pub mod archive;
pub mod cmd;
mod types;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use types::*;

/// Build and archive a bundle.
///
/// Returns the produced archive once the build commands have exited and the
/// archive has been fully written.
///
/// # Errors
///
/// - `BundleError::SourceNotFound` if `source_dir` does not exist
/// - `BundleError::BuildCommand` if a command exits non-zero, times out or cannot start
/// - `BundleError::Packaging` if the archive cannot be written
///
/// No archive is left at the output path when an error is returned.
pub async fn build(spec: &BundleSpec) -> Result<ArchiveInfo, BundleError> {
  let source_dir = resolve_source_dir(&spec.source_dir)?;
  let output = default_output_path(&source_dir, spec.output.as_deref())?;
  let dist_dir = source_dir.join(&spec.dist);

  remove_stale_archive(&output)?;

  info!(
    source = %source_dir.display(),
    commands = spec.commands.len(),
    "building bundle"
  );

  for command in &spec.commands {
    cmd::execute_cmd(
      command,
      &source_dir,
      &spec.env,
      spec.shell.as_deref(),
      spec.timeout,
    )
    .await?;
  }

  debug!(dist = %dist_dir.display(), output = %output.display(), "archiving distribution directory");

  let archive = tokio::task::spawn_blocking(move || archive::write_archive(&dist_dir, &output))
    .await
    .map_err(|e| BundleError::packaging(&source_dir, e))??;

  info!(
    path = %archive.path.display(),
    entries = archive.entries,
    size = archive.size,
    "bundle ready"
  );

  Ok(archive)
}

fn resolve_source_dir(source_dir: &Path) -> Result<PathBuf, BundleError> {
  match dunce::canonicalize(source_dir) {
    Ok(p) if p.is_dir() => Ok(p),
    Ok(p) => Err(BundleError::SourceNotFound { path: p }),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Err(BundleError::SourceNotFound {
      path: source_dir.to_path_buf(),
    }),
    Err(e) => Err(BundleError::packaging(source_dir, e)),
  }
}

/// Archive path for a bundle.
///
/// An explicit `output` resolves against `source_dir` when relative; otherwise
/// the archive sits next to the source directory as `{name}.zip`.
pub fn default_output_path(source_dir: &Path, output: Option<&Path>) -> Result<PathBuf, BundleError> {
  if let Some(output) = output {
    return Ok(source_dir.join(output));
  }

  match (source_dir.parent(), source_dir.file_name()) {
    (Some(parent), Some(name)) => {
      let mut file_name = name.to_os_string();
      file_name.push(".zip");
      Ok(parent.join(file_name))
    }
    _ => Err(BundleError::packaging(
      source_dir,
      "cannot derive an archive path next to the source directory; set an explicit output",
    )),
  }
}

fn remove_stale_archive(output: &Path) -> Result<(), BundleError> {
  match fs::remove_file(output) {
    Ok(()) => {
      debug!(path = %output.display(), "removed stale archive");
      Ok(())
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(BundleError::packaging(output, e)),
  }
}
