//! Zip archiving of the distribution directory.
//!
//! Entry names are relative to the distribution root with `/` separators, so
//! `modules/{module}/{function}` inside the dist directory stays addressable
//! after extraction. Entries are written in sorted order with the ZIP epoch as
//! their timestamp; identical inputs produce identical archives.
//!
//! The archive is written to a temporary sibling and renamed into place, so
//! the output path only ever holds a complete archive.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::types::{ArchiveInfo, BundleError};
use crate::util::hash::hash_file;

/// Archive every file under `dist_dir` into `output`.
pub fn write_archive(dist_dir: &Path, output: &Path) -> Result<ArchiveInfo, BundleError> {
  let dist_dir = match dunce::canonicalize(dist_dir) {
    Ok(p) if p.is_dir() => p,
    Ok(p) => return Err(BundleError::packaging(&p, "distribution path is not a directory")),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(BundleError::packaging(dist_dir, "distribution directory not found"));
    }
    Err(e) => return Err(BundleError::packaging(dist_dir, e)),
  };

  let output = resolve_output(output)?;
  if output.starts_with(&dist_dir) {
    return Err(BundleError::packaging(
      &output,
      "archive path must be outside the distribution directory",
    ));
  }

  let temp_path = temp_path_for(&output);
  let result = write_entries(&dist_dir, &temp_path).and_then(|entries| {
    fs::rename(&temp_path, &output).map_err(|e| BundleError::packaging(&output, e))?;
    Ok(entries)
  });

  let entries = match result {
    Ok(entries) => entries,
    Err(e) => {
      match fs::remove_file(&temp_path) {
        Ok(()) => debug!(path = %temp_path.display(), "removed partial archive"),
        Err(cleanup) if cleanup.kind() == io::ErrorKind::NotFound => {}
        Err(cleanup) => warn!(path = %temp_path.display(), error = %cleanup, "failed to remove partial archive"),
      }
      return Err(e);
    }
  };

  let sha256 = hash_file(&output).map_err(|e| BundleError::packaging(&output, e))?;
  let size = fs::metadata(&output)
    .map_err(|e| BundleError::packaging(&output, e))?
    .len();

  debug!(path = %output.display(), entries, size, "archive written");

  Ok(ArchiveInfo {
    path: output,
    sha256: sha256.0,
    size,
    entries,
  })
}

/// Create the output's parent directory and return the absolute output path.
fn resolve_output(output: &Path) -> Result<PathBuf, BundleError> {
  let file_name = output
    .file_name()
    .ok_or_else(|| BundleError::packaging(output, "archive path has no file name"))?;
  let parent = match output.parent() {
    Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
    _ => PathBuf::from("."),
  };

  fs::create_dir_all(&parent).map_err(|e| BundleError::packaging(&parent, e))?;
  let parent = dunce::canonicalize(&parent).map_err(|e| BundleError::packaging(&parent, e))?;

  Ok(parent.join(file_name))
}

fn temp_path_for(output: &Path) -> PathBuf {
  let mut name = output.file_name().unwrap_or_default().to_os_string();
  name.push(".tmp");
  output.with_file_name(name)
}

/// Write all files to a fresh zip at `path`. Returns the number of entries.
fn write_entries(dist_dir: &Path, path: &Path) -> Result<usize, BundleError> {
  let file = fs::File::create(path).map_err(|e| BundleError::packaging(path, e))?;
  let mut zip = ZipWriter::new(file);
  let mut entries = 0;

  for entry in WalkDir::new(dist_dir).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|e| {
      let at = e.path().unwrap_or(dist_dir).to_path_buf();
      BundleError::packaging(&at, e)
    })?;

    if !entry.file_type().is_file() {
      continue;
    }

    let source = entry.path();
    let name = entry_name(dist_dir, source)?;
    let metadata = entry.metadata().map_err(|e| BundleError::packaging(source, e))?;

    let options = SimpleFileOptions::default()
      .compression_method(CompressionMethod::Deflated)
      .last_modified_time(DateTime::default())
      .unix_permissions(file_mode(&metadata))
      .large_file(metadata.len() >= u64::from(u32::MAX));

    zip
      .start_file(name.as_str(), options)
      .map_err(|e| BundleError::packaging(source, e))?;
    let mut reader = fs::File::open(source).map_err(|e| BundleError::packaging(source, e))?;
    io::copy(&mut reader, &mut zip).map_err(|e| BundleError::packaging(source, e))?;

    entries += 1;
  }

  let file = zip.finish().map_err(|e| BundleError::packaging(path, e))?;
  file.sync_all().map_err(|e| BundleError::packaging(path, e))?;

  Ok(entries)
}

/// Archive entry name for `source`: relative to `dist_dir`, `/`-separated.
fn entry_name(dist_dir: &Path, source: &Path) -> Result<String, BundleError> {
  let relative = source
    .strip_prefix(dist_dir)
    .map_err(|e| BundleError::packaging(source, e))?;

  let mut parts = Vec::new();
  for component in relative.components() {
    match component {
      Component::Normal(part) => {
        let part = part
          .to_str()
          .ok_or_else(|| BundleError::packaging(source, "file name is not valid UTF-8"))?;
        parts.push(part);
      }
      _ => return Err(BundleError::packaging(source, "unexpected path component")),
    }
  }

  Ok(parts.join("/"))
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
  use std::os::unix::fs::PermissionsExt;
  metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn file_mode(_metadata: &fs::Metadata) -> u32 {
  0o644
}
