//! Function discovery.
//!
//! Scans `{root}/src/modules` two levels deep: every directory directly under
//! the modules root is a module, and every file directly inside a module whose
//! name ends in `.{ext}` is a function. Deeper nesting is ignored.
//!
//! Listings are sorted by file name, so results are stable across
//! filesystems. Callers should still treat the order as display-only.

mod types;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::consts::MODULES_DIR;

pub use types::*;

/// Path of the modules root for a source directory.
pub fn modules_root(root_path: &Path) -> PathBuf {
  root_path.join(MODULES_DIR)
}

/// Discover every function under `{root_path}/src/modules`.
///
/// `extension` may be given with or without its leading dot (`"ts"` or `".ts"`);
/// matching is an exact, case-sensitive suffix match.
///
/// # Errors
///
/// Returns `DiscoverError::NotFound` if the modules root is missing, and
/// `DiscoverError::Read` if a directory cannot be listed.
pub fn discover(root_path: &Path, extension: &str) -> Result<Vec<ModuleFunction>, DiscoverError> {
  let modules_root = modules_root(root_path);

  match fs::metadata(&modules_root) {
    Ok(meta) if meta.is_dir() => {}
    Ok(_) => return Err(DiscoverError::NotFound { path: modules_root }),
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(DiscoverError::NotFound { path: modules_root }),
    Err(e) => {
      return Err(DiscoverError::Read {
        path: modules_root,
        message: e.to_string(),
      });
    }
  }

  let suffix = format!(".{}", extension.trim_start_matches('.'));
  let mut functions = Vec::new();

  for module_dir in list_entries(&modules_root, true)? {
    let Some(module) = utf8_name(&module_dir) else {
      continue;
    };

    let before = functions.len();
    for file in list_entries(&module_dir, false)? {
      let Some(file_name) = utf8_name(&file) else {
        continue;
      };
      let Some(function) = file_name.strip_suffix(&suffix) else {
        continue;
      };
      if function.is_empty() {
        continue;
      }

      functions.push(ModuleFunction {
        module: module.clone(),
        function: function.to_string(),
        import_path: module_dir.join(function),
        source_file_path: file,
      });
    }

    debug!(module = %module, count = functions.len() - before, "scanned module");
  }

  debug!(root = %modules_root.display(), count = functions.len(), "discovery complete");
  Ok(functions)
}

/// List the direct children of `dir` that are directories (`want_dirs`) or
/// files (`!want_dirs`), sorted by file name. Symlinks are followed.
fn list_entries(dir: &Path, want_dirs: bool) -> Result<Vec<PathBuf>, DiscoverError> {
  let walker = WalkDir::new(dir)
    .min_depth(1)
    .max_depth(1)
    .follow_links(true)
    .sort_by_file_name();

  let mut entries = Vec::new();
  for entry in walker {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) if is_dangling_link(&e) => {
        warn!(path = ?e.path(), "skipping dangling symlink");
        continue;
      }
      Err(e) => {
        return Err(DiscoverError::Read {
          path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
          message: e.to_string(),
        });
      }
    };

    let file_type = entry.file_type();
    let keep = if want_dirs { file_type.is_dir() } else { file_type.is_file() };
    if keep {
      entries.push(entry.into_path());
    }
  }

  Ok(entries)
}

/// A followed symlink whose target is missing: neither a directory nor a file.
fn is_dangling_link(err: &walkdir::Error) -> bool {
  err.depth() == 1 && err.io_error().is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

fn utf8_name(path: &Path) -> Option<String> {
  let name = path.file_name()?;
  match name.to_str() {
    Some(s) => Some(s.to_string()),
    None => {
      warn!(path = %path.display(), "skipping entry with non-UTF-8 name");
      None
    }
  }
}
