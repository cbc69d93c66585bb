//! Naming policies for projected routes.
//!
//! Provisioning engines cap identifier lengths and append a random suffix of
//! their own, so composite names are truncated to leave room for it.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HANDLER_EXPORT, DEFAULT_NAME_CEILING, DEFAULT_RESERVED_SUFFIX};
use crate::discover::ModuleFunction;

/// Truncate `name` to at most `ceiling - reserved_suffix` characters.
///
/// Names within the limit are returned unchanged; longer names keep exactly
/// their first `ceiling - reserved_suffix` characters. Characters are Unicode
/// scalar values, so a multi-byte character is never split. A reservation at
/// or above the ceiling leaves room for nothing and yields an empty string.
///
/// Truncation can make two distinct names collide; that is left for the
/// provisioning engine to report.
pub fn truncate_name(name: &str, ceiling: usize, reserved_suffix: usize) -> String {
  let limit = ceiling.saturating_sub(reserved_suffix);
  match name.char_indices().nth(limit) {
    Some((byte_index, _)) => name[..byte_index].to_string(),
    None => name.to_string(),
  }
}

/// Builds `{stack}-{module}-{function}` resource names, truncated to fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNamer {
  pub stack_name: String,
  pub ceiling: usize,
  pub reserved_suffix: usize,
}

impl ResourceNamer {
  pub fn new(stack_name: &str) -> Self {
    Self {
      stack_name: stack_name.to_string(),
      ceiling: DEFAULT_NAME_CEILING,
      reserved_suffix: DEFAULT_RESERVED_SUFFIX,
    }
  }

  pub fn with_limits(mut self, ceiling: usize, reserved_suffix: usize) -> Self {
    self.ceiling = ceiling;
    self.reserved_suffix = reserved_suffix;
    self
  }

  pub fn name(&self, function: &ModuleFunction) -> String {
    let full = format!("{}-{}-{}", self.stack_name, function.module, function.function);
    truncate_name(&full, self.ceiling, self.reserved_suffix)
  }
}

/// Builds `modules/{module}/{function}.{export}` handler identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerNamer {
  pub export: String,
}

impl Default for HandlerNamer {
  fn default() -> Self {
    Self {
      export: DEFAULT_HANDLER_EXPORT.to_string(),
    }
  }
}

impl HandlerNamer {
  pub fn new(export: &str) -> Self {
    Self {
      export: export.to_string(),
    }
  }

  pub fn handler(&self, function: &ModuleFunction) -> String {
    format!("modules/{}/{}.{}", function.module, function.function, self.export)
  }
}
