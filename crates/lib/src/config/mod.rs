//! Project configuration (`funcpack.toml`).
//!
//! Every knob the pipeline takes lives here, including which build command
//! variant to run. Nothing is read from the process environment; the CLI
//! passes the variant explicitly.
//!
//! ```toml
//! stack_name = "my-api"
//! source_dir = "."
//!
//! [functions]
//! extension = "ts"
//!
//! [build]
//! commands = ["npm ci", "npm run build"]
//! dist = "dist"
//! timeout = "10m"
//!
//! [build.variants]
//! local = ["npm install", "npm run build"]
//!
//! [env]
//! TABLE_NAME = "users"
//!
//! [modules.users.env]
//! LOG_LEVEL = "debug"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

use crate::bundle::BundleSpec;
use crate::consts::{DEFAULT_HANDLER_EXPORT, DEFAULT_NAME_CEILING, DEFAULT_RESERVED_SUFFIX};
use crate::discover::ModuleFunction;
use crate::route::{HandlerNamer, ResourceNamer};

/// Errors that can occur while loading a project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse config {}: {message}", path.display())]
  Parse { path: PathBuf, message: String },

  #[error("invalid config: {0}")]
  Invalid(String),

  #[error("unknown build variant '{name}' (available: {})", available.join(", "))]
  UnknownVariant { name: String, available: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
  /// Prefix for every deployable resource name.
  pub stack_name: String,
  /// Project root holding `src/modules`; relative to the config file.
  #[serde(default = "default_source_dir")]
  pub source_dir: PathBuf,
  #[serde(default)]
  pub functions: FunctionsConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub naming: NamingConfig,
  /// Environment injected into every deployable unit.
  #[serde(default)]
  pub env: BTreeMap<String, String>,
  /// Per-module settings, keyed by module name.
  #[serde(default)]
  pub modules: BTreeMap<String, ModuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionsConfig {
  #[serde(default = "default_extension")]
  pub extension: String,
  #[serde(default = "default_handler_export")]
  pub handler_export: String,
}

impl Default for FunctionsConfig {
  fn default() -> Self {
    Self {
      extension: default_extension(),
      handler_export: default_handler_export(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
  /// Commands run when no variant is selected.
  #[serde(default)]
  pub commands: Vec<String>,
  /// Named alternatives to `commands`.
  #[serde(default)]
  pub variants: BTreeMap<String, Vec<String>>,
  /// Distribution directory, relative to `source_dir`.
  #[serde(default = "default_dist")]
  pub dist: PathBuf,
  /// Archive path, relative to `source_dir`.
  #[serde(default)]
  pub output: Option<PathBuf>,
  /// Per-command limit, e.g. `"10m"`.
  #[serde(default, deserialize_with = "deserialize_duration")]
  pub timeout: Option<Duration>,
  #[serde(default)]
  pub shell: Option<String>,
  /// Extra environment for the build commands.
  #[serde(default)]
  pub env: BTreeMap<String, String>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      commands: Vec::new(),
      variants: BTreeMap::new(),
      dist: default_dist(),
      output: None,
      timeout: None,
      shell: None,
      env: BTreeMap::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingConfig {
  #[serde(default = "default_ceiling")]
  pub ceiling: usize,
  #[serde(default = "default_reserved_suffix")]
  pub reserved_suffix: usize,
}

impl Default for NamingConfig {
  fn default() -> Self {
    Self {
      ceiling: default_ceiling(),
      reserved_suffix: default_reserved_suffix(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleConfig {
  #[serde(default)]
  pub env: BTreeMap<String, String>,
}

fn default_source_dir() -> PathBuf {
  PathBuf::from(".")
}

fn default_extension() -> String {
  "ts".to_string()
}

fn default_handler_export() -> String {
  DEFAULT_HANDLER_EXPORT.to_string()
}

fn default_dist() -> PathBuf {
  PathBuf::from("dist")
}

fn default_ceiling() -> usize {
  DEFAULT_NAME_CEILING
}

fn default_reserved_suffix() -> usize {
  DEFAULT_RESERVED_SUFFIX
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  raw
    .map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
    .transpose()
}

impl ProjectConfig {
  /// Load a config file. `source_dir` is resolved against the file's directory.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ConfigError::NotFound {
          path: path.to_path_buf(),
        });
      }
      Err(e) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    let base_dir = match path.parent() {
      Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
      _ => PathBuf::from("."),
    };

    let config = Self::parse(&content, &base_dir).map_err(|e| match e {
      ConfigError::Parse { message, .. } => ConfigError::Parse {
        path: path.to_path_buf(),
        message,
      },
      other => other,
    })?;

    debug!(path = %path.display(), source_dir = %config.source_dir.display(), "loaded config");
    Ok(config)
  }

  /// Parse config text, resolving `source_dir` against `base_dir`.
  pub fn parse(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
    let mut config: ProjectConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
      path: PathBuf::new(),
      message: e.to_string(),
    })?;

    config.source_dir = base_dir.join(&config.source_dir);
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    if self.stack_name.trim().is_empty() {
      return Err(ConfigError::Invalid("stack_name must not be empty".to_string()));
    }
    if self.functions.extension.trim_start_matches('.').is_empty() {
      return Err(ConfigError::Invalid("functions.extension must not be empty".to_string()));
    }
    if self.naming.reserved_suffix >= self.naming.ceiling {
      return Err(ConfigError::Invalid(format!(
        "naming.reserved_suffix ({}) must be smaller than naming.ceiling ({})",
        self.naming.reserved_suffix, self.naming.ceiling
      )));
    }
    Ok(())
  }

  /// Build commands for the selected variant, or the default list.
  pub fn commands_for(&self, variant: Option<&str>) -> Result<&[String], ConfigError> {
    match variant {
      None => Ok(&self.build.commands),
      Some(name) => self
        .build
        .variants
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| ConfigError::UnknownVariant {
          name: name.to_string(),
          available: self.build.variants.keys().cloned().collect(),
        }),
    }
  }

  /// Environment for one deployable unit: global `[env]` overlaid by the
  /// function's `[modules.<name>.env]`.
  pub fn env_for(&self, function: &ModuleFunction) -> BTreeMap<String, String> {
    let mut env = self.env.clone();
    if let Some(module) = self.modules.get(&function.module) {
      env.extend(module.env.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    env
  }

  /// Bundle spec for this project. `skip_build` archives the existing
  /// distribution directory without running any command.
  pub fn bundle_spec(&self, variant: Option<&str>, skip_build: bool) -> Result<BundleSpec, ConfigError> {
    let commands = if skip_build {
      Vec::new()
    } else {
      self.commands_for(variant)?.to_vec()
    };

    let mut spec = BundleSpec::new(&self.source_dir, &self.build.dist)
      .with_commands(commands)
      .with_env(self.build.env.clone());
    if let Some(output) = &self.build.output {
      spec = spec.with_output(output);
    }
    if let Some(shell) = &self.build.shell {
      spec = spec.with_shell(shell);
    }
    if let Some(timeout) = self.build.timeout {
      spec = spec.with_timeout(timeout);
    }
    Ok(spec)
  }

  pub fn resource_namer(&self) -> ResourceNamer {
    ResourceNamer::new(&self.stack_name).with_limits(self.naming.ceiling, self.naming.reserved_suffix)
  }

  pub fn handler_namer(&self) -> HandlerNamer {
    HandlerNamer::new(&self.functions.handler_export)
  }
}
