//! funcpack-lib: discovery and packaging core for funcpack
//!
//! This crate turns a project directory into the inputs an infrastructure
//! declaration layer needs:
//! - `discover`: scans `src/modules/{module}/{function}.{ext}` into `ModuleFunction`s
//! - `bundle`: runs the build commands and zips the distribution directory
//! - `route`: projects functions onto routes, handler identifiers and resource names
//! - `plan`: the deployment plan handed to the provisioning layer
//! - `pipeline`: runs all of the above for one project

pub mod bundle;
pub mod config;
pub mod consts;
pub mod discover;
pub mod init;
pub mod pipeline;
pub mod plan;
pub mod route;
pub mod util;
