//! Terminal rendering for funcpack commands.
//!
//! Reporting commands print either a text summary or, with `--format json`,
//! the library value itself as pretty JSON on stdout. Errors and warnings
//! always go to stderr so JSON output stays parseable.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use funcpack_lib::bundle::ArchiveInfo;
use funcpack_lib::discover::ModuleFunction;
use funcpack_lib::init::InitResult;
use funcpack_lib::pipeline::PipelineResult;
use funcpack_lib::route::RouteEntry;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

const SUCCESS: &str = "✓";
const ERROR: &str = "✗";
const WARNING: &str = "⚠";
const ARROW: &str = "→";

/// Digest prefix shown in summaries.
const DIGEST_PREFIX_LEN: usize = 12;

/// Print `value` as JSON, or hand it to `text` for the human summary.
pub fn render<T: Serialize + ?Sized>(format: OutputFormat, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
  match format {
    OutputFormat::Json => {
      let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
      println!("{}", json);
    }
    OutputFormat::Text => text(value),
  }
  Ok(())
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

fn print_heading(message: &str) {
  println!(
    "{} {}",
    SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message.if_supports_color(Stream::Stdout, |s| s.bold())
  );
}

/// Print labelled values with the labels padded to a common width.
fn print_stats(stats: &[(&str, String)]) {
  let width = stats.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
  for (label, value) in stats {
    let label = format!("{:<width$}", format!("{}:", label), width = width + 1);
    println!("  {} {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
  }
}

/// Discovered functions, one `module/function` per line.
pub fn print_functions(functions: &[ModuleFunction], empty_hint: &str, verbose: bool) {
  if functions.is_empty() {
    println!("{}", empty_hint);
    return;
  }

  println!("Functions ({}):", functions.len());
  for function in functions {
    if verbose {
      println!(
        "  {} {}",
        function,
        function
          .source_file_path
          .display()
          .if_supports_color(Stream::Stdout, |s| s.dimmed())
      );
    } else {
      println!("  {}", function);
    }
  }
}

/// Route table lines, columns aligned: `METHOD path → handler (name)`.
pub fn route_lines(entries: &[RouteEntry]) -> Vec<String> {
  let path_width = entries.iter().map(|e| e.path.len()).max().unwrap_or(0);
  let handler_width = entries.iter().map(|e| e.handler.len()).max().unwrap_or(0);

  entries
    .iter()
    .map(|e| {
      format!(
        "{} {:<pw$} {} {:<hw$} ({})",
        e.method,
        e.path,
        ARROW,
        e.handler,
        e.name,
        pw = path_width,
        hw = handler_width
      )
    })
    .collect()
}

pub fn print_routes(entries: &[RouteEntry]) {
  if entries.is_empty() {
    println!("No routes");
    return;
  }

  println!("Routes ({}):", entries.len());
  for line in route_lines(entries) {
    println!("  {}", line);
  }
}

/// Warn about resource names that several routes share after truncation.
pub fn print_collisions(collisions: &BTreeMap<&str, Vec<&str>>) {
  for (name, paths) in collisions {
    print_warning(&format!("resource name '{}' is shared by {}", name, paths.join(", ")));
  }
}

pub fn archive_stats(archive: &ArchiveInfo, elapsed: Duration) -> Vec<(&'static str, String)> {
  vec![
    ("Archive", archive.path.display().to_string()),
    ("Entries", archive.entries.to_string()),
    ("Size", format_size(archive.size)),
    ("SHA-256", short_digest(&archive.sha256).to_string()),
    ("Elapsed", format_elapsed(elapsed)),
  ]
}

pub fn print_archive(archive: &ArchiveInfo, elapsed: Duration) {
  print_heading("Bundle created");
  print_stats(&archive_stats(archive, elapsed));
}

pub fn plan_stats(result: &PipelineResult, elapsed: Duration) -> Vec<(&'static str, String)> {
  let plan = &result.plan;
  let mut stats = vec![
    ("Plan ID", plan.id.to_string()),
    ("Archive", plan.archive.path.display().to_string()),
    ("Archive size", format_size(plan.archive.size)),
    ("Functions", plan.functions.len().to_string()),
  ];
  if let Some(path) = &result.plan_path {
    stats.push(("Written to", path.display().to_string()));
  }
  stats.push(("Elapsed", format_elapsed(elapsed)));
  stats
}

pub fn print_plan(result: &PipelineResult, elapsed: Duration) {
  print_heading(&format!("Plan ready for stack '{}'", result.plan.stack_name));
  print_stats(&plan_stats(result, elapsed));

  let routes: Vec<RouteEntry> = result.plan.functions.iter().map(|f| f.route.clone()).collect();
  if !routes.is_empty() {
    println!();
    print_routes(&routes);
  }
}

pub fn print_init(result: &InitResult, extension: &str) {
  print_heading("Initialized funcpack project!");
  print_stats(&[
    ("Project", result.project_dir.display().to_string()),
    ("Config", result.config_file.display().to_string()),
    ("Modules root", result.modules_dir.display().to_string()),
    ("Stack name", result.stack_name.clone()),
  ]);
  println!();
  println!("Next steps:");
  println!(
    "  1. Add functions as {}",
    format!("src/modules/<module>/<function>.{}", extension.trim_start_matches('.'))
      .if_supports_color(Stream::Stdout, |s| s.cyan())
  );
  println!(
    "  2. Run {}",
    format!("funcpack --config {} plan", result.config_file.display())
      .if_supports_color(Stream::Stdout, |s| s.cyan())
  );
}

fn short_digest(digest: &str) -> &str {
  digest.get(..DIGEST_PREFIX_LEN).unwrap_or(digest)
}

/// Binary units, one decimal place from KiB up.
fn format_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }

  let mut value = bytes as f64;
  let mut unit = "B";
  for next in UNITS {
    if value < 1024.0 {
      break;
    }
    value /= 1024.0;
    unit = next;
  }
  format!("{:.1} {}", value, unit)
}

/// Wall-clock time at millisecond resolution, e.g. `1s 250ms`.
fn format_elapsed(elapsed: Duration) -> String {
  let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
  humantime::format_duration(Duration::from_millis(millis)).to_string()
}
