mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use funcpack_lib::consts::CONFIG_FILENAME;
use tracing_subscriber::EnvFilter;

use crate::cmd::{PlanArgs, cmd_bundle, cmd_discover, cmd_init, cmd_plan, cmd_routes};
use crate::output::{OutputFormat, print_error};

/// funcpack - package module functions and plan their HTTP routes
#[derive(Parser)]
#[command(name = "funcpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the project configuration
  #[arg(short, long, global = true, default_value = CONFIG_FILENAME)]
  config: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a funcpack.toml and an empty modules root
  Init {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Stack name (default: derived from the directory name)
    #[arg(long)]
    stack_name: Option<String>,

    /// Function source extension
    #[arg(long, default_value = "ts")]
    extension: String,
  },

  /// List discovered module functions
  Discover {
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Show the route table
  Routes {
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Run the build commands and package the distribution directory
  Bundle {
    /// Named build variant from [build.variants]
    #[arg(long)]
    variant: Option<String>,

    /// Archive the existing distribution directory without building
    #[arg(long)]
    skip_build: bool,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Build, bundle and write the deployment plan
  Plan {
    /// Named build variant from [build.variants]
    #[arg(long)]
    variant: Option<String>,

    /// Archive the existing distribution directory without building
    #[arg(long)]
    skip_build: bool,

    /// Where to write the plan (default: plan.json next to the archive)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the plan without writing it
    #[arg(long, conflicts_with = "out")]
    no_write: bool,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(err) = run(cli) {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Init {
      dir,
      stack_name,
      extension,
    } => cmd_init(&dir, stack_name, &extension),
    Commands::Discover { format } => cmd_discover(&cli.config, format, cli.verbose),
    Commands::Routes { format } => cmd_routes(&cli.config, format),
    Commands::Bundle {
      variant,
      skip_build,
      format,
    } => cmd_bundle(&cli.config, variant.as_deref(), skip_build, format),
    Commands::Plan {
      variant,
      skip_build,
      out,
      no_write,
      format,
    } => cmd_plan(
      &cli.config,
      PlanArgs {
        variant: variant.as_deref(),
        skip_build,
        out,
        no_write,
        format,
      },
    ),
  }
}
