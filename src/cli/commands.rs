//! CLI command definitions using clap
//!
//! Defines all CLI subcommands and their arguments.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::executor::ExecOption;
use crate::model::{MakeData, Recipe};

/// Generate Makefiles from recipe manifests and run them with make.
#[derive(Parser, Debug)]
#[command(name = "makedata")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (overrides default XDG paths)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// How errors are reported on stderr
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub error_format: ErrorFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the Makefile generated from a manifest
    Emit(EmitArgs),

    /// Generate a Makefile from a manifest and run make on it
    Run(RunArgs),

    /// Create COUNT files with one independent `touch` target each
    Touch(TouchArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Parallelism flags shared by `run` and `touch`
#[derive(Args, Debug, Clone, Default)]
pub struct ParallelArgs {
    /// Run at most N jobs at once (0 runs sequentially)
    #[arg(short, long, value_name = "N", conflicts_with = "all_cores")]
    pub jobs: Option<usize>,

    /// Let make run an unlimited number of jobs (bare `-j`)
    #[arg(long)]
    pub all_cores: bool,
}

impl ParallelArgs {
    /// Options to layer over the configured defaults
    pub fn options(&self) -> Vec<ExecOption> {
        let mut options = Vec::new();
        if let Some(n) = self.jobs {
            options.push(ExecOption::UseCores(n));
        }
        if self.all_cores {
            options.push(ExecOption::UseAllCores);
        }
        options
    }
}

/// Arguments for the `emit` subcommand
#[derive(Parser, Debug)]
pub struct EmitArgs {
    /// Recipe manifest (TOML)
    pub manifest: PathBuf,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `run` subcommand
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Recipe manifest (TOML)
    pub manifest: PathBuf,

    #[command(flatten)]
    pub parallel: ParallelArgs,

    /// Directory to run make in
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,

    /// Environment variables for make in KEY=VALUE format
    #[arg(short, long = "env", value_parser = parse_key_value)]
    pub env: Vec<(String, String)>,

    /// Print the make command and Makefile instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Convert env pairs to a HashMap
    pub fn env_as_map(&self) -> HashMap<String, String> {
        self.env.iter().cloned().collect()
    }
}

/// Parse KEY=VALUE argument
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid argument '{}': expected KEY=VALUE format", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Arguments for the `touch` subcommand
#[derive(Parser, Debug)]
pub struct TouchArgs {
    /// Number of files to create
    #[arg(short = 'n', long, default_value = "5")]
    pub count: usize,

    /// File name prefix; files are named <prefix>0, <prefix>1, ...
    #[arg(long, default_value = "a")]
    pub prefix: String,

    #[command(flatten)]
    pub parallel: ParallelArgs,

    /// Directory to create the files in
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,

    /// Print the Makefile instead of running it
    #[arg(long)]
    pub emit: bool,
}

impl TouchArgs {
    /// One `touch <name>` recipe per file
    pub fn make_data(&self) -> MakeData {
        (0..self.count)
            .map(|i| {
                let name = format!("{}{}", self.prefix, i);
                Recipe::target(name.clone()).with_scripts([format!("touch {}", name)])
            })
            .collect()
    }
}

/// Arguments for the `config` subcommand
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Config output formats
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    /// TOML, as written in config files
    Toml,
    /// JSON output
    Json,
}

/// Error report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorFormat {
    /// `error: ...` with an optional `hint: ...` line
    Text,
    /// The error summary as JSON
    Json,
}
