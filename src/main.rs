//! makedata CLI entry point
//!
//! Usage:
//!   makedata emit <manifest>        Print the generated Makefile
//!   makedata run <manifest> [-j N]  Generate and run a Makefile
//!   makedata touch [-n COUNT]       Create COUNT files via make
//!   makedata config                 Show configuration

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use makedata::cli::commands::{
    ConfigArgs, ConfigFormat, EmitArgs, ErrorFormat, ParallelArgs, RunArgs, TouchArgs,
};
use makedata::cli::{Cli, Commands};
use makedata::config::{find_config_files, load_config, Config};
use makedata::{load_manifest, ErrorInfo, ExecOptions, MakeData};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let error_format = cli.error_format;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let info = ErrorInfo::from_chain(&e);
            report_error(&info, error_format);
            make_exit_code(&info)
                .map(ExitCode::from)
                .unwrap_or(ExitCode::FAILURE)
        }
    }
}

/// Log to stderr so emitted Makefiles on stdout stay clean
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "makedata=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report_error(info: &ErrorInfo, format: ErrorFormat) {
    match format {
        ErrorFormat::Text => {
            eprintln!("{}: {}", "error".red().bold(), info.message);
            if let Some(ref hint) = info.suggestion {
                eprintln!("{}: {}", "hint".yellow(), hint);
            }
        }
        ErrorFormat::Json => match serde_json::to_string_pretty(info) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("error: {}", info.message),
        },
    }
}

/// make's own exit code, when make is what failed
fn make_exit_code(info: &ErrorInfo) -> Option<u8> {
    info.exit_code
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Emit(args) => emit(args),
        Commands::Run(args) => run_manifest(args, cli.config.as_deref(), cli.verbose),
        Commands::Touch(args) => touch(args, cli.config.as_deref(), cli.verbose),
        Commands::Config(args) => show_config(args, cli.config.as_deref(), cli.verbose),
    }
}

/// Print or write the Makefile for a manifest
fn emit(args: EmitArgs) -> Result<()> {
    let data = load_manifest(&args.manifest)?;

    match args.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            data.serialize(&mut writer)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            data.serialize(&mut stdout)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Build execution options: config defaults, then CLI flags
fn build_options(
    config: &Config,
    parallel: &ParallelArgs,
    directory: Option<PathBuf>,
) -> ExecOptions {
    let mut options = config.exec_options();
    options.extend(parallel.options());
    options.working_dir = directory;
    options
}

/// Run a manifest through make
fn run_manifest(args: RunArgs, config_path: Option<&str>, verbose: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let data = load_manifest(&args.manifest)?;

    let mut options = build_options(&config, &args.parallel, args.directory.clone());
    options.env = args.env_as_map();

    if args.dry_run {
        return print_dry_run(&data, &options);
    }

    execute(&data, &options, verbose)
        .with_context(|| format!("Failed to build {}", args.manifest.display()))
}

/// Create COUNT files through COUNT independent make targets
fn touch(args: TouchArgs, config_path: Option<&str>, verbose: bool) -> Result<()> {
    let data = args.make_data();

    if args.emit {
        print!("{}", data.render()?);
        return Ok(());
    }

    let config = load_config(config_path)?;
    let options = build_options(&config, &args.parallel, args.directory.clone());

    execute(&data, &options, verbose)
}

fn execute(data: &MakeData, options: &ExecOptions, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!(
            "{}: {} recipes with {}",
            "make".cyan(),
            data.recipes.len(),
            options.program
        );
    }

    data.execute(options)?;

    if verbose {
        eprintln!("{}: all targets up to date", "success".green());
    }
    Ok(())
}

fn print_dry_run(data: &MakeData, options: &ExecOptions) -> Result<()> {
    let invocation = data.invocation(options, Path::new("<makefile>"));

    println!("{}: {}", "command".cyan(), invocation);
    if let Some(ref dir) = options.working_dir {
        println!("{}: {}", "directory".cyan(), dir.display());
    }
    println!();
    print!("{}", data.render()?);

    Ok(())
}

/// Show the resolved configuration
fn show_config(args: ConfigArgs, config_path: Option<&str>, verbose: bool) -> Result<()> {
    let config = load_config(config_path)?;

    if verbose {
        for path in find_config_files() {
            eprintln!("{}: {}", "config file".cyan(), path.display());
        }
        if let Some(path) = config_path {
            eprintln!("{}: {}", "override".cyan(), path);
        }
    }

    match args.format {
        ConfigFormat::Toml => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use makedata::{MakeError, Parallelism};

    #[test]
    fn test_build_options_cli_overrides_config() {
        let mut config = Config::default();
        config.exec.jobs = Some(2);

        let parallel = ParallelArgs {
            jobs: None,
            all_cores: true,
        };
        let options = build_options(&config, &parallel, Some(PathBuf::from("/tmp")));

        assert_eq!(options.parallelism, Parallelism::AllCores);
        assert_eq!(options.working_dir, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_build_options_keeps_config_without_flags() {
        let mut config = Config::default();
        config.exec.jobs = Some(3);
        config.make.command = "gmake".to_string();

        let options = build_options(&config, &ParallelArgs::default(), None);

        assert_eq!(options.parallelism, Parallelism::Jobs(3));
        assert_eq!(options.program, "gmake");
    }

    #[test]
    fn test_make_exit_code() {
        let err = anyhow::Error::new(MakeError::CommandFailed {
            command: "make -f x".to_string(),
            exit_code: Some(2),
            suggestion: None,
        })
        .context("Failed to build build.toml");
        assert_eq!(make_exit_code(&ErrorInfo::from_chain(&err)), Some(2));

        let signalled = anyhow::Error::new(MakeError::CommandFailed {
            command: "make -f x".to_string(),
            exit_code: None,
            suggestion: None,
        });
        assert_eq!(make_exit_code(&ErrorInfo::from_chain(&signalled)), None);

        let other = ErrorInfo::from_chain(&anyhow::anyhow!("boom"));
        assert_eq!(make_exit_code(&other), None);
    }
}
