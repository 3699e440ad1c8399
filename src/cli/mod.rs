//! CLI module for makedata
//!
//! Provides command-line interface with the following subcommands:
//! - `emit` - Print the Makefile generated from a manifest
//! - `run` - Generate a Makefile and run make on it
//! - `touch` - Create N files through N independent make targets
//! - `config` - Show configuration

pub mod commands;

pub use commands::{Cli, Commands};
