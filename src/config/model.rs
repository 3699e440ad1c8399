//! Configuration model for makedata
//!
//! Defines the structure for XDG-compliant layered configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::executor::{ExecOptions, Parallelism, DEFAULT_PROGRAM, DEFAULT_TEMP_PREFIX};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// How to invoke make
    #[serde(default)]
    pub make: MakeConfig,

    /// Execution defaults
    #[serde(default)]
    pub exec: ExecConfig,
}

/// make program configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MakeConfig {
    /// Command to execute make
    #[serde(default = "default_make_command")]
    pub command: String,
}

fn default_make_command() -> String {
    DEFAULT_PROGRAM.to_string()
}

impl Default for MakeConfig {
    fn default() -> Self {
        Self {
            command: default_make_command(),
        }
    }
}

/// Execution defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecConfig {
    /// Fixed job count (0 or unset = sequential)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,

    /// Run make with a bare `-j`; takes precedence over `jobs`
    #[serde(default)]
    pub all_cores: bool,

    /// Directory for temporary Makefiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<String>,

    /// Prefix for temporary Makefile names
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,
}

fn default_temp_prefix() -> String {
    DEFAULT_TEMP_PREFIX.to_string()
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            jobs: None,
            all_cores: false,
            temp_dir: None,
            temp_prefix: default_temp_prefix(),
        }
    }
}

impl ExecConfig {
    /// Parallelism mode described by this section
    pub fn parallelism(&self) -> Parallelism {
        if self.all_cores {
            Parallelism::AllCores
        } else {
            self.jobs.map(Parallelism::jobs).unwrap_or_default()
        }
    }
}

impl Config {
    /// Execution options seeded from this configuration
    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            program: self.make.command.clone(),
            parallelism: self.exec.parallelism(),
            temp_dir: self.exec.temp_dir.as_ref().map(PathBuf::from),
            temp_prefix: self.exec.temp_prefix.clone(),
            ..Default::default()
        }
    }
}
