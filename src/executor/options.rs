//! Execution options for running make on a generated Makefile

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Default program used to build the generated Makefile
pub const DEFAULT_PROGRAM: &str = "make";

/// Default prefix for temporary Makefile names
pub const DEFAULT_TEMP_PREFIX: &str = "Makefile";

/// How many jobs make may run at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// No `-j` flag: make runs one job at a time
    #[default]
    Sequential,
    /// `-j N`
    Jobs(usize),
    /// Bare `-j`: no job limit
    AllCores,
}

impl Parallelism {
    /// Fixed job count; 0 means sequential
    pub fn jobs(n: usize) -> Self {
        match n {
            0 => Parallelism::Sequential,
            n => Parallelism::Jobs(n),
        }
    }

    /// Command-line flags for this mode
    pub fn args(&self) -> Vec<OsString> {
        match self {
            Parallelism::Sequential => vec![],
            Parallelism::Jobs(n) => vec!["-j".into(), n.to_string().into()],
            Parallelism::AllCores => vec!["-j".into()],
        }
    }
}

/// A single parallelism option
///
/// Options are applied in order and the last one wins:
/// `[UseCores(4), UseAllCores]` runs with bare `-j`, while
/// `[UseAllCores, UseCores(4)]` runs with `-j 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOption {
    /// Run at most N jobs at once
    UseCores(usize),
    /// Let make run as many jobs as it likes
    UseAllCores,
}

impl From<ExecOption> for Parallelism {
    fn from(option: ExecOption) -> Self {
        match option {
            ExecOption::UseCores(n) => Parallelism::jobs(n),
            ExecOption::UseAllCores => Parallelism::AllCores,
        }
    }
}

/// Options for executing a MakeData
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Program to run (normally `make`)
    pub program: String,
    /// Parallelism mode
    pub parallelism: Parallelism,
    /// Working directory for make
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables for make
    pub env: HashMap<String, String>,
    /// Directory for the temporary Makefile (system temp dir if unset)
    pub temp_dir: Option<PathBuf>,
    /// Prefix for the temporary Makefile's name
    pub temp_prefix: String,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            parallelism: Parallelism::Sequential,
            working_dir: None,
            env: HashMap::new(),
            temp_dir: None,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

impl ExecOptions {
    /// Create options with a working directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Apply one option, replacing the current parallelism mode
    pub fn apply(mut self, option: ExecOption) -> Self {
        self.parallelism = option.into();
        self
    }

    /// Run at most `n` jobs at once
    pub fn with_jobs(self, n: usize) -> Self {
        self.apply(ExecOption::UseCores(n))
    }

    /// Run with make's unlimited `-j`
    pub fn with_all_cores(self) -> Self {
        self.apply(ExecOption::UseAllCores)
    }

    /// Set the parallelism mode directly
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Use a different make program
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Add an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Create the temporary Makefile in `dir`
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Set the temporary Makefile's name prefix
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }
}

impl Extend<ExecOption> for ExecOptions {
    fn extend<T: IntoIterator<Item = ExecOption>>(&mut self, iter: T) {
        for option in iter {
            self.parallelism = option.into();
        }
    }
}

impl FromIterator<ExecOption> for ExecOptions {
    fn from_iter<T: IntoIterator<Item = ExecOption>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), Self::apply)
    }
}
