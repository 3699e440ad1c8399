//! make invocation and the temporary Makefile lifecycle
//!
//! `execute` walks one MakeData through:
//! temp file created → serialized → make launched → make exited → temp file removed.
//! The temp file is held by a `tempfile` guard, so it is removed on every
//! path out of `execute`, including serialization and spawn failures.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use super::options::ExecOptions;
use crate::error::{suggest_fix, MakeError};
use crate::model::MakeData;

/// A fully built make command line
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    working_dir: Option<PathBuf>,
    env: HashMap<String, String>,
}

impl Invocation {
    /// Build `<program> -f <makefile> [-j [N]]`
    pub fn new(options: &ExecOptions, makefile: &Path) -> Self {
        let mut args: Vec<OsString> = vec!["-f".into(), makefile.as_os_str().to_owned()];
        args.extend(options.parallelism.args());

        Self {
            program: options.program.clone(),
            args,
            working_dir: options.working_dir.clone(),
            env: options.env.clone(),
        }
    }

    /// Program to run
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, without the program name
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as (lossy) strings
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Command line for display/logging
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.arg_strings());
        parts.join(" ")
    }

    /// Locate the program on PATH, relative to make's working directory
    ///
    /// The result is absolute, since the child is spawned inside
    /// `working_dir` and a relative path would be resolved a second time.
    fn resolve_program(&self) -> Result<PathBuf, MakeError> {
        let cwd = std::env::current_dir()?;
        let cwd = match &self.working_dir {
            Some(dir) => cwd.join(dir),
            None => cwd,
        };

        which::which_in(&self.program, std::env::var_os("PATH"), cwd).map_err(|e| {
            tracing::debug!("Could not resolve '{}': {}", self.program, e);
            MakeError::ProgramNotFound {
                program: self.program.clone(),
            }
        })
    }

    /// Build the process with stdin, stdout and stderr inherited
    fn to_command(&self) -> Result<Command, MakeError> {
        let mut cmd = Command::new(self.resolve_program()?);
        cmd.args(&self.args);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        Ok(cmd)
    }

    /// Run make and block until it exits
    ///
    /// # Errors
    /// * `MakeError::ProgramNotFound` - If the program isn't on PATH
    /// * `MakeError::SpawnFailed` - If the process couldn't be started
    /// * `MakeError::CommandFailed` - If make exited unsuccessfully
    pub fn run(&self) -> Result<(), MakeError> {
        let start = Instant::now();
        let command_str = self.command_line();
        let mut cmd = self.to_command()?;

        tracing::debug!("Executing: {}", command_str);

        let status = cmd.status().map_err(|e| MakeError::SpawnFailed {
            command: command_str.clone(),
            error: e.to_string(),
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!("{} finished with {} in {}ms", self.program, status, duration_ms);

        if status.success() {
            Ok(())
        } else {
            let exit_code = status.code();
            Err(MakeError::CommandFailed {
                suggestion: suggest_fix(&command_str, exit_code),
                command: command_str,
                exit_code,
            })
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Write `data` to a temporary Makefile and run make on it
///
/// # Errors
/// See [`MakeData::execute`].
pub fn execute(data: &MakeData, options: &ExecOptions) -> Result<(), MakeError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(&options.temp_prefix);

    let mut makefile = match &options.temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(MakeError::TempFile)?;

    tracing::debug!("Writing Makefile to {}", makefile.path().display());

    {
        let mut writer = BufWriter::new(makefile.as_file_mut());
        data.serialize(&mut writer)?;
        writer.flush()?;
    }

    // Drop the write handle; the path guard still removes the file.
    let path = makefile.into_temp_path();
    let result = data.invocation(options, &path).run();

    let makefile_path = path.display().to_string();
    if let Err(e) = path.close() {
        tracing::warn!("Failed to remove temporary Makefile {}: {}", makefile_path, e);
    }

    result
}
