//! Configuration value interpolation
//!
//! Path-like config values (`make.command`, `exec.temp_dir`) support:
//! - `$VAR` or `${VAR}` - Environment variable substitution
//! - `$(command)` - Shell command execution
//!
//! Makefile content (preambles, scripts) is never interpolated; `$(VAR)`
//! there belongs to make.

use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::Config;

/// Matches `$(command)`
static COMMAND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\(([^)]+)\)").unwrap());

/// Matches `${VAR}`
static BRACKETED_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Matches `$VAR`
static SIMPLE_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Interpolate a string with shell commands, then environment variables
///
/// # Examples
///
/// ```
/// use makedata::config::interpolate::interpolate_string;
///
/// std::env::set_var("MAKEDATA_DOC_DIR", "/scratch");
/// assert_eq!(interpolate_string("${MAKEDATA_DOC_DIR}/tmp"), "/scratch/tmp");
/// std::env::remove_var("MAKEDATA_DOC_DIR");
/// ```
pub fn interpolate_string(s: &str) -> String {
    // Commands first, so their output isn't re-read as variables
    let result = COMMAND_RE.replace_all(s, |caps: &regex::Captures| {
        let cmd = &caps[1];
        match execute_shell_command(cmd) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Failed to execute config command '{}': {}", cmd, e);
                format!("$({})_ERROR", cmd)
            }
        }
    });

    let result = BRACKETED_VAR_RE.replace_all(&result, lookup_env);
    SIMPLE_VAR_RE.replace_all(&result, lookup_env).into_owned()
}

fn lookup_env(caps: &regex::Captures) -> String {
    let var = &caps[1];
    std::env::var(var).unwrap_or_else(|_| {
        tracing::debug!("Environment variable '{}' not set", var);
        String::new()
    })
}

/// Execute a shell command and return its trimmed stdout
fn execute_shell_command(cmd: &str) -> Result<String, std::io::Error> {
    let output = Command::new("sh").arg("-c").arg(cmd).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(std::io::Error::other(format!("Command failed: {}", stderr)))
    }
}

/// Interpolate the path-like values of a Config
pub fn interpolate_config(config: &mut Config) {
    config.make.command = interpolate_string(&config.make.command);

    if let Some(ref mut dir) = config.exec.temp_dir {
        *dir = interpolate_string(dir);
    }
}
