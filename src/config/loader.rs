//! Layered config loading
//!
//! Files are read from the least to the most specific location and later
//! values replace earlier ones:
//! 1. `/etc/makedata/config.toml`
//! 2. `$XDG_CONFIG_HOME/makedata/config.toml`
//! 3. `~/.makedata.toml`
//! 4. `./.makedata.toml`
//!
//! An explicit `--config` file and then `MAKEDATA_*` variables sit on top.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use super::interpolate::interpolate_config;
use super::model::Config;

const APP_NAME: &str = "makedata";

/// `MAKEDATA_EXEC__JOBS=4` sets `exec.jobs`
const ENV_PREFIX: &str = "MAKEDATA_";
const ENV_SEPARATOR: &str = "__";

/// Candidate config files, least specific first
pub fn config_paths() -> Vec<PathBuf> {
    let system = Some(PathBuf::from(format!("/etc/{}/config.toml", APP_NAME)));
    let xdg = dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"));
    let home = dirs::home_dir().map(|dir| dir.join(format!(".{}.toml", APP_NAME)));
    let project = Some(PathBuf::from(format!(".{}.toml", APP_NAME)));

    [system, xdg, home, project].into_iter().flatten().collect()
}

/// Config files from [`config_paths`] that exist on disk
pub fn find_config_files() -> Vec<PathBuf> {
    config_paths().into_iter().filter(|p| p.exists()).collect()
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    tracing::debug!("Reading config {}", path.display());
    figment.merge(Toml::file(path))
}

/// Resolve the effective configuration
///
/// `override_path` is merged after every discovered file. A missing
/// override is logged and skipped. Path-like values are interpolated last.
///
/// # Errors
/// Returns an error when a layer holds a value of the wrong type.
pub fn load_config(override_path: Option<&str>) -> Result<Config> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
    for path in find_config_files() {
        figment = merge_file(figment, &path);
    }

    if let Some(path) = override_path.map(Path::new) {
        if path.exists() {
            figment = merge_file(figment, path);
        } else {
            tracing::warn!("Config file {} does not exist, ignoring it", path.display());
        }
    }

    let mut config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
        .extract()
        .context("Failed to load configuration")?;

    interpolate_config(&mut config);
    Ok(config)
}
