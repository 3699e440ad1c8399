//! Common test utilities for makedata tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Creates a temporary directory with a manifest file
pub fn create_manifest_project(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let manifest_path = dir.path().join("build.toml");
    std::fs::write(&manifest_path, content).expect("Failed to write manifest");
    (dir, manifest_path)
}

/// Writes a config file that points `make.command` at `program`
pub fn write_config(dir: &Path, program: &str) -> PathBuf {
    let path = dir.join("makedata-test.toml");
    std::fs::write(&path, format!("[make]\ncommand = \"{}\"\n", program))
        .expect("Failed to write config");
    path
}

/// The makedata binary, isolated from the user's config files
pub fn makedata(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("makedata").expect("binary should build");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

/// Whether a real make is available
pub fn has_make() -> bool {
    which::which("make").is_ok()
}

/// Two-step manifest with a preamble
pub const SAMPLE_MANIFEST: &str = r#"
preamble = "GREETING = hello\n\n"

[[recipes]]
targets = ["greeting.txt"]
scripts = ["echo $(GREETING) > greeting.txt"]

[[recipes]]
targets = ["copy.txt"]
deps = ["greeting.txt"]
scripts = ["cp greeting.txt copy.txt"]
"#;

/// Makefile generated from SAMPLE_MANIFEST
pub const SAMPLE_MAKEFILE: &str = "all: greeting.txt copy.txt\n\
\n\
GREETING = hello\n\
\n\
greeting.txt:\n\
\techo $(GREETING) > greeting.txt\n\
\n\
copy.txt: greeting.txt\n\
\tcp greeting.txt copy.txt\n\
\n";

/// Manifest whose only recipe fails
pub const FAILING_MANIFEST: &str = r#"
[[recipes]]
targets = ["broken"]
scripts = ["exit 1"]
"#;

/// Manifest with a recipe missing its targets
pub const EMPTY_TARGET_MANIFEST: &str = r#"
[[recipes]]
targets = ["ok"]

[[recipes]]
scripts = ["echo orphan"]
"#;
