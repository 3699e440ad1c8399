//! TOML recipe manifests
//!
//! A manifest is a `MakeData` written out as TOML:
//!
//! ```toml
//! preamble = "CC = cc\n\n"
//!
//! [[recipes]]
//! targets = ["hello.o"]
//! deps = ["hello.c"]
//! scripts = ["$(CC) -c hello.c"]
//! ```

use std::path::Path;

use super::make_data::MakeData;
use crate::error::MakeError;

/// Parse a manifest from a string
///
/// `origin` is only used in error messages.
pub fn parse_manifest(content: &str, origin: &str) -> Result<MakeData, MakeError> {
    toml::from_str(content).map_err(|e| MakeError::Manifest {
        path: origin.to_string(),
        message: e.message().to_string(),
    })
}

/// Load a manifest file
///
/// # Errors
/// * `MakeError::Manifest` - If the file can't be read or isn't a valid manifest
pub fn load_manifest(path: &Path) -> Result<MakeData, MakeError> {
    let content = std::fs::read_to_string(path).map_err(|e| MakeError::Manifest {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let data = parse_manifest(&content, &path.display().to_string())?;
    tracing::debug!(
        "Loaded {} recipes from {}",
        data.recipes.len(),
        path.display()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Recipe;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_manifest() {
        let content = r#"
            preamble = "CC = cc\n\n"

            [[recipes]]
            targets = ["hello.o"]
            deps = ["hello.c"]
            scripts = ["$(CC) -c hello.c"]

            [[recipes]]
            targets = ["hello"]
            deps = ["hello.o"]
            scripts = ["$(CC) -o hello hello.o"]
        "#;

        let data = parse_manifest(content, "inline").unwrap();

        assert_eq!(data.preamble, "CC = cc\n\n");
        assert_eq!(data.recipes.len(), 2);
        assert_eq!(
            data.recipes[0],
            Recipe::target("hello.o")
                .with_deps(["hello.c"])
                .with_scripts(["$(CC) -c hello.c"])
        );
        assert!(data.render().unwrap().starts_with("all: hello.o hello\n\nCC = cc\n\n"));
    }

    #[test]
    fn test_parse_minimal_manifest() {
        let content = r#"
            [[recipes]]
            targets = ["a"]
        "#;

        let data = parse_manifest(content, "inline").unwrap();

        assert!(data.preamble.is_empty());
        assert!(data.recipes[0].deps.is_empty());
        assert!(data.recipes[0].scripts.is_empty());
    }

    #[test]
    fn test_missing_targets_parse_but_fail_to_render() {
        let content = r#"
            [[recipes]]
            scripts = ["echo nothing"]
        "#;

        let data = parse_manifest(content, "inline").unwrap();
        assert!(matches!(
            data.render(),
            Err(MakeError::EmptyRecipe { position: 0 })
        ));
    }

    #[test]
    fn test_invalid_manifest() {
        let err = parse_manifest("recipes = 3", "bad.toml").unwrap_err();

        match err {
            MakeError::Manifest { path, .. } => assert_eq!(path, "bad.toml"),
            other => panic!("Expected Manifest error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_manifest_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.toml");
        fs::write(&path, "[[recipes]]\ntargets = [\"out\"]\nscripts = [\"touch out\"]\n").unwrap();

        let data = load_manifest(&path).unwrap();
        assert_eq!(data.render().unwrap(), "all: out\n\nout:\n\ttouch out\n\n");
    }

    #[test]
    fn test_load_missing_manifest() {
        let err = load_manifest(Path::new("/nonexistent/build.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/build.toml"));
    }

    #[test]
    fn test_manifest_roundtrip_preserves_order() {
        let mut data = MakeData::new();
        data.add([Recipe::target("z"), Recipe::target("a")]);

        let text = toml::to_string(&data).unwrap();
        let parsed = parse_manifest(&text, "roundtrip").unwrap();

        assert_eq!(parsed, data);
    }
}
