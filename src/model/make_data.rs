//! The in-memory Makefile: recipes, preamble and the synthesized `all` rule

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::recipe::Recipe;
use crate::error::MakeError;
use crate::executor::{ExecOptions, Invocation};

/// Name of the synthesized default target
pub const ALL_TARGET: &str = "all";

/// A complete generated Makefile
///
/// The `all` rule is derived from the recipes on every serialization and
/// is never stored, so it always reflects the current recipe set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MakeData {
    /// Raw text placed between the `all` rule and the recipes
    #[serde(default)]
    pub preamble: String,

    /// Recipes in output order
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl MakeData {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Append recipes in order
    pub fn add<I>(&mut self, recipes: I) -> &mut Self
    where
        I: IntoIterator<Item = Recipe>,
    {
        self.recipes.extend(recipes);
        self
    }

    /// Append a single recipe
    pub fn push(&mut self, recipe: Recipe) -> &mut Self {
        self.recipes.push(recipe);
        self
    }

    /// Replace the preamble
    pub fn set_preamble(&mut self, text: impl Into<String>) -> &mut Self {
        self.preamble = text.into();
        self
    }

    /// Append to the preamble
    pub fn append_preamble(&mut self, text: impl Into<String>) -> &mut Self {
        self.preamble.push_str(&text.into());
        self
    }

    /// Build the `all` rule: every recipe's targets, in recipe order
    pub fn all_recipe(&self) -> Recipe {
        Recipe::target(ALL_TARGET).with_deps(
            self.recipes
                .iter()
                .flat_map(|r| r.targets.iter().cloned()),
        )
    }

    /// Check that every recipe can be serialized
    ///
    /// # Errors
    /// * `MakeError::EmptyRecipe` - For the first recipe without targets
    pub fn validate(&self) -> Result<(), MakeError> {
        match self.recipes.iter().position(|r| r.targets.is_empty()) {
            Some(position) => Err(MakeError::EmptyRecipe { position }),
            None => Ok(()),
        }
    }

    /// Write the whole Makefile to a sink
    ///
    /// Output order: the `all` rule, the preamble verbatim, then each
    /// recipe. The model is validated before anything is written.
    ///
    /// # Errors
    /// * `MakeError::EmptyRecipe` - If a recipe has no targets
    /// * `MakeError::Io` - If writing to the sink fails
    pub fn serialize<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), MakeError> {
        self.validate()?;

        self.all_recipe().serialize(w)?;
        w.write_all(self.preamble.as_bytes())?;
        for recipe in &self.recipes {
            recipe.serialize(w)?;
        }

        Ok(())
    }

    /// Serialize into a String
    pub fn render(&self) -> Result<String, MakeError> {
        let mut buf = Vec::new();
        self.serialize(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Build the make invocation for a given Makefile path
    pub fn invocation(&self, options: &ExecOptions, makefile: &Path) -> Invocation {
        Invocation::new(options, makefile)
    }

    /// Write this model to a temporary Makefile and run make on it
    ///
    /// make inherits stdin, stdout and stderr and this call blocks until
    /// it exits. The temporary file is removed on every path out of this
    /// function.
    ///
    /// # Errors
    /// * `MakeError::TempFile` - If the temporary Makefile couldn't be created
    /// * `MakeError::EmptyRecipe` - If a recipe has no targets
    /// * `MakeError::ProgramNotFound` / `MakeError::SpawnFailed` - If make couldn't be started
    /// * `MakeError::CommandFailed` - If make exited unsuccessfully
    pub fn execute(&self, options: &ExecOptions) -> Result<(), MakeError> {
        crate::executor::execute(self, options)
    }
}

impl Extend<Recipe> for MakeData {
    fn extend<T: IntoIterator<Item = Recipe>>(&mut self, iter: T) {
        self.recipes.extend(iter);
    }
}

impl FromIterator<Recipe> for MakeData {
    fn from_iter<T: IntoIterator<Item = Recipe>>(iter: T) -> Self {
        Self {
            preamble: String::new(),
            recipes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MakeData {
        let mut data = MakeData::new();
        data.add([
            Recipe::target("a0").with_scripts(["touch a0"]),
            Recipe::new()
                .with_targets(["b0", "b1"])
                .with_deps(["a0"])
                .with_scripts(["touch b0 b1"]),
        ]);
        data
    }

    #[test]
    fn test_empty_model() {
        let mut data = MakeData::new();
        data.set_preamble("CC = cc\n");

        assert_eq!(data.render().unwrap(), "all:\n\nCC = cc\n");
    }

    #[test]
    fn test_all_rule_concatenates_targets_in_order() {
        let data = sample();

        let all = data.all_recipe();
        assert_eq!(all.targets, vec!["all"]);
        assert_eq!(all.deps, vec!["a0", "b0", "b1"]);
        assert!(all.scripts.is_empty());
    }

    #[test]
    fn test_serialize_layout() {
        let mut data = sample();
        data.set_preamble("SHELL = /bin/sh\n\n");

        let expected = "all: a0 b0 b1\n\n\
                        SHELL = /bin/sh\n\n\
                        a0:\n\ttouch a0\n\n\
                        b0 b1: a0\n\ttouch b0 b1\n\n";
        assert_eq!(data.render().unwrap(), expected);
    }

    #[test]
    fn test_records_match_recipe_serialization() {
        let data = sample();
        let output = data.render().unwrap();

        let mut expected = data.all_recipe().render().unwrap();
        for recipe in &data.recipes {
            expected.push_str(&recipe.render().unwrap());
        }
        assert_eq!(output, expected);
    }

    #[test]
    fn test_serialize_is_idempotent() {
        let data = sample();

        assert_eq!(data.render().unwrap(), data.render().unwrap());
    }

    #[test]
    fn test_all_rule_tracks_later_adds() {
        let mut data = sample();
        let before = data.render().unwrap();

        data.push(Recipe::target("c0"));
        let after = data.render().unwrap();

        assert!(before.starts_with("all: a0 b0 b1\n"));
        assert!(after.starts_with("all: a0 b0 b1 c0\n"));
        assert!(after.ends_with("c0:\n\n"));
    }

    #[test]
    fn test_preamble_append_and_set() {
        let mut data = MakeData::new();
        data.append_preamble("A = 1\n")
            .append_preamble(String::from("B = 2\n"));
        assert_eq!(data.preamble, "A = 1\nB = 2\n");

        data.set_preamble("C = 3\n");
        assert_eq!(data.preamble, "C = 3\n");
    }

    #[test]
    fn test_empty_recipe_rejected_before_writing() {
        let mut data = sample();
        data.push(Recipe::new().with_scripts(["echo orphan"]));

        let mut buf = Vec::new();
        let err = data.serialize(&mut buf).unwrap_err();

        assert!(matches!(err, MakeError::EmptyRecipe { position: 2 }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_duplicate_targets_not_detected() {
        let data: MakeData = vec![Recipe::target("x"), Recipe::target("x")]
            .into_iter()
            .collect();

        assert_eq!(data.render().unwrap(), "all: x x\n\nx:\n\nx:\n\n");
    }

    #[test]
    fn test_invocation_uses_makefile_path() {
        let data = sample();
        let inv = data.invocation(&ExecOptions::default(), Path::new("/tmp/Makefile.abc"));

        assert_eq!(inv.program(), "make");
        assert_eq!(inv.arg_strings(), ["-f", "/tmp/Makefile.abc"]);
    }
}
