//! A single Makefile rule: targets, prerequisites and shell commands

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::MakeError;

/// One rule of a generated Makefile
///
/// All three lists are append-only and keep insertion order. The first
/// target is the primary name and anchors the rule line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Recipe {
    /// Target names, primary first
    #[serde(default)]
    pub targets: Vec<String>,

    /// Prerequisite names
    #[serde(default)]
    pub deps: Vec<String>,

    /// Shell command lines, emitted verbatim
    #[serde(default)]
    pub scripts: Vec<String>,
}

impl Recipe {
    /// Create an empty recipe
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recipe with a single target
    pub fn target(name: impl Into<String>) -> Self {
        Self {
            targets: vec![name.into()],
            ..Default::default()
        }
    }

    /// Append target names
    pub fn add_targets<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append prerequisite names
    pub fn add_deps<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append shell command lines
    pub fn add_scripts<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Add targets (builder form)
    pub fn with_targets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_targets(names);
        self
    }

    /// Add prerequisites (builder form)
    pub fn with_deps<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_deps(names);
        self
    }

    /// Add shell commands (builder form)
    pub fn with_scripts<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_scripts(lines);
        self
    }

    /// Write this rule as a Makefile record
    ///
    /// Format: `t1 t2: d1 d2\n`, then one `\t<command>\n` per script,
    /// then a blank separator line.
    ///
    /// # Errors
    /// * `MakeError::NoTargets` - If the recipe has no targets; nothing is written
    /// * `MakeError::Io` - If writing to the sink fails
    pub fn serialize<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), MakeError> {
        let (primary, rest) = self.targets.split_first().ok_or(MakeError::NoTargets)?;

        write!(w, "{}", primary)?;
        for target in rest {
            write!(w, " {}", target)?;
        }
        w.write_all(b":")?;
        for dep in &self.deps {
            write!(w, " {}", dep)?;
        }
        w.write_all(b"\n")?;

        for script in &self.scripts {
            writeln!(w, "\t{}", script)?;
        }
        w.write_all(b"\n")?;

        Ok(())
    }

    /// Serialize into a String
    pub fn render(&self) -> Result<String, MakeError> {
        let mut buf = Vec::new();
        self.serialize(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
