//! makedata - programmatic Makefile generation
//!
//! Describe build targets in code, render them as a Makefile, and let
//! `make` do the dependency ordering, staleness checks and parallel
//! scheduling.
//!
//! ## Example
//!
//! ```no_run
//! use makedata::{ExecOptions, MakeData, Recipe};
//!
//! let mut data = MakeData::new();
//! for i in 0..5 {
//!     let name = format!("a{}", i);
//!     data.push(Recipe::target(name.clone()).with_scripts([format!("touch {}", name)]));
//! }
//!
//! // make -f /tmp/MakefileXXXX -j 4
//! data.execute(&ExecOptions::default().with_jobs(4))?;
//! # Ok::<(), makedata::MakeError>(())
//! ```
//!
//! ## Output format
//!
//! ```text
//! all: a0 a1
//!
//! <preamble>a0:
//! 	touch a0
//!
//! a1:
//! 	touch a1
//!
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod model;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{ErrorInfo, MakeError};
pub use executor::{ExecOption, ExecOptions, Invocation, Parallelism};
pub use model::{load_manifest, MakeData, Recipe};
