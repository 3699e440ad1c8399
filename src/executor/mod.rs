//! Makefile execution module
//!
//! Provides:
//! - Parallelism options (`-j N`, bare `-j`, or none)
//! - make command-line construction
//! - Temporary Makefile lifecycle and process launch with inherited stdio

pub mod options;
pub mod runner;

pub use options::*;
pub use runner::{execute, Invocation};
