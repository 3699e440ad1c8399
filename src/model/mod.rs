//! Makefile model
//!
//! - `Recipe` - one rule (targets, prerequisites, commands)
//! - `MakeData` - a whole Makefile with the synthesized `all` rule
//! - `manifest` - TOML descriptions of a `MakeData`

pub mod make_data;
pub mod manifest;
pub mod recipe;

pub use make_data::{MakeData, ALL_TARGET};
pub use manifest::{load_manifest, parse_manifest};
pub use recipe::Recipe;
