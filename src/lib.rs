// src/lib.rs

//! Brigade batch build driver
//!
//! Brigade drives an external single-recipe builder (the "kiln") across a
//! whole set of package recipes:
//!
//! - load every recipe named on the command line, skipping paths that are
//!   not recipes
//! - order the recipes so dependencies cook before their dependents
//! - expand the build matrix for recipes that build against a matrixed
//!   package (interpreter or numerics versions)
//! - skip every (recipe, variant) whose artifact already exists, locally or
//!   in the remote depot
//! - shell out to the kiln for whatever is left, in order
//!
//! Brigade never compiles anything itself and never uploads anything; both
//! are the kiln's and the depot's business.

pub mod artifact;
pub mod builder;
mod error;
pub mod matrix;
pub mod recipe;
pub mod repository;

pub use artifact::{Existence, Oracle, OutputCache};
pub use builder::Builder;
pub use error::{Error, Result};
pub use matrix::{BuildMatrix, BuildParam, Variant};
pub use recipe::{DepGraph, LoadedRecipe, Recipe, RecipeSet};
pub use repository::{DepotSession, DistSpec, Distribution};
