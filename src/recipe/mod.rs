// src/recipe/mod.rs

//! Recipe loading and build ordering
//!
//! A recipe describes one buildable package: its name, version, and the
//! requirement sets brigade uses to order builds. This module owns the
//! on-disk format, batch loading, and the dependency graph the build order
//! comes from.

pub mod format;
pub mod graph;
pub mod parser;

pub use format::{requirement_name, BuildSection, PackageSection, Recipe};
pub use graph::{topo_sort, DepGraph};
pub use parser::{parse_recipe, parse_recipe_path, LoadedRecipe, RecipeSet, RECIPE_FILE};
