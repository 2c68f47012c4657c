// src/recipe/parser.rs

//! Recipe loading
//!
//! A recipe is addressed by path: either a recipe directory containing a
//! `recipe.toml`, or a direct path to a TOML file. `RecipeSet` loads a
//! whole batch at once, loading each distinct path once and quietly
//! dropping paths that are not recipes.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up inside a recipe directory
pub const RECIPE_FILE: &str = "recipe.toml";

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    let recipe: Recipe =
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))?;

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError(
            "Recipe package name cannot be empty".to_string(),
        ));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError(
            "Recipe package version cannot be empty".to_string(),
        ));
    }

    Ok(recipe)
}

/// Parse a recipe from a path
///
/// A directory path is resolved to the `recipe.toml` inside it.
pub fn parse_recipe_path(path: &Path) -> Result<Recipe> {
    let file = if path.is_dir() {
        path.join(RECIPE_FILE)
    } else {
        path.to_path_buf()
    };

    let content = std::fs::read_to_string(&file)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {}", file.display(), e)))?;

    parse_recipe(&content)
}

/// One successfully loaded recipe and the path it was loaded from
///
/// The path is what gets handed back to the kiln, so it is kept in
/// canonical form.
#[derive(Debug, Clone)]
pub struct LoadedRecipe {
    pub path: PathBuf,
    pub recipe: Recipe,
}

/// All recipes under consideration for one run
///
/// Each distinct path is loaded exactly once and kept for the lifetime of
/// the set. Paths that cannot be loaded as recipes are skipped, not fatal:
/// callers routinely point brigade at directories that mix recipes with
/// other content.
#[derive(Debug, Default)]
pub struct RecipeSet {
    entries: Vec<LoadedRecipe>,
    by_name: HashMap<String, usize>,
}

impl RecipeSet {
    /// Load every path that parses as a recipe
    pub fn load<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut set = Self::default();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for path in paths {
            let canonical = match path.canonicalize() {
                Ok(p) => p,
                Err(err) => {
                    debug!("Skipping {}: {}", path.display(), err);
                    continue;
                }
            };
            if !seen.insert(canonical.clone()) {
                continue;
            }

            let recipe = match parse_recipe_path(&canonical) {
                Ok(r) => r,
                Err(err) => {
                    debug!("Skipping {}: {}", canonical.display(), err);
                    continue;
                }
            };

            match set.by_name.entry(recipe.package.name.clone()) {
                Entry::Occupied(existing) => {
                    warn!(
                        "Duplicate package name '{}' in {}; keeping {}",
                        recipe.package.name,
                        canonical.display(),
                        set.entries[*existing.get()].path.display()
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(set.entries.len());
                    set.entries.push(LoadedRecipe {
                        path: canonical,
                        recipe,
                    });
                }
            }
        }

        set
    }

    /// Look up a loaded recipe by package name
    pub fn get(&self, name: &str) -> Option<&LoadedRecipe> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// All loaded recipes, in load order
    pub fn entries(&self) -> &[LoadedRecipe] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedRecipe> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
