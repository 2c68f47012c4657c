// src/artifact.rs

//! Artifact existence checks
//!
//! Before cooking a (recipe, variant) pair, brigade asks the kiln for the
//! artifact path that build would produce and skips the build when the
//! artifact already exists, on the local filesystem or in the remote depot.
//!
//! Known limitation: matching is by name, version, platform, and filename
//! only. The content hash of an existing artifact is never compared, so a
//! stale artifact with the right name suppresses a rebuild.

use crate::builder::Builder;
use crate::error::Result;
use crate::matrix::Variant;
use crate::recipe::parser::LoadedRecipe;
use crate::repository::{DepotSession, DistSpec, Distribution};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where an artifact was found, if anywhere
#[derive(Debug, Clone, PartialEq)]
pub enum Existence {
    /// Artifact present on the local filesystem
    Local(PathBuf),
    /// Artifact already uploaded to the depot
    Remote(Distribution),
    /// No matching artifact anywhere
    Missing,
}

impl Existence {
    pub fn exists(&self) -> bool {
        !matches!(self, Existence::Missing)
    }
}

/// Memoizing wrapper around the kiln's output-path query
///
/// The query forks the kiln, so it runs at most once per distinct
/// (recipe path, variant) key; repeat lookups are answered from the cache
/// for the rest of the run.
#[derive(Debug, Default)]
pub struct OutputCache {
    entries: HashMap<(PathBuf, Variant), PathBuf>,
}

impl OutputCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expected artifact path for a (recipe, variant) pair
    pub fn query(
        &mut self,
        builder: &Builder,
        recipe_dir: &Path,
        variant: &Variant,
    ) -> Result<PathBuf> {
        let key = (recipe_dir.to_path_buf(), variant.clone());
        if let Some(path) = self.entries.get(&key) {
            return Ok(path.clone());
        }

        let path = builder.output_path(recipe_dir, variant)?;
        self.entries.insert(key, path.clone());
        Ok(path)
    }
}

/// The existence oracle: local filesystem first, then the depot
pub struct Oracle<'a> {
    builder: &'a Builder,
    depot: Option<&'a DepotSession>,
    outputs: OutputCache,
}

impl<'a> Oracle<'a> {
    pub fn new(builder: &'a Builder, depot: Option<&'a DepotSession>) -> Self {
        Self {
            builder,
            depot,
            outputs: OutputCache::new(),
        }
    }

    /// Artifact path the kiln would produce for this pair (memoized)
    pub fn expected_artifact(
        &mut self,
        recipe: &LoadedRecipe,
        variant: &Variant,
    ) -> Result<PathBuf> {
        self.outputs.query(self.builder, &recipe.path, variant)
    }

    /// Decide whether a (recipe, variant) pair still needs building
    ///
    /// The local check short-circuits the depot lookup. A depot answer of
    /// "not found" is [`Existence::Missing`]; any other depot failure
    /// propagates rather than being guessed around.
    pub fn check(&mut self, recipe: &LoadedRecipe, variant: &Variant) -> Result<Existence> {
        let artifact = self.expected_artifact(recipe, variant)?;

        if artifact.exists() {
            debug!("Found local artifact {}", artifact.display());
            return Ok(Existence::Local(artifact));
        }

        if let Some(depot) = self.depot {
            let spec = DistSpec::from_artifact(&recipe.recipe, &artifact);
            if let Some(dist) = depot.find_dist(&spec)? {
                debug!("Found depot distribution {}", dist.full_name);
                return Ok(Existence::Remote(dist));
            }
        }

        Ok(Existence::Missing)
    }
}
