// src/commands/build.rs

//! Build command - cook every recipe that still needs cooking
//!
//! The driver: expand the recipe arguments, load everything that parses as
//! a recipe, resolve the full build order up front, then walk it variant by
//! variant, skipping pairs whose artifact already exists. One failed build
//! does not stop the walk; the run exits nonzero at the end if anything
//! failed.

use anyhow::{bail, Context, Result};
use brigade::artifact::{Existence, Oracle};
use brigade::builder::Builder;
use brigade::matrix::{BuildMatrix, BuildParam, Variant};
use brigade::recipe::{DepGraph, RecipeSet};
use brigade::repository::DepotSession;
use brigade::Error;
use std::path::PathBuf;
use tracing::info;

/// Options for the build run, mirrored from the CLI
pub struct BuildOptions {
    pub recipes: Vec<String>,
    pub namespace: Option<String>,
    pub depot_url: String,
    pub builder: String,
    pub skip_checks: bool,
    pub python_versions: String,
    pub numpy_versions: String,
}

/// One (recipe, variant) that did not build
struct Failure {
    recipe: String,
    variant: Variant,
    detail: String,
}

/// Cook a set of recipes in dependency order
pub fn cmd_build(opts: BuildOptions) -> Result<()> {
    let paths = expand_patterns(&opts.recipes);
    let recipes = RecipeSet::load(paths);
    if recipes.is_empty() {
        bail!("no recipes found under the given paths");
    }
    println!("Loaded {} recipe(s)", recipes.len());

    // Ordering must fully resolve before anything cooks.
    let graph = DepGraph::from_recipes(recipes.entries());
    let order = graph
        .topological_sort()
        .context("cannot determine a build order")?;
    println!("Build order: {}", order.join(", "));

    let matrix = BuildMatrix::new(vec![
        BuildParam::new("python", parse_version_list(&opts.python_versions)?),
        BuildParam::new("numpy", parse_version_list(&opts.numpy_versions)?),
    ]);

    let builder = Builder::locate(&opts.builder)?;
    let depot = match &opts.namespace {
        Some(namespace) => Some(
            DepotSession::authenticate(&opts.depot_url, namespace)
                .context("depot authentication failed")?,
        ),
        None => None,
    };

    let mut oracle = Oracle::new(&builder, depot.as_ref());
    let mut built = 0usize;
    let mut skipped = 0usize;
    let mut failures: Vec<Failure> = Vec::new();

    for name in &order {
        let Some(loaded) = recipes.get(name) else {
            continue;
        };

        for variant in matrix.variants_for(&loaded.recipe) {
            match oracle.check(loaded, &variant) {
                Ok(Existence::Local(path)) => {
                    println!("Skipping {} [{}]: {} exists", name, variant, path.display());
                    skipped += 1;
                }
                Ok(Existence::Remote(dist)) => {
                    println!(
                        "Skipping {} [{}]: {} already in depot",
                        name, variant, dist.full_name
                    );
                    skipped += 1;
                }
                Ok(Existence::Missing) => {
                    println!("Building {} [{}]", name, variant);
                    match builder.build(&loaded.path, &variant, opts.skip_checks) {
                        Ok(status) if status.success() => {
                            info!("Built {} [{}]", name, variant);
                            built += 1;
                        }
                        Ok(status) => {
                            let detail = match status.code() {
                                Some(code) => format!("builder exited with status {}", code),
                                None => "builder terminated by signal".to_string(),
                            };
                            println!("FAILED {} [{}]: {}", name, variant, detail);
                            failures.push(Failure {
                                recipe: name.clone(),
                                variant,
                                detail,
                            });
                        }
                        Err(err) => {
                            println!("FAILED {} [{}]: {}", name, variant, err);
                            failures.push(Failure {
                                recipe: name.clone(),
                                variant,
                                detail: err.to_string(),
                            });
                        }
                    }
                }
                // A failed output query is recorded like a failed build;
                // depot failures abort the run.
                Err(err @ Error::BuilderError(_)) => {
                    println!("FAILED {} [{}]: {}", name, variant, err);
                    failures.push(Failure {
                        recipe: name.clone(),
                        variant,
                        detail: err.to_string(),
                    });
                }
                Err(err) => return Err(err).context("depot lookup failed"),
            }
        }
    }

    println!();
    println!(
        "{} built, {} skipped, {} failed",
        built,
        skipped,
        failures.len()
    );

    if !failures.is_empty() {
        for failure in &failures {
            println!(
                "  {} [{}]: {}",
                failure.recipe, failure.variant, failure.detail
            );
        }
        bail!("{} build(s) failed", failures.len());
    }

    Ok(())
}

/// Expand recipe arguments through the filesystem
///
/// Each argument is tried as a glob pattern; a pattern that matches nothing
/// (or does not parse as a pattern) falls back to the literal path, which
/// the recipe loader may then skip.
fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        match glob::glob(pattern) {
            Ok(entries) => {
                let matched: Vec<PathBuf> = entries.filter_map(|e| e.ok()).collect();
                if matched.is_empty() {
                    paths.push(PathBuf::from(pattern));
                } else {
                    paths.extend(matched);
                }
            }
            Err(_) => paths.push(PathBuf::from(pattern)),
        }
    }
    paths
}

/// Split a comma/whitespace-separated version list
fn parse_version_list(raw: &str) -> Result<Vec<String>> {
    let values: Vec<String> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if values.is_empty() {
        bail!("empty version list: {:?}", raw);
    }
    Ok(values)
}
