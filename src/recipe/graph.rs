// src/recipe/graph.rs

//! Recipe dependency graph for build ordering
//!
//! This module provides a directed graph for tracking dependencies between
//! recipes and determining the correct build order using topological sort.
//!
//! Only dependencies pointing at another recipe under consideration become
//! edges; everything else (system packages, libraries from the depot) is
//! assumed to be satisfiable already and does not constrain the order.

use crate::error::{Error, Result};
use crate::recipe::format::requirement_name;
use crate::recipe::parser::LoadedRecipe;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A directed graph representing recipe dependencies
#[derive(Debug, Default)]
pub struct DepGraph {
    /// Map from recipe name to the names of recipes it depends on
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DepGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a set of loaded recipes
    ///
    /// A recipe's requirement set is the union of its run, build, and check
    /// declarations, reduced to bare names. Requirements that do not match
    /// another loaded recipe's package name are dropped, as are
    /// self-references.
    pub fn from_recipes(recipes: &[LoadedRecipe]) -> Self {
        let known: HashSet<&str> = recipes
            .iter()
            .map(|r| r.recipe.package.name.as_str())
            .collect();

        let mut graph = Self::new();
        for loaded in recipes {
            let name = loaded.recipe.package.name.as_str();
            let deps: Vec<&str> = loaded
                .recipe
                .all_requirements()
                .into_iter()
                .map(requirement_name)
                .filter(|dep| *dep != name && known.contains(dep))
                .collect();
            graph.add_recipe(name, &deps);
        }
        graph
    }

    /// Add a recipe with its dependencies
    ///
    /// If the recipe already exists, the dependencies are merged.
    pub fn add_recipe(&mut self, name: &str, dependencies: &[&str]) {
        let entry = self.edges.entry(name.to_string()).or_default();
        for dep in dependencies {
            entry.insert((*dep).to_string());
        }
    }

    /// Get the number of recipes in the graph
    pub fn recipe_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if a recipe exists in the graph
    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Get the direct dependencies of a recipe
    pub fn dependencies(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(name)
    }

    /// Compute the build order (dependencies before dependents)
    pub fn topological_sort(&self) -> Result<Vec<String>> {
        topo_sort(&self.edges)
    }
}

/// Topologically sort an arbitrary dependency mapping
///
/// Kahn's algorithm, batch variant: every round drains all nodes whose
/// dependencies are satisfied, in name order, so the result is stable from
/// run to run. Self-edges never block a node, and a dependency that is not
/// itself a node is treated as already satisfied.
///
/// The caller's mapping is never mutated; the sort works on a private copy
/// of the remaining dependency sets. When no progress can be made the
/// remainder of that copy is returned inside [`Error::CyclicDependency`].
pub fn topo_sort(graph: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>> {
    let mut remaining: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (name, deps) in graph {
        let mut deps = deps.clone();
        deps.remove(name);
        remaining.insert(name.clone(), deps);
    }

    // Dependency targets that are not nodes themselves count as satisfied.
    let extra: Vec<String> = remaining
        .values()
        .flatten()
        .filter(|dep| !graph.contains_key(*dep))
        .cloned()
        .collect();
    for name in extra {
        remaining.entry(name).or_default();
    }

    let mut order = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let batch: Vec<String> = remaining
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        if batch.is_empty() {
            return Err(Error::CyclicDependency { remaining });
        }

        for name in &batch {
            remaining.remove(name);
        }
        for deps in remaining.values_mut() {
            for name in &batch {
                deps.remove(name);
            }
        }
        order.extend(batch);
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::parse_recipe;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn loaded(toml: &str) -> LoadedRecipe {
        let recipe = parse_recipe(toml).unwrap();
        LoadedRecipe {
            path: PathBuf::from(format!("/recipes/{}", recipe.package.name)),
            recipe,
        }
    }

    fn positions(order: &[String]) -> HashMap<&str, usize> {
        order
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect()
    }

    #[test]
    fn test_empty_graph() {
        let graph = DepGraph::new();
        assert_eq!(graph.recipe_count(), 0);
        let order = graph.topological_sort().unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_single_recipe() {
        let mut graph = DepGraph::new();
        graph.add_recipe("hello", &[]);

        assert_eq!(graph.recipe_count(), 1);
        assert!(graph.contains("hello"));

        let order = graph.topological_sort().unwrap();
        assert_eq!(order, vec!["hello"]);
    }

    #[test]
    fn test_linear_dependencies() {
        let mut graph = DepGraph::new();
        graph.add_recipe("c", &["b"]);
        graph.add_recipe("b", &["a"]);
        graph.add_recipe("a", &[]);

        let order = graph.topological_sort().unwrap();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_diamond_dependencies() {
        let mut graph = DepGraph::new();
        graph.add_recipe("d", &["b", "c"]);
        graph.add_recipe("b", &["a"]);
        graph.add_recipe("c", &["a"]);
        graph.add_recipe("a", &[]);

        let order = graph.topological_sort().unwrap();
        let pos = positions(&order);

        assert_eq!(order.len(), 4);
        assert!(pos["a"] < pos["b"]);
        assert!(pos["a"] < pos["c"]);
        assert!(pos["b"] < pos["d"]);
        assert!(pos["c"] < pos["d"]);
    }

    #[test]
    fn test_order_is_valid_permutation() {
        let mut graph = DepGraph::new();
        graph.add_recipe("gcc", &["glibc", "binutils"]);
        graph.add_recipe("glibc", &["linux-headers"]);
        graph.add_recipe("binutils", &["glibc"]);
        graph.add_recipe("linux-headers", &[]);

        let order = graph.topological_sort().unwrap();
        assert_eq!(order.len(), graph.recipe_count());

        // Every dependency precedes its dependents.
        let pos = positions(&order);
        for name in &order {
            for dep in graph.dependencies(name).unwrap() {
                assert!(pos[dep.as_str()] < pos[name.as_str()], "{} before {}", dep, name);
            }
        }
    }

    #[test]
    fn test_two_node_cycle() {
        let mut graph = DepGraph::new();
        graph.add_recipe("a", &["b"]);
        graph.add_recipe("b", &["a"]);

        match graph.topological_sort() {
            Err(Error::CyclicDependency { remaining }) => {
                assert!(remaining.contains_key("a"));
                assert!(remaining.contains_key("b"));
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_reports_remainder_only() {
        // One free node plus a three-way cycle: the free node schedules,
        // the cycle is reported in full.
        let mut graph = DepGraph::new();
        graph.add_recipe("free", &[]);
        graph.add_recipe("a", &["b", "free"]);
        graph.add_recipe("b", &["c"]);
        graph.add_recipe("c", &["a"]);

        match graph.topological_sort() {
            Err(Error::CyclicDependency { remaining }) => {
                assert_eq!(remaining.len(), 3);
                assert!(!remaining.contains_key("free"));
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_ignored() {
        let mut graph = DepGraph::new();
        graph.add_recipe("loner", &["loner"]);

        let order = graph.topological_sort().unwrap();
        assert_eq!(order, vec!["loner"]);
    }

    #[test]
    fn test_unknown_dependency_counts_as_satisfied() {
        let mut map = BTreeMap::new();
        map.insert("app".to_string(), BTreeSet::from(["mystery".to_string()]));

        let order = topo_sort(&map).unwrap();
        assert_eq!(order, vec!["mystery", "app"]);
    }

    #[test]
    fn test_deterministic_tie_break() {
        let mut graph = DepGraph::new();
        graph.add_recipe("zsh", &[]);
        graph.add_recipe("bash", &[]);
        graph.add_recipe("fish", &[]);

        let order = graph.topological_sort().unwrap();
        assert_eq!(order, vec!["bash", "fish", "zsh"]);
    }

    #[test]
    fn test_input_graph_not_mutated() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), BTreeSet::from(["a".to_string()]));
        map.insert("a".to_string(), BTreeSet::new());

        let before = map.clone();
        topo_sort(&map).unwrap();
        assert_eq!(map, before);
    }

    #[test]
    fn test_from_recipes_filters_externals() {
        let recipes = vec![
            loaded(
                r#"
[package]
name = "libpng"
version = "1.6"

[build]
requires = ["zlib >=1.2"]
makedepends = ["cmake"]
"#,
            ),
            loaded(
                r#"
[package]
name = "zlib"
version = "1.3"
"#,
            ),
        ];

        let graph = DepGraph::from_recipes(&recipes);
        assert_eq!(graph.recipe_count(), 2);

        // The zlib qualifier is stripped; cmake is not a loaded recipe and
        // never becomes an edge.
        let deps = graph.dependencies("libpng").unwrap();
        assert_eq!(deps, &BTreeSet::from(["zlib".to_string()]));

        let order = graph.topological_sort().unwrap();
        assert_eq!(order, vec!["zlib", "libpng"]);
    }

    #[test]
    fn test_from_recipes_unions_all_three_sets() {
        let recipes = vec![
            loaded(
                r#"
[package]
name = "app"
version = "1.0"

[build]
requires = ["runlib"]
makedepends = ["buildlib"]
checkdepends = ["testlib"]
"#,
            ),
            loaded("[package]\nname = \"runlib\"\nversion = \"1\"\n"),
            loaded("[package]\nname = \"buildlib\"\nversion = \"1\"\n"),
            loaded("[package]\nname = \"testlib\"\nversion = \"1\"\n"),
        ];

        let graph = DepGraph::from_recipes(&recipes);
        let deps = graph.dependencies("app").unwrap();
        assert_eq!(deps.len(), 3);
        assert!(deps.contains("runlib"));
        assert!(deps.contains("buildlib"));
        assert!(deps.contains("testlib"));
    }

    #[test]
    fn test_from_recipes_drops_self_reference() {
        let recipes = vec![loaded(
            r#"
[package]
name = "ouroboros"
version = "1.0"

[build]
requires = ["ouroboros"]
"#,
        )];

        let graph = DepGraph::from_recipes(&recipes);
        assert!(graph.dependencies("ouroboros").unwrap().is_empty());
    }
}
