// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files describing one buildable package: a name, a
//! version, and the requirement declarations brigade orders builds with.
//! How a package is actually compiled is the kiln's business, so nothing
//! here carries build commands.
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "scanlib"
//! version = "2.4.1"
//!
//! [build]
//! requires = ["zlib", "numpy >=1.6"]
//! makedepends = ["python", "numpy"]
//! checkdepends = ["pytest"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A recipe for one buildable package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Requirement declarations
    #[serde(default)]
    pub build: BuildSection,
}

impl Recipe {
    /// Union of the run, build, and check requirement declarations
    pub fn all_requirements(&self) -> Vec<&str> {
        let mut reqs: Vec<&str> = self.build.requires.iter().map(|s| s.as_str()).collect();
        reqs.extend(self.build.makedepends.iter().map(|s| s.as_str()));
        reqs.extend(self.build.checkdepends.iter().map(|s| s.as_str()));
        reqs
    }

    /// Bare names of the build-time requirements
    ///
    /// This is the set the build matrix consults: a recipe builds against
    /// `python` when `python` appears among its makedepends, whatever
    /// version qualifier the entry carries.
    pub fn build_requirement_names(&self) -> HashSet<&str> {
        self.build
            .makedepends
            .iter()
            .map(|s| requirement_name(s))
            .collect()
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Release number (for rebuilds of the same version)
    #[serde(default = "default_release")]
    pub release: String,

    /// Short description
    #[serde(default)]
    pub summary: Option<String>,
}

fn default_release() -> String {
    "1".to_string()
}

/// Requirement declarations
///
/// Each entry is a package name optionally followed by a version qualifier,
/// e.g. `"zlib"` or `"numpy >=1.6"`. Qualifiers are the kiln's concern;
/// brigade only ever looks at the bare name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Run-time dependencies, installed with the package
    #[serde(default)]
    pub requires: Vec<String>,

    /// Build-time only dependencies
    #[serde(default)]
    pub makedepends: Vec<String>,

    /// Dependencies needed only for the post-build check phase
    #[serde(default)]
    pub checkdepends: Vec<String>,
}

/// Reduce a requirement token to its bare package name.
///
/// The name is the first whitespace-delimited token; `"numpy >=1.6"`
/// becomes `"numpy"` and an unqualified token is returned unchanged.
pub fn requirement_name(token: &str) -> &str {
    token.split_whitespace().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RECIPE: &str = r#"
[package]
name = "scanlib"
version = "2.4.1"
summary = "Fast scan-matching library"

[build]
requires = ["zlib", "numpy >=1.6"]
makedepends = ["python", "numpy", "cmake"]
checkdepends = ["pytest"]
"#;

    #[test]
    fn test_parse_recipe() {
        let recipe: Recipe = toml::from_str(SAMPLE_RECIPE).unwrap();

        assert_eq!(recipe.package.name, "scanlib");
        assert_eq!(recipe.package.version, "2.4.1");
        assert_eq!(recipe.package.release, "1"); // default
        assert_eq!(recipe.package.summary.as_deref(), Some("Fast scan-matching library"));

        assert_eq!(recipe.build.requires.len(), 2);
        assert_eq!(recipe.build.makedepends.len(), 3);
        assert_eq!(recipe.build.checkdepends, vec!["pytest"]);
    }

    #[test]
    fn test_minimal_recipe() {
        let minimal = r#"
[package]
name = "hello"
version = "1.0"
"#;

        let recipe: Recipe = toml::from_str(minimal).unwrap();
        assert_eq!(recipe.package.name, "hello");
        assert!(recipe.build.requires.is_empty());
        assert!(recipe.build.makedepends.is_empty());
        assert!(recipe.build.checkdepends.is_empty());
    }

    #[test]
    fn test_all_requirements() {
        let recipe: Recipe = toml::from_str(SAMPLE_RECIPE).unwrap();
        let reqs = recipe.all_requirements();

        assert!(reqs.contains(&"zlib"));
        assert!(reqs.contains(&"numpy >=1.6"));
        assert!(reqs.contains(&"python"));
        assert!(reqs.contains(&"pytest"));
        assert_eq!(reqs.len(), 6); // 2 requires + 3 makedepends + 1 checkdepends
    }

    #[test]
    fn test_build_requirement_names_strip_qualifiers() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[build]
makedepends = ["python >=3.11", "numpy >=1.6", "cmake"]
"#;
        let recipe: Recipe = toml::from_str(content).unwrap();
        let names = recipe.build_requirement_names();

        assert!(names.contains("python"));
        assert!(names.contains("numpy"));
        assert!(names.contains("cmake"));
        assert!(!names.contains("python >=3.11"));
    }

    #[test]
    fn test_requirement_name() {
        assert_eq!(requirement_name("numpy >=1.6"), "numpy");
        assert_eq!(requirement_name("zlib"), "zlib");
        assert_eq!(requirement_name("  openssl  =3.0 "), "openssl");
        assert_eq!(requirement_name(""), "");
    }
}
