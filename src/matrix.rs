// src/matrix.rs

//! Build matrix expansion
//!
//! Most recipes are cooked exactly once. A recipe that builds against an
//! interpreter or a numerics library must be cooked once per supported
//! version; it opts into a parameter's axis simply by naming that
//! parameter's package among its build-time requirements. Everything else
//! gets the parameter's default value, which is the first candidate.

use crate::recipe::format::Recipe;
use std::fmt;

/// One expandable build parameter
#[derive(Debug, Clone)]
pub struct BuildParam {
    /// Package whose presence among a recipe's build-time requirements
    /// opts the recipe into this axis
    pub package: String,

    /// Candidate versions; the first entry is the canonical default
    pub values: Vec<String>,
}

impl BuildParam {
    pub fn new(package: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            package: package.into(),
            values,
        }
    }

    /// Versions this parameter contributes for one recipe
    ///
    /// The full candidate list, in order, when the recipe builds against
    /// the parameter's package; otherwise just the default. The returned
    /// slice borrows from the parameter, so iterating it twice yields the
    /// same sequence.
    pub fn expand(&self, recipe: &Recipe) -> &[String] {
        if recipe
            .build_requirement_names()
            .contains(self.package.as_str())
        {
            &self.values
        } else {
            &self.values[..self.values.len().min(1)]
        }
    }
}

/// One concrete combination of build-parameter values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    /// `(package, version)` pairs in matrix order
    pub values: Vec<(String, String)>,
}

impl Variant {
    /// Version chosen for `package`, if this variant carries one
    pub fn get(&self, package: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(p, _)| p == package)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.values.is_empty() {
            return f.write_str("default");
        }
        for (i, (package, version)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", package, version)?;
        }
        Ok(())
    }
}

/// The full build matrix: every expandable parameter, in a fixed order
#[derive(Debug, Clone, Default)]
pub struct BuildMatrix {
    params: Vec<BuildParam>,
}

impl BuildMatrix {
    pub fn new(params: Vec<BuildParam>) -> Self {
        Self { params }
    }

    /// Variants one recipe must be cooked under
    ///
    /// The cross product of every parameter's per-recipe expansion, with
    /// the first parameter varying slowest.
    pub fn variants_for(&self, recipe: &Recipe) -> Vec<Variant> {
        let mut variants = vec![Variant { values: Vec::new() }];

        for param in &self.params {
            let expanded = param.expand(recipe);
            let mut next = Vec::with_capacity(variants.len() * expanded.len());
            for variant in &variants {
                for value in expanded {
                    let mut v = variant.clone();
                    v.values.push((param.package.clone(), value.clone()));
                    next.push(v);
                }
            }
            variants = next;
        }

        variants
    }
}
