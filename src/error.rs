// src/error.rs

//! Error types shared across brigade

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the brigade library
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    IoError(String),

    /// A recipe file that could not be understood
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Startup failure (missing builder executable, bad client configuration)
    #[error("Initialization error: {0}")]
    InitError(String),

    /// The recipes under consideration cannot be ordered
    ///
    /// Carries the unresolved remainder of the dependency mapping: every
    /// node that could not be scheduled, with the dependencies still
    /// blocking it.
    #[error("Circular dependency among recipes; unresolved: {}", render_remaining(.remaining))]
    CyclicDependency {
        remaining: BTreeMap<String, BTreeSet<String>>,
    },

    /// The external builder could not be run, or an output query failed
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// The depot could not be queried
    #[error("Depot error: {0}")]
    RemoteError(String),

    /// The depot rejected our credentials
    #[error("Authentication failed: {0}")]
    AuthError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

fn render_remaining(remaining: &BTreeMap<String, BTreeSet<String>>) -> String {
    remaining
        .iter()
        .map(|(name, deps)| {
            let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            format!("{} -> [{}]", name, deps.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
