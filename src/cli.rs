// src/cli.rs
//! CLI definitions for brigade
//!
//! This module contains the command-line interface definition using clap.
//! The actual implementation is in the `commands` module.

use clap::Parser;

#[derive(Parser)]
#[command(name = "brigade")]
#[command(author = "Brigade Project")]
#[command(version)]
#[command(about = "Cook a set of package recipes in dependency order", long_about = None)]
pub struct Cli {
    /// Recipe directories or glob patterns matching recipe directories
    #[arg(required = true, value_name = "RECIPES")]
    pub recipes: Vec<String>,

    /// Depot namespace (user or organization) to check for already-uploaded
    /// artifacts; requires a token in BRIGADE_TOKEN
    #[arg(long, value_name = "NAME")]
    pub namespace: Option<String>,

    /// Base URL of the package depot
    #[arg(long, value_name = "URL", default_value = "https://depot.brigade-build.org")]
    pub depot_url: String,

    /// Builder executable to drive, resolved on PATH
    #[arg(long, value_name = "NAME", default_value = "kiln")]
    pub builder: String,

    /// Tell the builder to skip the post-build check phase
    #[arg(long)]
    pub skip_checks: bool,

    /// Python versions to cook against (comma or space separated); the
    /// first entry is the default for recipes that do not build against
    /// python
    #[arg(long, value_name = "LIST", default_value = "3.12,3.13")]
    pub python_versions: String,

    /// Numpy versions to cook against (comma or space separated); the
    /// first entry is the default for recipes that do not build against
    /// numpy
    #[arg(long, value_name = "LIST", default_value = "1.26,2.2")]
    pub numpy_versions: String,
}
