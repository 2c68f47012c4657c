// src/repository/mod.rs

//! Remote depot access
//!
//! The depot is the remote package repository that already-built artifacts
//! get uploaded to (by other tooling). Brigade only queries it: an
//! authentication probe at startup, then one existence lookup per
//! (recipe, variant) that is not already satisfied locally.

mod client;
mod metadata;

pub use client::{DepotSession, DistSpec, TOKEN_ENV};
pub use metadata::{Distribution, UserInfo};
