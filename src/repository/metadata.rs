// src/repository/metadata.rs

//! Depot API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A distribution file as reported by the depot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Full distribution name, e.g.
    /// `linux-x86_64/scanlib-2.4.1-1.pkg.tar.zst`
    pub full_name: String,

    /// When the file was uploaded
    pub upload_time: DateTime<Utc>,

    /// SHA-256 of the file content
    pub sha256: String,
}

/// Authenticated user info, returned by the whoami endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// Login name the token authenticates as
    pub login: String,
}
