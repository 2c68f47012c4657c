// src/repository/client.rs

//! HTTP client for depot lookups
//!
//! A thin wrapper around reqwest's blocking client. Brigade only ever asks
//! the depot two questions: who does this token authenticate as, and does
//! a given distribution exist. Uploads are somebody else's job.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::metadata::{Distribution, UserInfo};

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the depot API token
pub const TOKEN_ENV: &str = "BRIGADE_TOKEN";

/// Coordinates of one distribution in the depot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistSpec {
    pub name: String,
    pub version: String,
    pub platform: String,
    pub filename: String,
}

impl DistSpec {
    /// Derive lookup coordinates from a recipe and its expected artifact
    ///
    /// The kiln lays artifacts out as `<...>/<platform>/<filename>`, so the
    /// platform is the artifact's parent directory name; name and version
    /// come from the recipe itself.
    pub fn from_artifact(recipe: &Recipe, artifact: &Path) -> Self {
        let platform = artifact
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "noarch".to_string());
        let filename = artifact
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name: recipe.package.name.clone(),
            version: recipe.package.version.clone(),
            platform,
            filename,
        }
    }
}

/// An authenticated session against a package depot
pub struct DepotSession {
    client: Client,
    base_url: String,
    namespace: String,
    token: String,
}

impl DepotSession {
    /// Authenticate against the depot
    ///
    /// The token comes from `BRIGADE_TOKEN`. A missing or rejected token is
    /// fatal: the caller asked for depot lookups, and without credentials
    /// every existence answer would be wrong.
    pub fn authenticate(base_url: &str, namespace: &str) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV).map_err(|_| {
            Error::AuthError(format!(
                "{} is not set; it is required for --namespace lookups",
                TOKEN_ENV
            ))
        })?;

        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        let session = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            namespace: namespace.to_string(),
            token,
        };

        let user = session.whoami()?;
        info!("Authenticated to {} as {}", session.base_url, user.login);
        Ok(session)
    }

    /// Namespace this session checks distributions under
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn whoami(&self) -> Result<UserInfo> {
        let url = format!("{}/api/v1/user", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| Error::RemoteError(format!("Failed to reach depot: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::AuthError(format!(
                "Depot rejected the token ({status})"
            )));
        }
        if !status.is_success() {
            return Err(Error::RemoteError(format!(
                "Depot returned {status} for {url}"
            )));
        }

        response
            .json()
            .map_err(|e| Error::RemoteError(format!("Malformed user response: {e}")))
    }

    /// Look up one distribution
    ///
    /// `Ok(None)` is the depot's definitive "no such file"; any other
    /// failure propagates so callers never mistake an outage for absence.
    pub fn find_dist(&self, spec: &DistSpec) -> Result<Option<Distribution>> {
        let url = dist_url(&self.base_url, &self.namespace, spec);
        debug!("Depot lookup: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| Error::RemoteError(format!("Failed to reach depot: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::RemoteError(format!(
                "Depot returned {status} for {url}"
            )));
        }

        let dist = response
            .json()
            .map_err(|e| Error::RemoteError(format!("Malformed distribution response: {e}")))?;
        Ok(Some(dist))
    }
}

fn dist_url(base_url: &str, namespace: &str, spec: &DistSpec) -> String {
    format!(
        "{}/api/v1/dist/{}/{}/{}/{}/{}",
        base_url, namespace, spec.name, spec.version, spec.platform, spec.filename
    )
}
