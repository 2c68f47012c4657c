// src/builder.rs

//! Invocation of the external kiln builder
//!
//! Brigade never compiles anything itself. It drives the kiln through two
//! entry points: `kiln output` reports the artifact path a build would
//! produce without building anything, and `kiln build` performs the build.
//! Both are blocking calls; build output streams straight through to the
//! user.

use crate::error::{Error, Result};
use crate::matrix::Variant;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

/// Handle to the external builder executable
#[derive(Debug, Clone)]
pub struct Builder {
    program: PathBuf,
}

impl Builder {
    /// Resolve the builder executable on PATH
    pub fn locate(name: &str) -> Result<Self> {
        let program = which::which(name)
            .map_err(|e| Error::InitError(format!("Builder '{}' not found: {}", name, e)))?;
        debug!("Using builder at {}", program.display());
        Ok(Self { program })
    }

    /// Use an explicit executable path, bypassing PATH lookup
    pub fn from_path(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Ask the kiln where a build of `recipe_dir` under `variant` would
    /// land, without building anything
    pub fn output_path(&self, recipe_dir: &Path, variant: &Variant) -> Result<PathBuf> {
        let output = Command::new(&self.program)
            .arg("output")
            .arg(recipe_dir)
            .args(variant_args(variant))
            .output()
            .map_err(|e| {
                Error::BuilderError(format!("Failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::BuilderError(format!(
                "Output query failed for {}: {}",
                recipe_dir.display(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = stdout.trim();
        if path.is_empty() {
            return Err(Error::BuilderError(format!(
                "Output query for {} printed nothing",
                recipe_dir.display()
            )));
        }
        Ok(PathBuf::from(path))
    }

    /// Run a real build
    ///
    /// The kiln's exit status is surfaced as-is; deciding what a nonzero
    /// status means for the rest of the run is the caller's business.
    pub fn build(
        &self,
        recipe_dir: &Path,
        variant: &Variant,
        skip_checks: bool,
    ) -> Result<ExitStatus> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("build").arg(recipe_dir).args(variant_args(variant));
        if skip_checks {
            cmd.arg("--skip-checks");
        }

        info!("Building {} [{}]", recipe_dir.display(), variant);
        cmd.status().map_err(|e| {
            Error::BuilderError(format!("Failed to run {}: {}", self.program.display(), e))
        })
    }
}

/// Arguments that communicate a variant to the kiln
fn variant_args(variant: &Variant) -> Vec<String> {
    let mut args = Vec::with_capacity(variant.values.len() * 2);
    for (package, version) in &variant.values {
        args.push("--with".to_string());
        args.push(format!("{}={}", package, version));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("kiln");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn variant(pairs: &[(&str, &str)]) -> Variant {
        Variant {
            values: pairs
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_output_path_returns_trimmed_stdout() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(
            tmp.path(),
            "echo /var/artifacts/linux-x86_64/foo-1.0-1.pkg.tar.zst",
        );
        let builder = Builder::from_path(script);

        let path = builder
            .output_path(Path::new("/recipes/foo"), &variant(&[("python", "3.12")]))
            .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/var/artifacts/linux-x86_64/foo-1.0-1.pkg.tar.zst")
        );
    }

    #[test]
    fn test_output_path_failure_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(tmp.path(), "echo no such recipe >&2\nexit 2");
        let builder = Builder::from_path(script);

        let err = builder
            .output_path(Path::new("/recipes/foo"), &variant(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("no such recipe"));
    }

    #[test]
    fn test_output_path_empty_stdout_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(tmp.path(), "exit 0");
        let builder = Builder::from_path(script);

        assert!(builder
            .output_path(Path::new("/recipes/foo"), &variant(&[]))
            .is_err());
    }

    #[test]
    fn test_build_surfaces_exit_status() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(tmp.path(), "exit 3");
        let builder = Builder::from_path(script);

        let status = builder
            .build(Path::new("/recipes/foo"), &variant(&[]), false)
            .unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn test_build_forwards_variant_and_flags() {
        let tmp = TempDir::new().unwrap();
        let args_file = tmp.path().join("args");
        let script = write_script(
            tmp.path(),
            &format!("printf '%s\\n' \"$@\" > {}", args_file.display()),
        );
        let builder = Builder::from_path(script);

        let status = builder
            .build(
                Path::new("/recipes/foo"),
                &variant(&[("python", "3.12"), ("numpy", "2.2")]),
                true,
            )
            .unwrap();
        assert!(status.success());

        let recorded = fs::read_to_string(&args_file).unwrap();
        let lines: Vec<&str> = recorded.lines().collect();
        assert_eq!(
            lines,
            vec![
                "build",
                "/recipes/foo",
                "--with",
                "python=3.12",
                "--with",
                "numpy=2.2",
                "--skip-checks",
            ]
        );
    }

    #[test]
    fn test_locate_missing_builder() {
        assert!(Builder::locate("definitely-not-a-real-builder-xyz").is_err());
    }
}
