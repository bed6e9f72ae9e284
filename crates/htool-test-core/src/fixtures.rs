//! Fixture repository acquisition.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors that can occur while acquiring the fixture repository.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("failed to clone tests repository {remote} (branch {branch}): {stderr}")]
    CloneFailed {
        remote: String,
        branch: String,
        stderr: String,
    },
}

/// Make the fixture checkout available under `root/dir_name`.
///
/// An existing directory is reused as-is. Otherwise the remote is cloned with
/// `git clone <remote> -b <branch> <dir_name>` from `root`.
///
/// # Errors
/// Returns an error if git cannot be spawned or the clone does not succeed.
pub async fn acquire_fixtures(
    root: &Path,
    dir_name: &str,
    remote: &str,
    branch: &str,
) -> Result<PathBuf, AcquisitionError> {
    let path = root.join(dir_name);
    if path.exists() {
        info!(path = %path.display(), "reusing existing fixture checkout");
        return Ok(path);
    }

    debug!(remote, branch, dir_name, "cloning fixture repository");
    let output = Command::new("git")
        .arg("clone")
        .arg(remote)
        .arg("-b")
        .arg(branch)
        .arg(dir_name)
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(AcquisitionError::CloneFailed {
            remote: remote.to_string(),
            branch: branch.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    info!(path = %path.display(), "cloned tests repository");
    Ok(path)
}
