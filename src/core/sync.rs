//! Copying generated artifacts out of a container into the local workspace.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::console::IoContext;
use crate::error::{Error, Result, SyncFailedDetails};
use crate::target::{ContainerHandle, ContainerRuntime, FileCopy};

/// A follow-up sync a dependency hook can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStep {
    Manifest,
    Lockfile,
}

impl SyncStep {
    pub fn artifact(self) -> &'static Artifact {
        match self {
            SyncStep::Manifest => &PACKAGE_MANIFEST,
            SyncStep::Lockfile => &PACKAGE_LOCK,
        }
    }
}

/// A file with a fixed location on both sides of a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub title: &'static str,
    pub remote_path: &'static str,
    /// Relative to the workspace root.
    pub local_path: &'static str,
}

impl Artifact {
    pub fn local_path_in(&self, workspace: &Path) -> PathBuf {
        workspace.join(self.local_path)
    }
}

pub const PACKAGE_MANIFEST: Artifact = Artifact {
    title: "Copying Package",
    remote_path: "/app/html/package.json",
    local_path: "build/package.json",
};

pub const PACKAGE_LOCK: Artifact = Artifact {
    title: "Copying Lockfile",
    remote_path: "/app/html/package-lock.json",
    local_path: "build/package-lock.json",
};

/// Copy one file out of the container, replacing whatever is at `local_path`.
pub fn sync_back(
    runtime: &dyn ContainerRuntime,
    handle: &ContainerHandle,
    remote_path: &str,
    local_path: &Path,
    io: &IoContext,
) -> Result<()> {
    let failed = |problem: String| {
        Error::sync_failed(SyncFailedDetails {
            container: handle.name.clone(),
            remote_path: remote_path.to_string(),
            local_path: local_path.display().to_string(),
            problem,
        })
    };

    let bytes = match runtime.copy_file_from(handle, remote_path)? {
        FileCopy::Contents(bytes) => bytes,
        FileCopy::Unavailable(reason) => return Err(failed(reason)),
    };

    if let Some(parent) = local_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| failed(format!("create {}: {}", parent.display(), e)))?;
    }
    fs::write(local_path, &bytes).map_err(|e| failed(e.to_string()))?;

    log_status!(
        "sync",
        "{}:{} -> {} ({} bytes)",
        handle.name,
        remote_path,
        local_path.display(),
        bytes.len()
    );
    io.announce_line("Done!");
    Ok(())
}
