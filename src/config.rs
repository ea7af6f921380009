//! Application data paths.
//!
//! Everything the agent persists lives under one platform-specific data
//! directory: the schedule document, the per-product backup staging areas,
//! and the single-instance lock.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved locations of the agent's own files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Schedule state document.
    pub schedule_path: PathBuf,
    /// Parent of per-product backup staging areas.
    pub backup_root: PathBuf,
    /// Single-instance lock file.
    pub lock_path: PathBuf,
}

impl AppPaths {
    /// Resolve against the platform's per-user data directory.
    ///
    /// # Errors
    ///
    /// Fails when the platform directories cannot be determined.
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("com", "retrial", "retrial")
            .context("failed to determine project directories")?;
        Ok(Self::rooted_at(project_dirs.data_local_dir()))
    }

    /// Paths rooted at an explicit directory; tests use a temp dir.
    #[must_use]
    pub fn rooted_at(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            schedule_path: data_dir.join("schedule.json"),
            backup_root: data_dir.join("backup"),
            lock_path: data_dir.join("agent.pid"),
        }
    }

    /// Staging area for one product's preserved-state snapshot.
    #[must_use]
    pub fn staging_dir(&self, product_key: &str) -> PathBuf {
        self.backup_root.join(product_key)
    }

    /// Create the data directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("cannot create data dir {}", self.data_dir.display()))
    }
}
