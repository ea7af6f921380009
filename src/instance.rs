//! Single-instance guard.
//!
//! Two agents resetting the same product concurrently would race on the
//! staging area, so only one agent may run per user. The guard is a PID
//! file under the app data dir; a lock whose recorded process is no longer
//! alive is stale and silently replaced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sysinfo::{Pid, System};
use thiserror::Error;

/// Why the instance lock could not be acquired.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// Another live agent holds the lock.
    #[error("another instance is already running (pid {0})")]
    AlreadyRunning(u32),

    /// The lock file could not be read or written.
    #[error("cannot access lock file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Held for the lifetime of the agent; dropping it releases the lock.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Acquire the lock, replacing a stale one.
    ///
    /// # Errors
    ///
    /// [`InstanceError::AlreadyRunning`] when a live process holds the
    /// lock, [`InstanceError::Io`] when the lock file is inaccessible.
    pub fn acquire(path: &Path) -> Result<Self, InstanceError> {
        if let Some(pid) = read_lock_pid(path) {
            if pid != std::process::id() && process_alive(pid) {
                return Err(InstanceError::AlreadyRunning(pid));
            }
            log::debug!("replacing stale lock held by pid {pid}");
        }

        fs::write(path, std::process::id().to_string()).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::debug!("could not remove lock file: {e}");
        }
    }
}

fn read_lock_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn process_alive(pid: u32) -> bool {
    let mut sys = System::new();
    sys.refresh_process(Pid::from_u32(pid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquires_and_releases() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agent.pid");

        {
            let _lock = InstanceLock::acquire(&path).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn own_pid_in_lock_is_reacquired() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agent.pid");
        fs::write(&path, std::process::id().to_string()).unwrap();

        assert!(InstanceLock::acquire(&path).is_ok());
    }

    #[test]
    fn stale_lock_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agent.pid");
        // PIDs cannot realistically reach u32::MAX - 7.
        fs::write(&path, (u32::MAX - 7).to_string()).unwrap();

        let lock = InstanceLock::acquire(&path);
        assert!(lock.is_ok());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            std::process::id().to_string()
        );
    }

    #[test]
    fn garbage_lock_content_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agent.pid");
        fs::write(&path, "not a pid").unwrap();

        assert!(InstanceLock::acquire(&path).is_ok());
    }
}
