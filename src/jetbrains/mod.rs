//! Trial reset for the IDE family with hierarchical per-variant
//! configuration directories.
//!
//! The interesting work lives in [`engine`]; this module wires the engine
//! to the real per-user roots and sequences census, termination, and the
//! engine run behind the [`TrialProduct`] surface.

pub mod engine;
pub mod scrub;
pub mod tables;

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::process;
use crate::product::{ProductKind, TrialProduct};
use crate::registry::{default_registry, RegistryStore};

use engine::{EnginePaths, ResetEngine};

/// Days between automatic resets for this family.
pub const INTERVAL_DAYS: i64 = 25;

/// Folder name both family roots share.
const FAMILY_DIR: &str = "JetBrains";

/// The IDE family product.
pub struct JetBrains {
    paths: EnginePaths,
    registry: Box<dyn RegistryStore>,
}

impl JetBrains {
    /// Product bound to the real user directories and platform registry,
    /// with the given backup staging area.
    ///
    /// # Errors
    ///
    /// Fails only when the user's home directories cannot be determined.
    pub fn new(staging_dir: PathBuf) -> Result<Self> {
        let base = BaseDirs::new().context("cannot determine user directories")?;
        let paths = EnginePaths {
            roaming_root: base.config_dir().join(FAMILY_DIR),
            local_root: base.data_local_dir().join(FAMILY_DIR),
            home_dir: base.home_dir().to_path_buf(),
            staging_dir,
        };
        Ok(Self::with_paths(paths, default_registry()))
    }

    /// Product over explicit roots and registry; the constructor tests and
    /// embedders use.
    #[must_use]
    pub fn with_paths(paths: EnginePaths, registry: Box<dyn RegistryStore>) -> Self {
        Self {
            paths,
            registry,
        }
    }
}

impl TrialProduct for JetBrains {
    fn name(&self) -> &'static str {
        "JetBrains"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::JetBrains
    }

    fn interval_days(&self) -> i64 {
        INTERVAL_DAYS
    }

    fn list_running(&self) -> BTreeSet<String> {
        process::list_running(tables::PROCESS_NAMES)
    }

    fn terminate_all(&self) -> BTreeSet<String> {
        process::terminate_all(tables::PROCESS_NAMES)
    }

    fn perform_reset(&self) -> String {
        let running = self.list_running();
        if !running.is_empty() {
            log::info!(
                "terminating {} running process(es): {}",
                running.len(),
                running.iter().cloned().collect::<Vec<_>>().join(", ")
            );
            self.terminate_all();
            process::settle();
        }

        ResetEngine::new(&self.paths, self.registry.as_ref())
            .run()
            .summary()
    }
}
