//! Selective backup/wipe/restore engine for the IDE family tree.
//!
//! One run is a linear pass: snapshot preserved user state per variant into
//! a staging area, destroy the whole family configuration tree (roaming,
//! recognized local-cache variants, legacy dot-folders, identity registry
//! subtree), then rebuild a fresh tree populated only from the snapshot and
//! scrub trial markers from the restored preference files.
//!
//! Destroy-then-restore from a narrow allow-list is deliberate: trial state
//! hides in product-version-specific file names nobody can block-list
//! reliably, while the set of things a user would actually miss is small
//! and stable. Every step is best-effort; a locked file fails its own step
//! and the pass still runs to the end, since a partial reset beats leaving
//! the trial expired. There is no atomicity across steps.
//!
//! All roots are injected so the engine can run against scratch trees; the
//! staging area is owned exclusively by the engine for the duration of one
//! run and doubles as the auditable last-backup artifact between runs.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::fsutil;
use crate::jetbrains::scrub;
use crate::jetbrains::tables::{
    is_recognized_variant, IDENTITY_SUBTREE, LEGACY_SHORT_NAMES, PRESERVE_ITEMS,
};
use crate::registry::RegistryStore;
use crate::report::{ResetReport, StepStatus};

/// Step names, in execution order.
pub const STEP_BACKUP: &str = "backup";
pub const STEP_WIPE_ROAMING: &str = "wipe-roaming";
pub const STEP_WIPE_LOCAL: &str = "wipe-local";
pub const STEP_WIPE_LEGACY: &str = "wipe-legacy";
pub const STEP_WIPE_REGISTRY: &str = "wipe-registry";
pub const STEP_RESTORE: &str = "restore";
pub const STEP_SCRUB: &str = "scrub";

/// Filesystem roots one engine run operates on.
#[derive(Debug, Clone)]
pub struct EnginePaths {
    /// Per-user roaming family root (`%APPDATA%\JetBrains`).
    pub roaming_root: PathBuf,
    /// Machine-local cache root (`%LOCALAPPDATA%\JetBrains`).
    pub local_root: PathBuf,
    /// User home directory, searched for legacy dot-folders.
    pub home_dir: PathBuf,
    /// Staging area for the preserved-state snapshot.
    pub staging_dir: PathBuf,
}

/// One-shot reset engine over a set of injected roots.
pub struct ResetEngine<'a> {
    paths: &'a EnginePaths,
    registry: &'a dyn RegistryStore,
}

impl<'a> ResetEngine<'a> {
    pub fn new(paths: &'a EnginePaths, registry: &'a dyn RegistryStore) -> Self {
        Self {
            paths,
            registry,
        }
    }

    /// Run the full pipeline and report every step's outcome.
    ///
    /// Never fails: step errors become report entries and the next step
    /// runs regardless.
    pub fn run(&self) -> ResetReport {
        let mut report = ResetReport::new();

        self.back_up(&mut report);
        self.wipe_roaming(&mut report);
        self.wipe_local_variants(&mut report);
        self.wipe_legacy(&mut report);
        self.wipe_registry(&mut report);
        let restored = self.restore(&mut report);
        self.scrub_restored(&restored, &mut report);

        report
    }

    /// Snapshot preserve-listed items of every recognized variant into the
    /// staging area.
    ///
    /// The staging area is cleared and recreated only when the roaming root
    /// exists; a reset with nothing to reset leaves the previous backup in
    /// place untouched.
    fn back_up(&self, report: &mut ResetReport) {
        if !self.paths.roaming_root.is_dir() {
            report.skipped(STEP_BACKUP);
            return;
        }

        if let Err(e) = self.reset_staging() {
            report.record(
                STEP_BACKUP,
                StepStatus::Failed,
                vec![format!("error: backup: {e}")],
            );
            return;
        }

        let entries = match fs::read_dir(&self.paths.roaming_root) {
            Ok(entries) => entries,
            Err(e) => {
                report.record(
                    STEP_BACKUP,
                    StepStatus::Failed,
                    vec![format!("error: backup: {e}")],
                );
                return;
            }
        };

        let mut snapshots = 0usize;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !entry.path().is_dir() || !is_recognized_variant(&name) {
                continue;
            }

            let variant_staging = self.paths.staging_dir.join(&name);
            if let Err(e) = fs::create_dir_all(&variant_staging) {
                log::warn!("cannot stage {name}: {e}");
                continue;
            }

            for item in PRESERVE_ITEMS {
                let src = entry.path().join(item);
                if !src.exists() {
                    continue;
                }
                if let Err(e) = fsutil::copy_item(&src, &variant_staging.join(item)) {
                    log::warn!("backup of {name}/{item} failed: {e}");
                }
            }
            snapshots += 1;
        }

        log::info!("backed up {snapshots} variant(s)");
        report.record(STEP_BACKUP, StepStatus::Completed, Vec::new());
    }

    fn reset_staging(&self) -> io::Result<()> {
        if self.paths.staging_dir.exists() {
            fs::remove_dir_all(&self.paths.staging_dir)?;
        }
        fs::create_dir_all(&self.paths.staging_dir)
    }

    /// Delete the whole roaming family root in one operation.
    fn wipe_roaming(&self, report: &mut ResetReport) {
        if !self.paths.roaming_root.exists() {
            report.skipped(STEP_WIPE_ROAMING);
            return;
        }

        match fs::remove_dir_all(&self.paths.roaming_root) {
            Ok(()) => report.record(
                STEP_WIPE_ROAMING,
                StepStatus::Completed,
                vec!["AppData/JetBrains".to_string()],
            ),
            Err(e) => report.record(
                STEP_WIPE_ROAMING,
                StepStatus::Failed,
                vec![format!("error: {e}")],
            ),
        }
    }

    /// Delete recognized variant caches under the local root, leaving
    /// non-variant siblings alone. Deletions are independent.
    fn wipe_local_variants(&self, report: &mut ResetReport) {
        let Ok(entries) = fs::read_dir(&self.paths.local_root) else {
            report.skipped(STEP_WIPE_LOCAL);
            return;
        };

        let mut lines = Vec::new();
        let mut failed = false;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !entry.path().is_dir() || !is_recognized_variant(&name) {
                continue;
            }
            match fs::remove_dir_all(entry.path()) {
                Ok(()) => lines.push(format!("Local/{name}")),
                Err(e) => {
                    failed = true;
                    lines.push(format!("error: Local/{name}: {e}"));
                }
            }
        }

        let status = if failed {
            StepStatus::Failed
        } else if lines.is_empty() {
            StepStatus::Skipped
        } else {
            StepStatus::Completed
        };
        report.record(STEP_WIPE_LOCAL, status, lines);
    }

    /// Clear trial state out of legacy home-directory dot-folders.
    ///
    /// Only `config/eval` and `config/options/other.xml` inside a matched
    /// folder are ever touched; the rest of a legacy install is preserved
    /// by construction.
    fn wipe_legacy(&self, report: &mut ResetReport) {
        let Ok(entries) = fs::read_dir(&self.paths.home_dir) else {
            report.skipped(STEP_WIPE_LEGACY);
            return;
        };

        let mut lines = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = name.strip_prefix('.') else {
                continue;
            };
            if !entry.path().is_dir()
                || !LEGACY_SHORT_NAMES.iter().any(|short| stem.starts_with(short))
            {
                continue;
            }

            let eval_dir = entry.path().join("config").join("eval");
            if eval_dir.exists() {
                match fs::remove_dir_all(&eval_dir) {
                    Ok(()) => lines.push(format!("{name}/eval")),
                    Err(e) => log::debug!("legacy eval wipe failed for {name}: {e}"),
                }
            }

            let other_xml = entry.path().join("config").join("options").join("other.xml");
            if other_xml.exists() {
                match fs::remove_file(&other_xml) {
                    Ok(()) => lines.push(format!("{name}/other.xml")),
                    Err(e) => log::debug!("legacy other.xml wipe failed for {name}: {e}"),
                }
            }
        }

        let status = if lines.is_empty() {
            StepStatus::Skipped
        } else {
            StepStatus::Completed
        };
        report.record(STEP_WIPE_LEGACY, status, lines);
    }

    /// Delete the identity registry subtree wholesale. Absence is not an
    /// error and leaves no trace in the summary.
    fn wipe_registry(&self, report: &mut ResetReport) {
        match self.registry.delete_subtree(IDENTITY_SUBTREE) {
            Ok(true) => report.record(
                STEP_WIPE_REGISTRY,
                StepStatus::Completed,
                vec!["registry: JavaSoft".to_string()],
            ),
            Ok(false) => report.skipped(STEP_WIPE_REGISTRY),
            Err(e) => report.record(
                STEP_WIPE_REGISTRY,
                StepStatus::Failed,
                vec![format!("error: registry: {e}")],
            ),
        }
    }

    /// Rebuild the roaming root from the staging area.
    ///
    /// Returns the restored variant folders for the scrub step.
    fn restore(&self, report: &mut ResetReport) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.paths.staging_dir) {
            Ok(entries) => entries,
            // No staging area means no backup was ever taken.
            Err(_) => {
                report.skipped(STEP_RESTORE);
                return Vec::new();
            }
        };

        if let Err(e) = fs::create_dir_all(&self.paths.roaming_root) {
            report.record(
                STEP_RESTORE,
                StepStatus::Failed,
                vec![format!("error: restore: {e}")],
            );
            return Vec::new();
        }

        let mut restored_dirs = Vec::new();
        let mut copied = 0usize;
        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let variant_dir = self.paths.roaming_root.join(entry.file_name());
            if let Err(e) = fs::create_dir_all(&variant_dir) {
                log::warn!("cannot recreate {}: {e}", variant_dir.display());
                continue;
            }

            let Ok(items) = fs::read_dir(entry.path()) else {
                continue;
            };
            for item in items.flatten() {
                match fsutil::copy_item(&item.path(), &variant_dir.join(item.file_name())) {
                    Ok(()) => copied += 1,
                    Err(e) => log::warn!(
                        "restore of {} failed: {e}",
                        item.path().display()
                    ),
                }
            }
            restored_dirs.push(variant_dir);
        }

        let lines = if copied > 0 {
            vec![format!("restored: {copied} item(s)")]
        } else {
            Vec::new()
        };
        report.record(STEP_RESTORE, StepStatus::Completed, lines);
        restored_dirs
    }

    /// Strip trial markers from each restored variant's preferences.
    fn scrub_restored(&self, restored: &[PathBuf], report: &mut ResetReport) {
        if restored.is_empty() {
            report.skipped(STEP_SCRUB);
            return;
        }
        for variant_dir in restored {
            scrub::scrub_options_dir(&variant_dir.join("options"));
        }
        report.record(STEP_SCRUB, StepStatus::Completed, Vec::new());
    }
}
