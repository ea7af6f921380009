//! Trial reset for the sibling database tool.
//!
//! Unlike the IDE family this product keeps all of its trial bookkeeping in
//! the user registry, so the reset is a flat, idempotent key deletion with
//! no backup or restore: the update-check cache, every `Registration*`
//! subkey, and the disguised CLSID entries the trial clock hides behind.

use std::collections::BTreeSet;

use crate::process;
use crate::product::{ProductKind, TrialProduct};
use crate::registry::{default_registry, RegistryStore};
use crate::report::NOTHING_TO_DO;

/// Days between automatic resets.
pub const INTERVAL_DAYS: i64 = 10;

/// Image names of killable product processes.
pub const PROCESS_NAMES: &[&str] = &[
    "navicat.exe",
    "navicat_premium.exe",
    "navicat premium.exe",
];

const BASE_KEY: &str = r"Software\PremiumSoft\NavicatPremium";
const CLSID_BASE: &str = r"Software\Classes\CLSID";

/// The sibling product.
pub struct Navicat {
    registry: Box<dyn RegistryStore>,
}

impl Navicat {
    /// Product bound to the platform registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }

    /// Product over an explicit registry store.
    #[must_use]
    pub fn with_registry(registry: Box<dyn RegistryStore>) -> Self {
        Self {
            registry,
        }
    }
}

impl Default for Navicat {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialProduct for Navicat {
    fn name(&self) -> &'static str {
        "Navicat"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::Navicat
    }

    fn interval_days(&self) -> i64 {
        INTERVAL_DAYS
    }

    fn list_running(&self) -> BTreeSet<String> {
        process::list_running(PROCESS_NAMES)
    }

    fn terminate_all(&self) -> BTreeSet<String> {
        process::terminate_all(PROCESS_NAMES)
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

        reset_registry(self.registry.as_ref())
    }
}

/// Delete every registry key the trial clock lives in.
///
/// Best-effort and idempotent: keys that are absent or refuse deletion are
/// passed over, and the summary names only what was actually removed.
pub fn reset_registry(registry: &dyn RegistryStore) -> String {
    let mut deleted: Vec<String> = Vec::new();

    match registry.delete_subtree(&format!(r"{BASE_KEY}\Update")) {
        Ok(true) => deleted.push("Update".to_string()),
        Ok(false) => {}
        Err(e) => log::warn!("could not delete update key: {e}"),
    }

    for subkey in registry.subkeys(BASE_KEY) {
        if !subkey.starts_with("Registration") {
            continue;
        }
        match registry.delete_subtree(&format!(r"{BASE_KEY}\{subkey}")) {
            Ok(true) => deleted.push(subkey),
            Ok(false) => {}
            Err(e) => log::warn!("could not delete {subkey}: {e}"),
        }
    }

    // The trial clock also hides behind CLSID entries that carry an Info or
    // ShellFolder child; genuine COM registrations under HKCU do not.
    let mut clsid_deleted = 0usize;
    for clsid in registry.subkeys(CLSID_BASE) {
        let path = format!(r"{CLSID_BASE}\{clsid}");
        let flagged = registry
            .subkeys(&path)
            .iter()
            .any(|child| child == "Info" || child == "ShellFolder");
        if !flagged {
            continue;
        }
        match registry.delete_subtree(&path) {
            Ok(true) => clsid_deleted += 1,
            Ok(false) => {}
            Err(e) => log::warn!("could not delete CLSID entry {clsid}: {e}"),
        }
    }
    if clsid_deleted > 0 {
        deleted.push(format!("CLSID ({clsid_deleted} key(s))"));
    }

    if deleted.is_empty() {
        NOTHING_TO_DO.to_string()
    } else {
        format!("deleted: {}", deleted.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;

    #[test]
    fn empty_registry_reports_nothing_to_do() {
        let registry = MemoryRegistry::new();
        assert_eq!(reset_registry(&registry), NOTHING_TO_DO);
    }

    #[test]
    fn deletes_update_and_registration_keys() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"Software\PremiumSoft\NavicatPremium\Update\Cache");
        registry.add_key(r"Software\PremiumSoft\NavicatPremium\Registration17XCS");
        registry.add_key(r"Software\PremiumSoft\NavicatPremium\Servers");

        let summary = reset_registry(&registry);

        assert!(summary.starts_with("deleted: "));
        assert!(summary.contains("Update"));
        assert!(summary.contains("Registration17XCS"));
        assert!(!registry.subkey_exists(r"Software\PremiumSoft\NavicatPremium\Update"));
        assert!(!registry.subkey_exists(r"Software\PremiumSoft\NavicatPremium\Registration17XCS"));
        // Unrelated sibling keys stay.
        assert!(registry.subkey_exists(r"Software\PremiumSoft\NavicatPremium\Servers"));
    }

    #[test]
    fn deletes_only_flagged_clsid_entries() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"Software\Classes\CLSID\{AAAA}\Info");
        registry.add_key(r"Software\Classes\CLSID\{BBBB}\ShellFolder");
        registry.add_key(r"Software\Classes\CLSID\{CCCC}\InprocServer32");

        let summary = reset_registry(&registry);

        assert!(summary.contains("CLSID (2 key(s))"));
        assert!(!registry.subkey_exists(r"Software\Classes\CLSID\{AAAA}"));
        assert!(!registry.subkey_exists(r"Software\Classes\CLSID\{BBBB}"));
        assert!(registry.subkey_exists(r"Software\Classes\CLSID\{CCCC}"));
    }

    #[test]
    fn second_run_is_idempotent() {
        let registry = MemoryRegistry::new();
        registry.add_key(r"Software\PremiumSoft\NavicatPremium\Update");
        registry.add_key(r"Software\Classes\CLSID\{AAAA}\Info");

        let first = reset_registry(&registry);
        let second = reset_registry(&registry);

        assert!(first.starts_with("deleted: "));
        assert_eq!(second, NOTHING_TO_DO);
    }
}
