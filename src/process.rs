//! Process census and force-termination by image name.
//!
//! Both entry points take a fixed table of known image names and never fail
//! the caller: an unavailable process table reads as "nothing running", and
//! per-process kill errors are swallowed so a sweep always covers the whole
//! table.

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use sysinfo::System;

/// Grace period after a kill sweep, letting terminated processes release
/// file locks before the wipe starts.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Names of live processes whose image name matches the table.
///
/// Matching is case-insensitive and exact; the returned set holds the
/// OS-reported (original-case) names, deduplicated.
#[must_use]
pub fn list_running(table: &[&str]) -> BTreeSet<String> {
    let mut sys = System::new();
    sys.refresh_processes();

    let mut running = BTreeSet::new();
    for process in sys.processes().values() {
        let name = process.name();
        let lower = name.to_lowercase();
        if table.iter().any(|known| known.to_lowercase() == lower) {
            running.insert(name.to_string());
        }
    }
    running
}

/// Force-kill every live process matching an entry in the table.
///
/// Returns the table entries for which the OS reported at least one
/// successful kill. Entries with no matching process, and kills the OS
/// refused, are silently dropped; the sweep never stops early.
#[must_use]
pub fn terminate_all(table: &[&str]) -> BTreeSet<String> {
    let mut sys = System::new();
    sys.refresh_processes();

    let mut killed = BTreeSet::new();
    for entry in table {
        let target = entry.to_lowercase();
        for process in sys.processes().values() {
            if process.name().to_lowercase() == target && process.kill() {
                log::info!("killed {} (pid {})", process.name(), process.pid());
                killed.insert((*entry).to_string());
            }
        }
    }
    killed
}

/// Block for [`SETTLE_DELAY`].
pub fn settle() {
    thread::sleep(SETTLE_DELAY);
}
