//! Common surface the scheduling layer sees for every resettable product.

use std::collections::BTreeSet;

/// Identifies a product in the schedule document and on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    JetBrains,
    Navicat,
}

impl ProductKind {
    /// Key used in the persisted schedule document.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::JetBrains => "jetbrains",
            Self::Navicat => "navicat",
        }
    }
}

/// A product whose trial state this agent can reset.
///
/// `perform_reset` is the single entry point the scheduling layer calls. It
/// is idempotent, safe on a machine with no prior install, and never
/// returns an error: every failure inside the pipeline surfaces as a line
/// in the returned summary. Callers must not invoke it concurrently for
/// the same product; the engine keeps no internal lock.
pub trait TrialProduct {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Which schedule slot this product occupies.
    fn kind(&self) -> ProductKind;

    /// Days between automatic resets.
    fn interval_days(&self) -> i64;

    /// Census of live product processes.
    fn list_running(&self) -> BTreeSet<String>;

    /// Force-kill every live product process; returns what was killed.
    fn terminate_all(&self) -> BTreeSet<String>;

    /// Terminate running processes if any, then reset trial state.
    ///
    /// Returns a human-readable multi-line summary.
    fn perform_reset(&self) -> String;
}
