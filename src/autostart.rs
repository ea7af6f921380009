//! Launch-at-login toggle.
//!
//! A string value under the per-user Run key points at the agent
//! executable. The agent configures it once on first run and records that
//! in the schedule document, so disabling it later sticks.

use anyhow::{Context, Result};

use crate::registry::RegistryStore;

/// Per-user Run key consulted by the shell at login.
pub const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// Value name identifying this agent.
pub const VALUE_NAME: &str = "Trial Reset";

/// True if the Run entry is present.
#[must_use]
pub fn is_enabled(registry: &dyn RegistryStore) -> bool {
    registry.string_value(RUN_KEY, VALUE_NAME).is_some()
}

/// Register the current executable for launch at login.
///
/// # Errors
///
/// Fails when the executable path cannot be determined or the Run key
/// cannot be written.
pub fn enable(registry: &dyn RegistryStore) -> Result<()> {
    let exe = std::env::current_exe().context("cannot determine executable path")?;
    let command = format!("\"{}\"", exe.display());
    registry
        .set_string_value(RUN_KEY, VALUE_NAME, &command)
        .context("cannot write Run key")?;
    log::info!("autostart enabled: {command}");
    Ok(())
}

/// Remove the Run entry. Returns whether it existed.
///
/// # Errors
///
/// Fails when the value exists but cannot be deleted.
pub fn disable(registry: &dyn RegistryStore) -> Result<bool> {
    let existed = registry
        .delete_value(RUN_KEY, VALUE_NAME)
        .context("cannot delete Run value")?;
    if existed {
        log::info!("autostart disabled");
    }
    Ok(existed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;

    #[test]
    fn enable_then_disable_round_trips() {
        let registry = MemoryRegistry::new();
        assert!(!is_enabled(&registry));

        enable(&registry).unwrap();
        assert!(is_enabled(&registry));

        let value = registry.string_value(RUN_KEY, VALUE_NAME).unwrap();
        assert!(value.starts_with('"') && value.ends_with('"'));

        assert!(disable(&registry).unwrap());
        assert!(!is_enabled(&registry));
    }

    #[test]
    fn disable_when_absent_reports_false() {
        let registry = MemoryRegistry::new();
        assert!(!disable(&registry).unwrap());
    }
}
