//! The background agent loop.
//!
//! Ticks once a minute: seeds schedules on first run, logs countdowns, and
//! auto-triggers a reset when a product's interval has elapsed. The loop is
//! single-threaded, so resets are serialized per product by construction;
//! the engine keeps no internal lock and relies on that.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;

use crate::autostart;
use crate::config::AppPaths;
use crate::instance::InstanceLock;
use crate::jetbrains::JetBrains;
use crate::navicat::Navicat;
use crate::product::{ProductKind, TrialProduct};
use crate::registry::default_registry;
use crate::schedule::ScheduleState;
use crate::signal;

/// Interval between schedule checks.
const TICK: Duration = Duration::from_secs(60);

/// Run the agent until Ctrl+C.
///
/// # Errors
///
/// Fails on startup when another instance holds the lock, when the signal
/// handler cannot be installed, or when the user directories cannot be
/// resolved. Once the loop is running, nothing is fatal.
pub fn run(paths: &AppPaths) -> Result<()> {
    let _lock = InstanceLock::acquire(&paths.lock_path)?;
    let products = build_products(paths)?;
    let shutdown = signal::install_handler()?;

    configure_autostart_once(paths);
    log::info!("agent started, tracking {} product(s)", products.len());

    loop {
        tick(paths, &products);

        // Sleep in one-second slices so shutdown takes effect promptly.
        for _ in 0..TICK.as_secs() {
            if shutdown.is_shutdown_requested() {
                log::info!("agent stopped");
                return Ok(());
            }
            thread::sleep(Duration::from_secs(1));
        }
    }
}

/// All products this agent tracks.
pub fn build_products(paths: &AppPaths) -> Result<Vec<Box<dyn TrialProduct>>> {
    Ok(vec![
        Box::new(JetBrains::new(
            paths.staging_dir(ProductKind::JetBrains.key()),
        )?),
        Box::new(Navicat::new()),
    ])
}

/// One schedule pass over every product.
fn tick(paths: &AppPaths, products: &[Box<dyn TrialProduct>]) {
    let now = Local::now();
    let mut state = ScheduleState::load(&paths.schedule_path);
    let mut changed = false;

    for product in products {
        let kind = product.kind();
        let slot = state.product(kind);
        let first_run = slot.is_first_run();
        let due = slot.is_due(now);
        let countdown = slot.countdown(now);

        if first_run {
            state.product_mut(kind).seed(now, product.interval_days());
            changed = true;
            log::info!(
                "{}: first run, next reset in {}",
                product.name(),
                state.product(kind).countdown(now)
            );
        } else if due {
            log::info!("{}: trial period elapsed, resetting", product.name());
            let summary = product.perform_reset();
            for line in summary.lines() {
                log::info!("{}: {line}", product.name());
            }
            state.product_mut(kind).mark_reset(now, product.interval_days());
            changed = true;
        } else {
            log::debug!("{}: next reset in {countdown}", product.name());
        }
    }

    if changed {
        if let Err(e) = state.save(&paths.schedule_path) {
            log::error!("cannot save schedule: {e:#}");
        }
    }
}

/// Enable launch-at-login exactly once, remembering that it was done so a
/// user who turns it off later stays in control.
fn configure_autostart_once(paths: &AppPaths) {
    let mut state = ScheduleState::load(&paths.schedule_path);
    if state.autostart_configured {
        return;
    }

    let registry = default_registry();
    match autostart::enable(registry.as_ref()) {
        Ok(()) => {
            state.autostart_configured = true;
            if let Err(e) = state.save(&paths.schedule_path) {
                log::warn!("cannot record autostart configuration: {e:#}");
            }
        }
        Err(e) => log::warn!("could not configure autostart: {e:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn both_products_are_tracked() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::rooted_at(dir.path());

        let products = build_products(&paths).unwrap();

        let kinds: Vec<ProductKind> = products.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, vec![ProductKind::JetBrains, ProductKind::Navicat]);
        assert_eq!(products[0].interval_days(), 25);
        assert_eq!(products[1].interval_days(), 10);
    }
}
