//! Per-product reset scheduling state.
//!
//! A small JSON document under the app data dir tracks when each product
//! was last reset and when the next reset is due. Loading is soft-fail: a
//! missing or corrupt document degrades to defaults and the agent seeds
//! fresh timestamps on its next tick.

use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::product::ProductKind;

/// Hours a postponed reset is pushed back.
const POSTPONE_HOURS: i64 = 1;

/// Reset timestamps for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSchedule {
    /// When the last reset ran, `None` before the first one.
    #[serde(default)]
    pub last_reset: Option<DateTime<Local>>,
    /// When the next reset is due, `None` until seeded.
    #[serde(default)]
    pub next_reset: Option<DateTime<Local>>,
}

impl ProductSchedule {
    /// True once the due time has passed. Never due before seeding.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        self.next_reset.is_some_and(|due| now >= due)
    }

    /// True before the first reset has ever been scheduled.
    #[must_use]
    pub fn is_first_run(&self) -> bool {
        self.last_reset.is_none() && self.next_reset.is_none()
    }

    /// Schedule the first reset one interval from now.
    pub fn seed(&mut self, now: DateTime<Local>, interval_days: i64) {
        self.next_reset = Some(now + Duration::days(interval_days));
    }

    /// Record a completed reset and schedule the next one.
    pub fn mark_reset(&mut self, now: DateTime<Local>, interval_days: i64) {
        self.last_reset = Some(now);
        self.next_reset = Some(now + Duration::days(interval_days));
    }

    /// Push the next reset back by one hour.
    pub fn postpone(&mut self, now: DateTime<Local>) {
        self.next_reset = Some(now + Duration::hours(POSTPONE_HOURS));
    }

    /// Human-readable time remaining until the next reset.
    #[must_use]
    pub fn countdown(&self, now: DateTime<Local>) -> String {
        let Some(due) = self.next_reset else {
            return "first run".to_string();
        };
        let remaining = due - now;
        if remaining <= Duration::zero() {
            return "due now!".to_string();
        }

        let days = remaining.num_days();
        let hours = remaining.num_hours() % 24;
        let minutes = remaining.num_minutes() % 60;
        if days > 0 {
            format!("{days}d {hours}h")
        } else if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }
}

/// The persisted schedule document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleState {
    #[serde(default)]
    pub jetbrains: ProductSchedule,
    #[serde(default)]
    pub navicat: ProductSchedule,
    /// Set once autostart has been configured on first run, so a user who
    /// turns it off later is not overridden.
    #[serde(default)]
    pub autostart_configured: bool,
}

impl ScheduleState {
    /// Load from disk, degrading to defaults on any failure.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("schedule file is corrupt, starting over: {e}");
                Self::default()
            }),
            Err(e) => {
                log::debug!("no schedule file yet ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Persist to disk as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The schedule slot for a product.
    #[must_use]
    pub fn product(&self, kind: ProductKind) -> &ProductSchedule {
        match kind {
            ProductKind::JetBrains => &self.jetbrains,
            ProductKind::Navicat => &self.navicat,
        }
    }

    /// Mutable schedule slot for a product.
    pub fn product_mut(&mut self, kind: ProductKind) -> &mut ProductSchedule {
        match kind {
            ProductKind::JetBrains => &mut self.jetbrains,
            ProductKind::Navicat => &mut self.navicat,
        }
    }
}
