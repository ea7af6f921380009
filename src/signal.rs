//! Ctrl+C handling for the agent loop.
//!
//! The handler only flips a shared flag; the loop polls it between sleeps
//! so a running reset always finishes before the process exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

/// Shared shutdown flag set by the signal handler.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// True once Ctrl+C (or SIGTERM) has been received.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Install the process-wide signal handler.
///
/// # Errors
///
/// Fails if a handler is already installed; install at most once.
pub fn install_handler() -> Result<ShutdownHandler> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);

    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
        eprintln!("Interrupted. Shutting down...");
    })
    .context("failed to install signal handler")?;

    Ok(ShutdownHandler {
        flag,
    })
}
