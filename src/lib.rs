//! retrial - Trial-Period Reset Agent
//!
//! A background agent that resets trial-period state for two desktop
//! products on a fixed schedule: an IDE family with per-variant
//! configuration directories (selective backup, tree wipe, restore, and
//! trial-marker scrubbing) and a database tool whose trial state is a flat
//! set of registry keys. User settings survive each reset; only the trial
//! bookkeeping is destroyed.

pub mod agent;
pub mod autostart;
pub mod cli;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod instance;
pub mod jetbrains;
pub mod logging;
pub mod navicat;
pub mod process;
pub mod product;
pub mod registry;
pub mod report;
pub mod schedule;
pub mod signal;

use anyhow::Result;
use chrono::Local;

use crate::cli::{Cli, Commands, ProductArg, ResetArgs, ToggleArg};
use crate::config::AppPaths;
use crate::error::ExitCode;
use crate::jetbrains::JetBrains;
use crate::navicat::Navicat;
use crate::product::{ProductKind, TrialProduct};
use crate::registry::default_registry;
use crate::schedule::ScheduleState;

/// Run the application logic for a parsed command line.
///
/// # Errors
///
/// Returns an error for startup failures (unresolvable user directories,
/// lock held by another instance). Reset step failures are not errors;
/// they appear in the printed summary.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let paths = AppPaths::resolve()?;
    paths.ensure()?;

    match cli.command.unwrap_or(Commands::Agent) {
        Commands::Agent => {
            agent::run(&paths)?;
            Ok(ExitCode::Success)
        }
        Commands::Reset(args) => run_reset(&paths, &args),
        Commands::Status => run_status(&paths),
        Commands::Autostart(args) => run_autostart(args.state),
    }
}

fn product_for(paths: &AppPaths, arg: ProductArg) -> Result<Box<dyn TrialProduct>> {
    Ok(match arg {
        ProductArg::Jetbrains => Box::new(JetBrains::new(
            paths.staging_dir(ProductKind::JetBrains.key()),
        )?),
        ProductArg::Navicat => Box::new(Navicat::new()),
    })
}

/// The standalone debug entry point: one reset, summary on stdout.
fn run_reset(paths: &AppPaths, args: &ResetArgs) -> Result<ExitCode> {
    let product = product_for(paths, args.product)?;

    let running = product.list_running();
    if !running.is_empty() {
        println!(
            "Running processes: {}",
            running.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    let summary = product.perform_reset();
    println!("{summary}");

    let mut state = ScheduleState::load(&paths.schedule_path);
    state
        .product_mut(product.kind())
        .mark_reset(Local::now(), product.interval_days());
    if let Err(e) = state.save(&paths.schedule_path) {
        log::warn!("cannot save schedule: {e:#}");
    }

    Ok(ExitCode::Success)
}

fn run_status(paths: &AppPaths) -> Result<ExitCode> {
    let state = ScheduleState::load(&paths.schedule_path);
    let now = Local::now();
    for (name, kind) in [
        ("JetBrains", ProductKind::JetBrains),
        ("Navicat", ProductKind::Navicat),
    ] {
        println!("{name}: next reset: {}", state.product(kind).countdown(now));
    }
    Ok(ExitCode::Success)
}

fn run_autostart(state: ToggleArg) -> Result<ExitCode> {
    let registry = default_registry();
    match state {
        ToggleArg::On => {
            autostart::enable(registry.as_ref())?;
            println!("autostart enabled");
        }
        ToggleArg::Off => {
            if autostart::disable(registry.as_ref())? {
                println!("autostart disabled");
            } else {
                println!("autostart was not enabled");
            }
        }
    }
    Ok(ExitCode::Success)
}
