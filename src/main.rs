//! retrial - Trial-Period Reset Agent
//!
//! Entry point for the retrial CLI application.

use clap::Parser;
use retrial::{cli::Cli, error::ExitCode, instance::InstanceError};

fn main() {
    let cli = Cli::parse();

    match retrial::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = if err
                .downcast_ref::<InstanceError>()
                .is_some_and(|e| matches!(e, InstanceError::AlreadyRunning(_)))
            {
                ExitCode::AlreadyRunning
            } else {
                ExitCode::GeneralError
            };

            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
