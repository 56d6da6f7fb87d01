//! # Applemar CLI Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        applemar                                         │
//! │                                                                         │
//! │  main.rs ────► parses arguments, starts the tokio runtime               │
//! │                                                                         │
//! │  lib.rs ─────► logging, configuration, database, dispatch               │
//! │                                                                         │
//! │  commands/ ──► dashboard, checkout, add_expense, edit_product, ...      │
//! │                                                                         │
//! │  state/ ─────► DbState, ConfigState                                     │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                 SQLite file (WAL), applemar.db                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are printed to stderr as `[Code] message` and the process exits
//! with status 1.

use clap::Parser;
use std::process::ExitCode;

use applemar_cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match applemar_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
