//! # State Module
//!
//! What a command needs besides its arguments.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      applemar_cli::run                          │   │
//! │  │  let config = ConfigState::from_env();                          │   │
//! │  │  let db = DbState::open(path).await?;                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │               ┌──────────────┴──────────────┐                           │
//! │               ▼                             ▼                           │
//! │  ┌──────────────────────────┐  ┌──────────────────────────────┐        │
//! │  │   DbState                │  │   ConfigState                │        │
//! │  │                          │  │                              │        │
//! │  │  Database (SQLite pool)  │  │  company name, IVA rate,     │        │
//! │  │  file path               │  │  sales target, stock level   │        │
//! │  └──────────────────────────┘  └──────────────────────────────┘        │
//! │                                                                         │
//! │  One command per process: nothing here is shared across threads        │
//! │  beyond the pool, and ConfigState is read-only after startup.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::ConfigState;
pub use db::DbState;
