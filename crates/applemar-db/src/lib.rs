//! # applemar-db: Local Store for the Applemar Manager
//!
//! Keeps the products, transactions and customers collections on disk.
//! Each collection is a JSON array under a fixed key of a SQLite
//! `local_storage` table, read on demand and overwritten on every change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Applemar Data Flow                               │
//! │                                                                         │
//! │  CLI command (applemar product add ...)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   applemar-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────────┐  ┌─────────────┐  │   │
//! │  │   │   Database    │    │   Repositories    │  │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                   │  │ (embedded)  │  │   │
//! │  │   │               │    │ Collection<T>     │  │             │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepository    │  │ 0001_local_ │  │   │
//! │  │   │               │    │ StorageRepository │  │ storage.sql │  │   │
//! │  │   └───────────────┘    └───────────────────┘  └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite file, e.g. ~/.local/share/applemar/applemar.db          │   │
//! │  │   applemar_products | applemar_transactions | applemar_customers│   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Storage, collection and sale repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use applemar_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("applemar.db")).await?;
//!
//! db.customers().append(customer).await?;
//! let inventory = db.sales().record(sale).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::collection::CollectionRepository;
pub use repository::sale::SaleRepository;
pub use repository::storage::StorageRepository;

// =============================================================================
// Storage Keys
// =============================================================================

/// Inventory collection key.
pub const PRODUCTS_KEY: &str = "applemar_products";

/// Ledger collection key (sales and expenses, newest first).
pub const TRANSACTIONS_KEY: &str = "applemar_transactions";

/// CRM collection key.
pub const CUSTOMERS_KEY: &str = "applemar_customers";
