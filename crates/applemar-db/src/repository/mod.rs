//! # Repository Module
//!
//! Repository implementations over the local store.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  Command                                                               │
//! │       │  db.products().append(product)                                 │
//! │       ▼                                                                 │
//! │  CollectionRepository<Product>      SaleRepository                     │
//! │  ├── list / get / count             ├── record (two collections)       │
//! │  ├── append / prepend               ├── list                           │
//! │  ├── update / delete                └── delete                         │
//! │  └── replace_all / clear                   │                           │
//! │       │                                    │                           │
//! │       └──────────────┬─────────────────────┘                           │
//! │                      ▼                                                  │
//! │  StorageRepository: get_item / set_item / remove_item / clear / keys   │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  local_storage (key TEXT, value TEXT, updated_at TEXT)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`StorageRepository`](storage::StorageRepository) - Raw key/value access
//! - [`CollectionRepository`](collection::CollectionRepository) - One typed JSON-array collection
//! - [`SaleRepository`](sale::SaleRepository) - Checkout persistence and sales history

pub mod collection;
pub mod sale;
pub mod storage;
