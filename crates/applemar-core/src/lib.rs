//! # applemar-core: Pure Business Logic for the Applemar Manager
//!
//! This crate holds every calculation the business manager performs, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Applemar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    CLI (apps/cli)                               │   │
//! │  │   dashboard, sale checkout, expense add, product edit, ...      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ applemar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │ checkout │ │ report  │ │ valid. │  │   │
//! │  │   │ Product │ │  Money  │ │   Cart   │ │ Summary │ │ rules  │  │   │
//! │  │   │ Txn     │ │ TaxRate │ │ apply_   │ │ Filter  │ │ checks │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             applemar-db (local store)                           │   │
//! │  │   products / transactions / customers JSON collections          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Product, Customer, Transaction, SaleItem)
//! - [`money`] - Money in cêntimos and the IVA rate
//! - [`checkout`] - Cart totals and applying a sale to the collections
//! - [`report`] - Dashboard and report aggregates
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use applemar_core::money::{Money, IVA_RATE};
//!
//! let subtotal = Money::from_kwanza(2500);
//! let tax = subtotal.calculate_tax(IVA_RATE);
//!
//! assert_eq!(tax, Money::from_kwanza(350));
//! assert_eq!((subtotal + tax).to_string(), "2 850,00 Kz");
//! ```

pub mod checkout;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

pub use checkout::{apply_sale, Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, TaxRate, IVA_RATE};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Company shown on statements and in the advisory prompt.
pub const COMPANY_NAME: &str = "Applemar Company Lda";

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Ceiling for any typed amount (prices, expenses, sales target), in whole
/// kwanza. A full cart of capped lines stays well inside `i64` cêntimos.
pub const MAX_AMOUNT_KZ: i64 = 10_000_000_000;

/// Products below this stock level count as critical.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Default monthly sales target in whole kwanza (1 milhão Kz).
pub const DEFAULT_SALES_TARGET_KZ: i64 = 1_000_000;
