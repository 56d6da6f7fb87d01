//! # Commands Module
//!
//! One async function per operator action. Commands take the open
//! [`Database`](applemar_db::Database) and the [`ConfigState`](crate::state::ConfigState),
//! return a serializable view, and leave printing to the caller.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Command Modules                                 │
//! │                                                                         │
//! │  dashboard.rs ── dashboard (period KPIs, goal, monthly, critical stock)│
//! │  sale.rs ─────── checkout, list_sales, void_sale                        │
//! │  expense.rs ──── add_expense, list_expenses, delete_expense             │
//! │  product.rs ──── add_product, edit_product, delete_product, list_...    │
//! │  customer.rs ─── add_customer, delete_customer, list_customers          │
//! │  report.rs ───── list_transactions, print_statement, delete_transaction │
//! │  insight.rs ──── generate_insights (AI advisory)                        │
//! │  data.rs ─────── reset_data                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customer;
pub mod dashboard;
pub mod data;
pub mod expense;
pub mod insight;
pub mod product;
pub mod report;
pub mod sale;
