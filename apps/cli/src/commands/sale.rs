//! # Sale Commands
//!
//! Point of sale: checkout, sales history and voiding a sale.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  applemar sale checkout --item P-A:2 --item P-B --payment multicaixa    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Load inventory, resolve each line ─── unknown id ──► NotFound       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Build Cart (IVA 14%) ──────────── over stock ──► InsufficientStock  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Check customer (optional) ──────── unknown id ──► NotFound          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. cart.to_sale() → Transaction (INCOME, PAID, items, taxAmount)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. SaleRepository::record: prepend sale + decrement stock, one         │
//! │     SQLite transaction                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Receipt (totals, customer name, lines now at critical stock)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

use crate::commands::product::ProductDto;
use crate::error::ApiError;
use crate::state::ConfigState;
use applemar_core::report::SalesSummary;
use applemar_core::{Cart, CartTotals, CoreError, PaymentMethod, Transaction};
use applemar_db::Database;

/// One `--item` argument: product id and quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// `ID` or `ID:QTY`; a bare id means one unit.
impl FromStr for LineRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, qty) = match s.rsplit_once(':') {
            Some((id, qty)) => {
                let qty = qty
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| format!("invalid quantity in '{}'", s))?;
                (id, qty)
            }
            None => (s, 1),
        };

        let id = id.trim();
        if id.is_empty() {
            return Err(format!("missing product id in '{}'", s));
        }

        Ok(LineRequest {
            product_id: id.to_string(),
            quantity: qty,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub items: Vec<LineRequest>,
    pub payment_method: PaymentMethod,
    pub customer_id: Option<String>,
}

/// Result of a completed checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sale: Transaction,
    pub totals: CartTotals,
    pub customer_name: Option<String>,
    /// Sold products that are now below the critical level.
    pub low_stock: Vec<ProductDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesHistory {
    pub sales: Vec<Transaction>,
    pub summary: SalesSummary,
}

/// Sells the requested lines and persists the sale atomically.
pub async fn checkout(
    db: &Database,
    config: &ConfigState,
    request: CheckoutRequest,
    now: DateTime<Utc>,
) -> Result<Receipt, ApiError> {
    debug!(
        lines = request.items.len(),
        payment = %request.payment_method,
        "checkout command"
    );

    if request.items.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let products = db.products().list().await?;
    let mut cart = Cart::new();

    for line in &request.items {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        cart.add_item(product, line.quantity)?;
    }

    let customer_id = request
        .customer_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let customer_name = match &customer_id {
        Some(id) => {
            let customer = db
                .customers()
                .get(id)
                .await?
                .ok_or_else(|| CoreError::CustomerNotFound(id.clone()))?;
            Some(customer.name)
        }
        None => None,
    };

    let totals = cart.totals();
    let sale = cart.to_sale(request.payment_method, customer_id, now)?;
    let inventory = db.sales().record(sale.clone()).await?;

    let threshold = config.low_stock_threshold;
    let low_stock = inventory
        .into_iter()
        .filter(|p| p.is_low_stock(threshold) && cart.items.iter().any(|i| i.product_id == p.id))
        .map(|p| ProductDto::from_product(p, threshold))
        .collect();

    info!(
        sale_id = %sale.id,
        total = %sale.amount(),
        items = totals.total_quantity,
        "Sale completed"
    );

    Ok(Receipt {
        sale,
        totals,
        customer_name,
        low_stock,
    })
}

/// Sales history, newest first.
pub async fn list_sales(db: &Database) -> Result<SalesHistory, ApiError> {
    debug!("list_sales command");

    let sales = db.sales().list().await?;
    let summary = SalesSummary::from_transactions(&sales);

    Ok(SalesHistory { sales, summary })
}

/// Removes a sale from the history. Stock is not given back.
pub async fn void_sale(db: &Database, id: &str) -> Result<Transaction, ApiError> {
    debug!(id = %id, "void_sale command");

    let removed = db.sales().delete(id).await?;

    info!(id = %removed.id, amount = %removed.amount(), "Sale voided");
    Ok(removed)
}
