//! # Checkout
//!
//! Cart math and the collection updates a confirmed sale performs.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  Operator Action          Cart Method             Cart Change           │
//! │  ───────────────          ───────────             ───────────           │
//! │  Pick product ──────────► add_item() ───────────► push or qty += n      │
//! │  + / − ─────────────────► adjust_quantity() ────► qty ± 1 (≥ 1)         │
//! │  Type quantity ─────────► set_quantity() ───────► qty = n               │
//! │  Remove ────────────────► remove_item() ────────► line dropped          │
//! │                                                                         │
//! │  Confirm ───────────────► to_sale() ────────────► Sale transaction      │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          apply_sale() ── prepend sale to transactions                   │
//! │                       └─ stock −= quantity for each line                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! `subtotal = Σ price × qty`, `tax = subtotal × 14%`, `total = subtotal + tax`.
//! IVA is computed once on the subtotal, not per line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxRate, IVA_RATE};
use crate::types::{
    generate_id, IdPrefix, PaymentMethod, Product, SaleItem, Transaction, TransactionKind,
    TransactionStatus,
};
use crate::validation::{validate_price, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Category recorded on every checkout.
pub const SALE_CATEGORY: &str = "Venda de Produtos";

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// Name and price are frozen when the product is added; `available_stock`
/// remembers the stock seen at that moment so quantity changes can be capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
    pub available_stock: i64,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price_cents: product.price_cents,
            quantity,
            available_stock: product.stock,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_cents) * self.quantity
    }

    fn to_sale_item(&self) -> SaleItem {
        SaleItem {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            price_cents: self.price_cents,
            quantity: self.quantity,
        }
    }

    fn check_stock(&self, requested: i64) -> CoreResult<()> {
        if requested > self.available_stock {
            return Err(CoreError::InsufficientStock {
                product: self.name.clone(),
                available: self.available_stock,
                requested,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The checkout cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding again raises the quantity)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY` and ≤ the stock seen on add
/// - At most `MAX_CART_ITEMS` lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub tax_rate: TaxRate,
}

impl Cart {
    /// Creates an empty cart taxed at IVA.
    pub fn new() -> Self {
        Cart::with_tax_rate(IVA_RATE)
    }

    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        Cart {
            items: Vec::new(),
            tax_rate,
        }
    }

    /// Adds a product or raises its quantity if already present.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price("price", product.price())?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.available_stock = product.stock;
            item.check_stock(new_qty)?;
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let item = CartItem::from_product(product, quantity);
        item.check_stock(quantity)?;
        self.items.push(item);
        Ok(())
    }

    /// Moves a line's quantity by `delta`, never below 1.
    ///
    /// A change that would exceed the known stock leaves the line untouched
    /// and reports the shortfall.
    pub fn adjust_quantity(&mut self, product_id: &str, delta: i64) -> CoreResult<i64> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))?;

        let new_qty = (item.quantity + delta).clamp(1, MAX_ITEM_QUANTITY);
        item.check_stock(new_qty)?;
        item.quantity = new_qty;
        Ok(new_qty)
    }

    /// Sets a line's quantity outright; zero removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))?;
        item.check_stock(quantity)?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(self.tax_rate)
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    /// Turns the cart into a paid sale transaction.
    ///
    /// The cart itself is left as-is; callers clear it after the sale is
    /// persisted.
    pub fn to_sale(
        &self,
        payment_method: PaymentMethod,
        customer_id: Option<String>,
        now: DateTime<Utc>,
    ) -> CoreResult<Transaction> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let totals = self.totals();

        Ok(Transaction {
            id: generate_id(IdPrefix::Sale),
            kind: TransactionKind::Income,
            category: SALE_CATEGORY.to_string(),
            description: format!("Venda de {} itens", totals.total_quantity),
            amount_cents: totals.total_cents,
            timestamp: now,
            payment_method,
            is_taxable: Some(true),
            tax_amount_cents: Some(totals.tax_cents),
            status: TransactionStatus::Paid,
            items: Some(self.items.iter().map(CartItem::to_sale_item).collect()),
            customer_id: customer_id.filter(|c| !c.trim().is_empty()),
        })
    }
}

/// Cart totals summary for display and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    #[ts(type = "number")]
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        let tax = subtotal.calculate_tax(cart.tax_rate);
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: subtotal.cents(),
            tax_cents: tax.cents(),
            total_cents: (subtotal + tax).cents(),
        }
    }
}

// =============================================================================
// Applying a Sale
// =============================================================================

/// Records a confirmed sale against the in-memory collections.
///
/// - The sale is prepended to `transactions` (newest first).
/// - Each line decrements the matching product's stock by its quantity.
///   There is no floor: stock may go negative. Lines whose product has since
///   been deleted are skipped.
pub fn apply_sale(products: &mut [Product], transactions: &mut Vec<Transaction>, sale: Transaction) {
    for line in sale.sale_items() {
        if let Some(product) = products.iter_mut().find(|p| p.id == line.product_id) {
            product.stock -= line.quantity;
        }
    }
    transactions.insert(0, sale);
}

// =============================================================================
// Unit Tests
// =============================================================================
