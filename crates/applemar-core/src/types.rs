//! # Domain Types
//!
//! The records kept in the three stored collections.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Transaction   │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id  (P-…)      │   │  id (E-… / V-…) │   │  id (C-…)       │       │
//! │  │  name           │   │  type           │   │  name           │       │
//! │  │  price_cents    │   │  amount_cents   │   │  nif            │       │
//! │  │  cost_price_c.  │   │  payment_method │   │  email          │       │
//! │  │  stock          │   │  status         │   │  phone          │       │
//! │  │  category       │   │  items? ────────┼──►│ SaleItem[]      │       │
//! │  └─────────────────┘   │  customer_id?   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  A Sale is a Transaction whose `items` is present.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All records serialize to camelCase JSON; that JSON is exactly what the
//! local store keeps under each collection key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Record Identity
// =============================================================================

/// A record that lives in one of the stored collections.
pub trait Record {
    /// Entity name used in not-found messages.
    const ENTITY: &'static str;

    fn id(&self) -> &str;
}

/// Prefix that tells record kinds apart at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Product,
    Customer,
    Expense,
    Sale,
}

impl IdPrefix {
    pub const fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Product => "P",
            IdPrefix::Customer => "C",
            IdPrefix::Expense => "E",
            IdPrefix::Sale => "V",
        }
    }
}

/// Generates a record id such as `V-3F9A1C07B2`.
pub fn generate_id(prefix: IdPrefix) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix.as_str(), suffix[..10].to_uppercase())
}

// =============================================================================
// Product
// =============================================================================

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,

    pub name: String,

    /// Unit sale price in cêntimos.
    pub price_cents: i64,

    /// Unit cost in cêntimos (for margin figures).
    pub cost_price_cents: i64,

    /// Units on hand. Expected ≥ 0 but checkout may push it below.
    pub stock: i64,

    pub category: String,

    /// Optional image reference (URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Creates a product with a fresh id and a placeholder image.
    pub fn new(
        name: impl Into<String>,
        price: Money,
        cost_price: Money,
        stock: i64,
        category: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let image = Some(placeholder_image(&name));
        Product {
            id: generate_id(IdPrefix::Product),
            name,
            price_cents: price.cents(),
            cost_price_cents: cost_price.cents(),
            stock,
            category: category.into(),
            image,
        }
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Unit margin (price − cost).
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.price() - self.cost_price()
    }

    /// Below the critical stock level.
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }
}

impl Record for Product {
    const ENTITY: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Placeholder image seeded from the product name.
pub fn placeholder_image(name: &str) -> String {
    let seed: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("https://picsum.photos/seed/{}/200", seed)
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// Número de Identificação Fiscal.
    pub nif: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        nif: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Customer {
            id: generate_id(IdPrefix::Customer),
            name: name.into(),
            nif: nif.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

impl Record for Customer {
    const ENTITY: &'static str = "Customer";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Transaction Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PaymentMethod {
    /// Notes and coins.
    #[default]
    Cash,
    /// Multicaixa card terminal (TPA).
    Multicaixa,
    /// Bank transfer.
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum TransactionStatus {
    #[default]
    Paid,
    Pending,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        })
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Multicaixa => "MULTICAIXA",
            PaymentMethod::Transfer => "TRANSFER",
        })
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionStatus::Paid => "PAID",
            TransactionStatus::Pending => "PENDING",
        })
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "entrada" | "receita" => Ok(TransactionKind::Income),
            "expense" | "saida" | "saída" | "despesa" => Ok(TransactionKind::Expense),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec!["INCOME".to_string(), "EXPENSE".to_string()],
            }),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "kz" | "numerario" | "numerário" => Ok(PaymentMethod::Cash),
            "multicaixa" | "tpa" | "card" => Ok(PaymentMethod::Multicaixa),
            "transfer" | "transf" | "transferencia" | "transferência" => {
                Ok(PaymentMethod::Transfer)
            }
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec![
                    "CASH".to_string(),
                    "MULTICAIXA".to_string(),
                    "TRANSFER".to_string(),
                ],
            }),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paid" | "pago" => Ok(TransactionStatus::Paid),
            "pending" | "pendente" => Ok(TransactionStatus::Pending),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["PAID".to_string(), "PENDING".to_string()],
            }),
        }
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A sale line, frozen at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,
    /// Product name at time of sale.
    pub name: String,
    /// Unit price in cêntimos at time of sale.
    pub price_cents: i64,
    pub quantity: i64,
}

impl SaleItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A ledger entry: income, expense, or a sale (income with line items).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    pub category: String,

    pub description: String,

    /// Amount in cêntimos (sales: total including IVA).
    pub amount_cents: i64,

    /// Epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[ts(type = "number")]
    pub timestamp: DateTime<Utc>,

    pub payment_method: PaymentMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_taxable: Option<bool>,

    /// IVA carried by this entry, in cêntimos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount_cents: Option<i64>,

    pub status: TransactionStatus,

    /// Present only on sales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SaleItem>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl Transaction {
    /// Creates a paid expense entry.
    pub fn expense(
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Money,
        payment_method: PaymentMethod,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Transaction {
            id: generate_id(IdPrefix::Expense),
            kind: TransactionKind::Expense,
            category: category.into(),
            description: description.into(),
            amount_cents: amount.cents(),
            timestamp,
            payment_method,
            is_taxable: None,
            tax_amount_cents: None,
            status: TransactionStatus::Paid,
            items: None,
            customer_id: None,
        }
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// IVA carried by the entry (zero when absent).
    #[inline]
    pub fn tax_amount(&self) -> Money {
        Money::from_cents(self.tax_amount_cents.unwrap_or(0))
    }

    /// Amount with sign: income positive, expense negative.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount(),
            TransactionKind::Expense => -self.amount(),
        }
    }

    #[inline]
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    #[inline]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// A sale is a transaction that carries line items.
    #[inline]
    pub fn is_sale(&self) -> bool {
        self.items.is_some()
    }

    /// Line items (empty for non-sales).
    pub fn sale_items(&self) -> &[SaleItem] {
        self.items.as_deref().unwrap_or(&[])
    }
}

impl Record for Transaction {
    const ENTITY: &'static str = "Transaction";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
