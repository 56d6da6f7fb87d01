//! # Sale Repository
//!
//! Checkout persistence and the sales history view.
//!
//! ## Checkout Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       record(sale)                                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │                                                                 │   │
//! │  │  1. read applemar_products, applemar_transactions               │   │
//! │  │                                                                 │   │
//! │  │  2. apply_sale(): decrement stock per line item,                │   │
//! │  │     prepend the sale                                            │   │
//! │  │                                                                 │   │
//! │  │  3. write both collections                                      │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← stock and ledger change together or not at all               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use applemar_core::{apply_sale, Product, Transaction};

use crate::error::{DbError, DbResult};
use crate::repository::collection::decode_collection;
use crate::repository::storage::{read_value, write_value};
use crate::{PRODUCTS_KEY, TRANSACTIONS_KEY};

/// Repository for sale operations spanning two collections.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a completed sale.
    ///
    /// Stock is decremented with no floor; line items whose product has been
    /// deleted are skipped. Returns the updated inventory.
    pub async fn record(&self, sale: Transaction) -> DbResult<Vec<Product>> {
        debug!(
            id = %sale.id,
            items = sale.sale_items().len(),
            amount_cents = sale.amount_cents,
            "Recording sale"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let raw_products = read_value(&mut *tx, PRODUCTS_KEY).await?;
        let raw_transactions = read_value(&mut *tx, TRANSACTIONS_KEY).await?;

        let mut products: Vec<Product> = decode_collection(PRODUCTS_KEY, raw_products.as_deref());
        let mut transactions: Vec<Transaction> =
            decode_collection(TRANSACTIONS_KEY, raw_transactions.as_deref());

        let sale_id = sale.id.clone();
        apply_sale(&mut products, &mut transactions, sale);

        write_value(&mut *tx, PRODUCTS_KEY, &serde_json::to_string(&products)?).await?;
        write_value(
            &mut *tx,
            TRANSACTIONS_KEY,
            &serde_json::to_string(&transactions)?,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %sale_id, "Sale recorded");
        Ok(products)
    }

    /// Sales only (transactions carrying line items), newest first.
    pub async fn list(&self) -> DbResult<Vec<Transaction>> {
        let raw = read_value(&self.pool, TRANSACTIONS_KEY).await?;
        let transactions: Vec<Transaction> = decode_collection(TRANSACTIONS_KEY, raw.as_deref());
        Ok(transactions.into_iter().filter(|t| t.is_sale()).collect())
    }

    /// Removes a sale from the history. Stock is not restored.
    ///
    /// Ids that exist but are not sales are reported as not found.
    pub async fn delete(&self, id: &str) -> DbResult<Transaction> {
        debug!(id = %id, "Deleting sale");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let raw = read_value(&mut *tx, TRANSACTIONS_KEY).await?;
        let mut transactions: Vec<Transaction> =
            decode_collection(TRANSACTIONS_KEY, raw.as_deref());

        let index = transactions
            .iter()
            .position(|t| t.id == id && t.is_sale())
            .ok_or_else(|| DbError::not_found("Sale", id))?;
        let removed = transactions.remove(index);

        write_value(
            &mut *tx,
            TRANSACTIONS_KEY,
            &serde_json::to_string(&transactions)?,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use applemar_core::{Cart, Money, PaymentMethod};
    use chrono::Utc;

    fn product(name: &str, kz: i64, stock: i64) -> Product {
        Product::new(
            name,
            Money::from_kwanza(kz),
            Money::from_kwanza(kz / 2),
            stock,
            "Bebidas",
        )
    }

    #[tokio::test]
    async fn test_record_decrements_stock_and_prepends() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let water = product("Água Pura", 1_000, 10);
        let juice = product("Sumo Compal", 500, 4);
        db.products()
            .replace_all(&[water.clone(), juice.clone()])
            .await
            .unwrap();
        db.transactions()
            .prepend(Transaction::expense(
                "Operacional",
                "Renda",
                Money::from_kwanza(10_000),
                PaymentMethod::Transfer,
                Utc::now(),
            ))
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add_item(&water, 2).unwrap();
        cart.add_item(&juice, 1).unwrap();
        let sale = cart.to_sale(PaymentMethod::Cash, None, Utc::now()).unwrap();
        let sale_id = sale.id.clone();

        let inventory = db.sales().record(sale).await.unwrap();
        assert_eq!(inventory[0].stock, 8);
        assert_eq!(inventory[1].stock, 3);

        let stored = db.products().list().await.unwrap();
        assert_eq!(stored, inventory);

        let txns = db.transactions().list().await.unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].id, sale_id);
        assert_eq!(txns[0].amount(), Money::from_kwanza(2_850));
        assert_eq!(txns[0].tax_amount(), Money::from_kwanza(350));
    }

    #[tokio::test]
    async fn test_record_allows_negative_stock_and_missing_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let water = product("Água Pura", 1_000, 3);
        let ghost = product("Descontinuado", 200, 5);
        db.products().append(water.clone()).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&water, 3).unwrap();
        cart.add_item(&ghost, 1).unwrap();
        let sale = cart.to_sale(PaymentMethod::Multicaixa, None, Utc::now()).unwrap();

        // Stock dropped elsewhere between add-to-cart and checkout.
        let mut changed = water.clone();
        changed.stock = 1;
        db.products().update(changed).await.unwrap();

        let inventory = db.sales().record(sale).await.unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].stock, -2);
    }

    #[tokio::test]
    async fn test_sales_list_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let water = product("Água Pura", 1_000, 10);
        db.products().append(water.clone()).await.unwrap();

        let expense = Transaction::expense(
            "Operacional",
            "Combustível",
            Money::from_kwanza(5_000),
            PaymentMethod::Cash,
            Utc::now(),
        );
        let expense_id = expense.id.clone();
        db.transactions().prepend(expense).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&water, 1).unwrap();
        let sale = cart.to_sale(PaymentMethod::Cash, None, Utc::now()).unwrap();
        let sale_id = sale.id.clone();
        db.sales().record(sale).await.unwrap();

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, sale_id);

        assert!(matches!(
            db.sales().delete(&expense_id).await,
            Err(DbError::NotFound { .. })
        ));

        let removed = db.sales().delete(&sale_id).await.unwrap();
        assert_eq!(removed.id, sale_id);
        assert!(db.sales().list().await.unwrap().is_empty());
        assert_eq!(db.transactions().count().await.unwrap(), 1);
        // Deleting a sale leaves stock where checkout put it.
        assert_eq!(db.products().list().await.unwrap()[0].stock, 9);
    }
}
