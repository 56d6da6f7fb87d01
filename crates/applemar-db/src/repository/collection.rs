//! # Collection Repository
//!
//! One typed collection stored as a JSON array under a single key.
//!
//! ## Read-Modify-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Every mutation rewrites the whole array                 │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    SELECT value FROM local_storage WHERE key = 'applemar_products'     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    decode → Vec<Product>  (malformed JSON? WARN + empty Vec)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    mutate in memory (append / prepend / update / delete)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    encode → UPSERT local_storage                                       │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unparseable stored JSON never fails a read. The bad value stays in
//! place until the next write replaces it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::marker::PhantomData;
use tracing::{debug, warn};

use applemar_core::Record;

use crate::error::{DbError, DbResult};
use crate::repository::storage::{read_value, write_value};

/// Repository for one stored collection of `T`.
///
/// ## Usage
/// ```rust,ignore
/// let products = db.products();
/// products.append(product).await?;
/// let all = products.list().await?;
/// products.delete("P-3F9A1C07B2").await?;
/// ```
#[derive(Debug)]
pub struct CollectionRepository<T> {
    pool: SqlitePool,
    key: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for CollectionRepository<T> {
    fn clone(&self) -> Self {
        CollectionRepository {
            pool: self.pool.clone(),
            key: self.key,
            _record: PhantomData,
        }
    }
}

impl<T> CollectionRepository<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    /// Creates a repository over the collection stored under `key`.
    pub fn new(pool: SqlitePool, key: &'static str) -> Self {
        CollectionRepository {
            pool,
            key,
            _record: PhantomData,
        }
    }

    /// Storage key of this collection.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Every record, in stored order.
    pub async fn list(&self) -> DbResult<Vec<T>> {
        let raw = read_value(&self.pool, self.key).await?;
        Ok(decode_collection(self.key, raw.as_deref()))
    }

    /// Number of records.
    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.list().await?.len())
    }

    /// Record with the given id, if present.
    pub async fn get(&self, id: &str) -> DbResult<Option<T>> {
        Ok(self.list().await?.into_iter().find(|r| r.id() == id))
    }

    /// Record with the given id, or `NotFound`.
    pub async fn get_required(&self, id: &str) -> DbResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found(T::ENTITY, id))
    }

    /// Adds a record at the end (inventory, customers).
    pub async fn append(&self, record: T) -> DbResult<()> {
        debug!(key = self.key, id = record.id(), "Appending record");
        self.modify(|records| {
            records.push(record);
            Ok(())
        })
        .await
    }

    /// Adds a record at the front (transactions are newest first).
    pub async fn prepend(&self, record: T) -> DbResult<()> {
        debug!(key = self.key, id = record.id(), "Prepending record");
        self.modify(|records| {
            records.insert(0, record);
            Ok(())
        })
        .await
    }

    /// Replaces the record with the same id, keeping its position.
    pub async fn update(&self, record: T) -> DbResult<()> {
        debug!(key = self.key, id = record.id(), "Updating record");
        self.modify(|records| {
            let slot = records
                .iter_mut()
                .find(|r| r.id() == record.id())
                .ok_or_else(|| DbError::not_found(T::ENTITY, record.id()))?;
            *slot = record;
            Ok(())
        })
        .await
    }

    /// Removes the record with `id` and returns it.
    pub async fn delete(&self, id: &str) -> DbResult<T> {
        debug!(key = self.key, id = %id, "Deleting record");
        self.modify(|records| {
            let index = records
                .iter()
                .position(|r| r.id() == id)
                .ok_or_else(|| DbError::not_found(T::ENTITY, id))?;
            Ok(records.remove(index))
        })
        .await
    }

    /// Overwrites the collection with `records`.
    pub async fn replace_all(&self, records: &[T]) -> DbResult<()> {
        debug!(key = self.key, count = records.len(), "Replacing collection");
        let encoded = serde_json::to_string(records)?;
        write_value(&self.pool, self.key, &encoded).await
    }

    /// Removes the collection's key entirely.
    pub async fn clear(&self) -> DbResult<()> {
        debug!(key = self.key, "Clearing collection");
        sqlx::query("DELETE FROM local_storage WHERE key = ?1")
            .bind(self.key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Runs `f` over the decoded collection inside one transaction and
    /// writes the result back. Nothing is written if `f` fails.
    async fn modify<F, R>(&self, f: F) -> DbResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> DbResult<R>,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let raw = read_value(&mut *tx, self.key).await?;
        let mut records = decode_collection(self.key, raw.as_deref());

        let result = f(&mut records)?;

        let encoded = serde_json::to_string(&records)?;
        write_value(&mut *tx, self.key, &encoded).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(result)
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Decodes a stored collection.
///
/// Missing key → empty. Malformed JSON → WARN and empty.
pub(crate) fn decode_collection<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(
                key = %key,
                error = %e,
                "Stored collection is not valid JSON; treating as empty"
            );
            Vec::new()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, PRODUCTS_KEY, TRANSACTIONS_KEY};
    use applemar_core::{Customer, Money, PaymentMethod, Product, Transaction};
    use chrono::Utc;

    fn product(name: &str, stock: i64) -> Product {
        Product::new(
            name,
            Money::from_kwanza(500),
            Money::from_kwanza(300),
            stock,
            "Bebidas",
        )
    }

    #[tokio::test]
    async fn test_add_then_delete_restores_collection() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();

        products.append(product("Cuca Lata", 24)).await.unwrap();
        let before = products.list().await.unwrap();

        let added = product("Sumo Compal", 12);
        let added_id = added.id.clone();
        products.append(added).await.unwrap();
        assert_eq!(products.count().await.unwrap(), 2);

        let removed = products.delete(&added_id).await.unwrap();
        assert_eq!(removed.name, "Sumo Compal");
        assert_eq!(products.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_prepend_keeps_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let txns = db.transactions();

        for description in ["Renda", "Combustível"] {
            txns.prepend(Transaction::expense(
                "Operacional",
                description,
                Money::from_kwanza(1_000),
                PaymentMethod::Cash,
                Utc::now(),
            ))
            .await
            .unwrap();
        }

        let list = txns.list().await.unwrap();
        assert_eq!(list[0].description, "Combustível");
        assert_eq!(list[1].description, "Renda");
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();

        let mut first = product("Água Pura", 40);
        products.append(first.clone()).await.unwrap();
        products.append(product("Cuca Lata", 24)).await.unwrap();

        first.stock = 35;
        first.price_cents = Money::from_kwanza(275).cents();
        products.update(first.clone()).await.unwrap();

        let list = products.list().await.unwrap();
        assert_eq!(list[0], first);
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customers = db.customers();

        let err = customers.delete("C-NOPE").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Customer"));

        let ghost = Customer::new("Fantasma", "", "", "");
        assert!(customers.update(ghost).await.is_err());
        assert!(customers.get_required("C-NOPE").await.is_err());

        // A failed modification writes nothing.
        assert!(db.storage().keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_reads_as_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.storage()
            .set_item(PRODUCTS_KEY, "{not json")
            .await
            .unwrap();

        assert!(db.products().list().await.unwrap().is_empty());

        // Next write replaces the bad value.
        db.products().append(product("Cuca Lata", 24)).await.unwrap();
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_wrong_shape_reads_as_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.storage()
            .set_item(TRANSACTIONS_KEY, r#"[{"id": 1}]"#)
            .await
            .unwrap();

        assert!(db.transactions().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_and_clear() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();

        products
            .replace_all(&[product("A", 1), product("B", 2)])
            .await
            .unwrap();
        assert_eq!(products.count().await.unwrap(), 2);

        products.clear().await.unwrap();
        assert!(products.list().await.unwrap().is_empty());
        assert_eq!(db.storage().get_item(PRODUCTS_KEY).await.unwrap(), None);
    }

    #[test]
    fn test_decode_missing_key() {
        let records: Vec<Product> = decode_collection("applemar_products", None);
        assert!(records.is_empty());
    }
}
