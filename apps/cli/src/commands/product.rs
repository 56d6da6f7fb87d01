//! # Product Commands
//!
//! Inventory maintenance: add, edit, delete and list products.
//!
//! ## Edit Flow
//! ```text
//! applemar product edit P-... --price 1300 --stock 40
//!       │
//!       ▼
//! load product by id ──── missing? ──► NotFound
//!       │
//!       ▼
//! validate every supplied field, keep the rest
//!       │
//!       ▼
//! replace the record in applemar_products (same position)
//!       │
//!       ▼
//! ProductDto (negativeStock flags a stock below zero)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use applemar_core::report::{search_products, InventorySnapshot};
use applemar_core::validation::{
    check_stock, validate_category, validate_price, validate_product_name, validate_search_query,
};
use applemar_core::{Money, Product};
use applemar_db::Database;

/// Product as shown to the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub cost_price_cents: i64,
    /// Price minus cost for one unit.
    pub margin_cents: i64,
    pub stock: i64,
    /// Stock is below the critical threshold.
    pub low_stock: bool,
    /// Stock went below zero (sold more than was recorded).
    pub negative_stock: bool,
    pub image: Option<String>,
}

impl ProductDto {
    pub fn from_product(p: Product, threshold: i64) -> Self {
        ProductDto {
            margin_cents: p.unit_margin().cents(),
            low_stock: p.is_low_stock(threshold),
            negative_stock: check_stock(p.stock),
            id: p.id,
            name: p.name,
            category: p.category,
            price_cents: p.price_cents,
            cost_price_cents: p.cost_price_cents,
            stock: p.stock,
            image: p.image,
        }
    }
}

/// Fields of a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub cost_price: Money,
    pub stock: i64,
    pub image: Option<String>,
}

/// Fields to change on an existing product; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub cost_price: Option<Money>,
    pub stock: Option<i64>,
    pub image: Option<String>,
}

/// Inventory listing with its stock-value summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    /// Products matching the search, in stored order.
    pub products: Vec<ProductDto>,
    /// Computed over the whole inventory, not just the matches.
    pub snapshot: InventorySnapshot,
}

/// Adds a product to the inventory.
///
/// ## Validation
/// - name required (≤200 chars), category required (≤100 chars)
/// - price and cost price must not be negative
/// - any stock is accepted; a negative one is only warned about
pub async fn add_product(
    db: &Database,
    input: NewProduct,
    threshold: i64,
) -> Result<ProductDto, ApiError> {
    debug!(name = %input.name, "add_product command");

    let name = validate_product_name(&input.name)?;
    let category = validate_category(&input.category)?;
    validate_price("price", input.price)?;
    validate_price("cost price", input.cost_price)?;

    if check_stock(input.stock) {
        warn!(stock = input.stock, "Product registered with negative stock");
    }

    let mut product = Product::new(name, input.price, input.cost_price, input.stock, category);
    if let Some(image) = input.image.filter(|i| !i.trim().is_empty()) {
        product.image = Some(image.trim().to_string());
    }

    db.products().append(product.clone()).await?;

    info!(id = %product.id, name = %product.name, "Product added");
    Ok(ProductDto::from_product(product, threshold))
}

/// Applies `changes` to the product with `id`.
pub async fn edit_product(
    db: &Database,
    id: &str,
    changes: ProductChanges,
    threshold: i64,
) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "edit_product command");

    let mut product = db.products().get_required(id).await?;

    if let Some(name) = changes.name {
        product.name = validate_product_name(&name)?;
    }
    if let Some(category) = changes.category {
        product.category = validate_category(&category)?;
    }
    if let Some(price) = changes.price {
        validate_price("price", price)?;
        product.price_cents = price.cents();
    }
    if let Some(cost_price) = changes.cost_price {
        validate_price("cost price", cost_price)?;
        product.cost_price_cents = cost_price.cents();
    }
    if let Some(stock) = changes.stock {
        if check_stock(stock) {
            warn!(id = %id, stock, "Product stock set below zero");
        }
        product.stock = stock;
    }
    if let Some(image) = changes.image {
        let image = image.trim();
        product.image = (!image.is_empty()).then(|| image.to_string());
    }

    db.products().update(product.clone()).await?;

    info!(id = %product.id, "Product updated");
    Ok(ProductDto::from_product(product, threshold))
}

/// Removes a product. Past sales keep their frozen line items.
pub async fn delete_product(
    db: &Database,
    id: &str,
    threshold: i64,
) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "delete_product command");

    let removed = db.products().delete(id).await?;

    info!(id = %removed.id, name = %removed.name, "Product deleted");
    Ok(ProductDto::from_product(removed, threshold))
}

/// Lists the inventory, optionally narrowed by name or category.
pub async fn list_products(
    db: &Database,
    query: Option<&str>,
    threshold: i64,
) -> Result<InventoryView, ApiError> {
    let query = validate_search_query(query.unwrap_or_default())?;
    debug!(query = %query, "list_products command");

    let products = db.products().list().await?;
    let snapshot = InventorySnapshot::from_products(&products, threshold);

    let matches = search_products(&products, &query)
        .into_iter()
        .cloned()
        .map(|p| ProductDto::from_product(p, threshold))
        .collect::<Vec<_>>();

    debug!(count = matches.len(), total = products.len(), "Products listed");
    Ok(InventoryView {
        products: matches,
        snapshot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use applemar_db::DbConfig;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn water() -> NewProduct {
        NewProduct {
            name: "Água Pura 1.5L".to_string(),
            category: "Bebidas".to_string(),
            price: Money::from_kwanza(250),
            cost_price: Money::from_kwanza(150),
            stock: 120,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_add_then_delete_restores_inventory() {
        let db = db().await;
        let before = db.products().list().await.unwrap();

        let added = add_product(&db, water(), 5).await.unwrap();
        assert_eq!(added.margin_cents, Money::from_kwanza(100).cents());
        assert!(!added.low_stock);
        assert_eq!(db.products().count().await.unwrap(), 1);

        delete_product(&db, &added.id, 5).await.unwrap();
        assert_eq!(db.products().list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() {
        let db = db().await;

        let mut input = water();
        input.name = "   ".to_string();
        let err = add_product(&db, input, 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut input = water();
        input.price = Money::from_kwanza(-1);
        let err = add_product(&db, input, 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut input = water();
        input.price = Money::parse("92233720368547758").unwrap();
        let err = add_product(&db, input, 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_stock_is_accepted_and_flagged() {
        let db = db().await;
        let mut input = water();
        input.stock = -3;

        let added = add_product(&db, input, 5).await.unwrap();
        assert!(added.negative_stock);
        assert!(added.low_stock);
    }

    #[tokio::test]
    async fn test_edit_changes_only_given_fields() {
        let db = db().await;
        let added = add_product(&db, water(), 5).await.unwrap();

        let changes = ProductChanges {
            price: Some(Money::from_kwanza(300)),
            stock: Some(4),
            ..ProductChanges::default()
        };
        let edited = edit_product(&db, &added.id, changes, 5).await.unwrap();

        assert_eq!(edited.name, "Água Pura 1.5L");
        assert_eq!(edited.price_cents, 30_000);
        assert_eq!(edited.stock, 4);
        assert!(edited.low_stock);

        let stored = db.products().get_required(&added.id).await.unwrap();
        assert_eq!(stored.price_cents, 30_000);
    }

    #[tokio::test]
    async fn test_edit_and_delete_unknown_id() {
        let db = db().await;

        let err = edit_product(&db, "P-missing", ProductChanges::default(), 5)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = delete_product(&db, "P-missing", 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_list_filters_but_snapshot_covers_all() {
        let db = db().await;
        add_product(&db, water(), 5).await.unwrap();
        add_product(
            &db,
            NewProduct {
                name: "Sabão Macaco".to_string(),
                category: "Higiene".to_string(),
                price: Money::from_kwanza(350),
                cost_price: Money::from_kwanza(200),
                stock: 2,
                image: None,
            },
            5,
        )
        .await
        .unwrap();

        let view = list_products(&db, Some("higiene"), 5).await.unwrap();
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.products[0].name, "Sabão Macaco");
        assert_eq!(view.snapshot.product_count, 2);
        assert_eq!(view.snapshot.critical_stock_count, 1);

        let view = list_products(&db, None, 5).await.unwrap();
        assert_eq!(view.products.len(), 2);
    }
}
