//! # Data Commands
//!
//! "Sair / Reset": wipes products, ledger and customers in one go.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use applemar_db::Database;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    /// Storage keys that held data before the reset.
    pub removed_keys: u64,
}

/// Empties every collection. The caller is responsible for confirming.
pub async fn reset_data(db: &Database) -> Result<ResetSummary, ApiError> {
    debug!("reset_data command");

    let removed_keys = db.clear_all().await?;

    info!(removed_keys, "All business data erased");
    Ok(ResetSummary { removed_keys })
}

#[cfg(test)]
mod tests {
    use super::*;
    use applemar_core::{Customer, Money, PaymentMethod, Product, Transaction};
    use applemar_db::DbConfig;
    use chrono::Utc;

    #[tokio::test]
    async fn test_reset_empties_all_collections() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .append(Product::new(
                "Lixívia 1L",
                Money::from_kwanza(900),
                Money::from_kwanza(550),
                30,
                "Limpeza",
            ))
            .await
            .unwrap();
        db.customers()
            .append(Customer::new("Maria Kiala", "", "", ""))
            .await
            .unwrap();
        db.transactions()
            .prepend(Transaction::expense(
                "Operacional",
                "Material de escritório",
                Money::from_kwanza(12_000),
                PaymentMethod::Cash,
                Utc::now(),
            ))
            .await
            .unwrap();

        let summary = reset_data(&db).await.unwrap();
        assert_eq!(summary.removed_keys, 3);

        assert!(db.products().list().await.unwrap().is_empty());
        assert!(db.customers().list().await.unwrap().is_empty());
        assert!(db.transactions().list().await.unwrap().is_empty());

        let again = reset_data(&db).await.unwrap();
        assert_eq!(again.removed_keys, 0);
    }
}
