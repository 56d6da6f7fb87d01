//! # Insight Command
//!
//! Applemar AI: CFO-style advice generated from the current figures.
//! This is the only command that touches the network, and it never fails
//! because of it: the advisor answers with a fixed message when offline.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::ConfigState;
use applemar_advisor::Advisor;
use applemar_core::report::AdvisorSnapshot;
use applemar_db::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightView {
    /// Figures the advice was built from.
    pub snapshot: AdvisorSnapshot,
    pub advice: String,
    /// Whether an API key was configured for this call.
    pub online: bool,
}

/// Builds the advisory snapshot from the whole ledger and inventory, then
/// asks the advisor.
pub async fn generate_insights(
    db: &Database,
    config: &ConfigState,
    advisor: &Advisor,
) -> Result<InsightView, ApiError> {
    debug!(model = %advisor.config().model, "generate_insights command");

    let ledger = db.transactions().list().await?;
    let products = db.products().list().await?;
    let snapshot = AdvisorSnapshot::build(
        config.company_name.as_str(),
        &ledger,
        &products,
        config.low_stock_threshold,
    );

    let advice = advisor.insights(&snapshot).await;

    info!(online = advisor.is_configured(), "Advisory generated");
    Ok(InsightView {
        snapshot,
        advice,
        online: advisor.is_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use applemar_advisor::{AdvisorConfig, FALLBACK_OFFLINE};
    use applemar_core::{Money, PaymentMethod, Product, Transaction};
    use applemar_db::DbConfig;
    use chrono::Utc;

    #[tokio::test]
    async fn test_offline_advice_still_reports_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .append(Product::new(
                "Açúcar Branco 1kg",
                Money::from_kwanza(1_100),
                Money::from_kwanza(750),
                2,
                "Mercearia",
            ))
            .await
            .unwrap();
        db.transactions()
            .prepend(Transaction::expense(
                "Energia",
                "Factura ENDE",
                Money::from_kwanza(30_000),
                PaymentMethod::Multicaixa,
                Utc::now(),
            ))
            .await
            .unwrap();

        let advisor = Advisor::new(AdvisorConfig::default());
        let view = generate_insights(&db, &ConfigState::default(), &advisor)
            .await
            .unwrap();

        assert!(!view.online);
        assert_eq!(view.advice, FALLBACK_OFFLINE);
        assert_eq!(view.snapshot.company, "Applemar Company Lda");
        assert_eq!(view.snapshot.expense_cents, 3_000_000);
        assert_eq!(view.snapshot.margin_cents, -3_000_000);
        assert_eq!(view.snapshot.product_count, 1);
        assert_eq!(view.snapshot.critical_stock_count, 1);
    }
}
