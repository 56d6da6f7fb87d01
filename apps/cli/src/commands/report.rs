//! # Report Commands
//!
//! The report centre: every ledger entry with the four KPIs, the printable
//! statement, and removal of individual entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::ConfigState;
use applemar_core::report::{render_statement, FinancialSummary, StatementHeader, TransactionFilter};
use applemar_core::validation::validate_search_query;
use applemar_core::Transaction;
use applemar_db::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    /// KPIs over the whole ledger, regardless of the filter.
    pub summary: FinancialSummary,
    pub filter: TransactionFilter,
    /// Entries matching the filter, newest first.
    pub transactions: Vec<Transaction>,
}

fn checked(filter: TransactionFilter) -> Result<TransactionFilter, ApiError> {
    Ok(TransactionFilter {
        search: validate_search_query(&filter.search)?,
        kind: filter.kind,
    })
}

/// Ledger entries matching `filter`, plus global KPIs.
pub async fn list_transactions(
    db: &Database,
    filter: TransactionFilter,
) -> Result<ReportView, ApiError> {
    let filter = checked(filter)?;
    debug!(search = %filter.search, kind = ?filter.kind, "list_transactions command");

    let ledger = db.transactions().list().await?;
    let summary = FinancialSummary::from_transactions(&ledger);
    let transactions = filter.apply(&ledger).into_iter().cloned().collect();

    Ok(ReportView {
        summary,
        filter,
        transactions,
    })
}

/// Plain-text statement of the ledger, ready for printing.
pub async fn print_statement(
    db: &Database,
    config: &ConfigState,
    filter: TransactionFilter,
    now: DateTime<Utc>,
) -> Result<String, ApiError> {
    let filter = checked(filter)?;
    debug!(search = %filter.search, kind = ?filter.kind, "print_statement command");

    let ledger = db.transactions().list().await?;
    let header = StatementHeader {
        company: &config.company_name,
        generated_at: now,
        filter: &filter,
    };

    let statement = render_statement(&header, &ledger);
    info!(entries = ledger.len(), "Statement generated");
    Ok(statement)
}

/// Deletes any ledger entry, sale or expense. Stock is not touched.
pub async fn delete_transaction(db: &Database, id: &str) -> Result<Transaction, ApiError> {
    debug!(id = %id, "delete_transaction command");

    let removed = db.transactions().delete(id).await?;

    info!(id = %removed.id, kind = %removed.kind, "Ledger entry deleted");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use applemar_core::report::KindFilter;
    use applemar_core::{Money, PaymentMethod, TransactionKind};
    use applemar_db::DbConfig;

    async fn seeded() -> (Database, Transaction, Transaction) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let mut sale = Transaction::expense(
            "Venda de Produtos",
            "Venda de 3 itens",
            Money::from_kwanza(2_850),
            PaymentMethod::Cash,
            now,
        );
        sale.id = "V-1".to_string();
        sale.kind = TransactionKind::Income;
        sale.tax_amount_cents = Some(Money::from_kwanza(350).cents());

        let rent = Transaction::expense(
            "Renda",
            "Renda da loja",
            Money::from_kwanza(1_000),
            PaymentMethod::Transfer,
            now,
        );

        db.transactions()
            .replace_all(&[sale.clone(), rent.clone()])
            .await
            .unwrap();
        (db, sale, rent)
    }

    #[tokio::test]
    async fn test_filter_narrows_rows_not_kpis() {
        let (db, _, rent) = seeded().await;

        let view = list_transactions(&db, TransactionFilter::new("", KindFilter::Expense))
            .await
            .unwrap();
        assert_eq!(view.transactions.len(), 1);
        assert_eq!(view.transactions[0].id, rent.id);
        assert_eq!(view.summary.total_income_cents, 285_000);
        assert_eq!(view.summary.balance_cents, 185_000);
        assert_eq!(view.summary.iva_total_cents, 35_000);

        let view = list_transactions(&db, TransactionFilter::new("renda", KindFilter::All))
            .await
            .unwrap();
        assert_eq!(view.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_statement_has_header_and_rows() {
        let (db, _, _) = seeded().await;
        let config = ConfigState::default();

        let text = print_statement(&db, &config, TransactionFilter::default(), Utc::now())
            .await
            .unwrap();

        assert!(text.starts_with("APPLEMAR COMPANY LDA"));
        assert!(text.contains("Saldo de Exercício"));
        assert!(text.contains("+2 850,00 Kz"));
        assert!(text.contains("-1 000,00 Kz"));
        assert!(text.contains("2 lançamento(s)"));
    }

    #[tokio::test]
    async fn test_delete_any_entry() {
        let (db, sale, rent) = seeded().await;

        delete_transaction(&db, &sale.id).await.unwrap();
        delete_transaction(&db, &rent.id).await.unwrap();
        assert_eq!(db.transactions().count().await.unwrap(), 0);

        let err = delete_transaction(&db, "V-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
