//! # Expense Commands
//!
//! Operating costs. Expenses live in the same ledger as sales
//! (`applemar_transactions`), newest first, always recorded as paid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use applemar_core::validation::{validate_amount, validate_category, validate_description};
use applemar_core::{Money, PaymentMethod, Transaction};
use applemar_db::Database;

/// Category used when the operator gives none.
pub const DEFAULT_EXPENSE_CATEGORY: &str = "Operacional";

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseList {
    pub expenses: Vec<Transaction>,
    pub total_cents: i64,
}

/// Records a paid expense at `now`.
pub async fn add_expense(
    db: &Database,
    input: NewExpense,
    now: DateTime<Utc>,
) -> Result<Transaction, ApiError> {
    debug!(description = %input.description, amount = %input.amount, "add_expense command");

    let description = validate_description(&input.description)?;
    let category = validate_category(&input.category)?;
    validate_amount(input.amount)?;

    let expense = Transaction::expense(
        category,
        description,
        input.amount,
        input.payment_method,
        now,
    );
    db.transactions().prepend(expense.clone()).await?;

    info!(id = %expense.id, amount = %expense.amount(), "Expense recorded");
    Ok(expense)
}

/// Every expense in the ledger, newest first, with their sum.
pub async fn list_expenses(db: &Database) -> Result<ExpenseList, ApiError> {
    debug!("list_expenses command");

    let expenses: Vec<Transaction> = db
        .transactions()
        .list()
        .await?
        .into_iter()
        .filter(Transaction::is_expense)
        .collect();
    let total: Money = expenses.iter().map(Transaction::amount).sum();

    Ok(ExpenseList {
        expenses,
        total_cents: total.cents(),
    })
}

/// Deletes an expense. Ids of sales are reported as not found.
pub async fn delete_expense(db: &Database, id: &str) -> Result<Transaction, ApiError> {
    debug!(id = %id, "delete_expense command");

    match db.transactions().get(id).await? {
        Some(txn) if txn.is_expense() => {
            let removed = db.transactions().delete(id).await?;
            info!(id = %removed.id, "Expense deleted");
            Ok(removed)
        }
        _ => Err(ApiError::not_found("Expense", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use applemar_db::DbConfig;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn rent() -> NewExpense {
        NewExpense {
            description: "Renda da loja - Outubro".to_string(),
            amount: Money::from_kwanza(350_000),
            category: "Renda".to_string(),
            payment_method: PaymentMethod::Transfer,
        }
    }

    #[tokio::test]
    async fn test_add_prepends_paid_expense() {
        let db = db().await;
        let now = Utc::now();

        let first = add_expense(&db, rent(), now).await.unwrap();
        let mut fuel = rent();
        fuel.description = "Gasóleo gerador".to_string();
        fuel.amount = Money::from_kwanza(45_000);
        let second = add_expense(&db, fuel, now).await.unwrap();

        let list = list_expenses(&db).await.unwrap();
        assert_eq!(list.expenses.len(), 2);
        assert_eq!(list.expenses[0].id, second.id);
        assert_eq!(list.expenses[1].id, first.id);
        assert_eq!(list.total_cents, Money::from_kwanza(395_000).cents());
        assert!(first.is_expense());
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_amount() {
        let db = db().await;
        let mut input = rent();
        input.amount = Money::zero();

        let err = add_expense(&db, input, Utc::now()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db().await;
        let expense = add_expense(&db, rent(), Utc::now()).await.unwrap();

        delete_expense(&db, &expense.id).await.unwrap();
        assert_eq!(db.transactions().count().await.unwrap(), 0);

        let err = delete_expense(&db, &expense.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
