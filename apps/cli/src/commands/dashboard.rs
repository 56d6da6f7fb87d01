//! # Dashboard Command
//!
//! The financial panel: KPIs for a period, progress toward the sales
//! target, month-by-month flow, stock alerts and the latest entries.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Painel Financeiro · MENSAL                                            │
//! │                                                                         │
//! │  Fluxo Bruto   Custos Totais   Saldo de Exercício   IVA Retido          │
//! │  ───────────── period-scoped FinancialSummary ──────────────────────    │
//! │                                                                         │
//! │  Meta de vendas ████████░░░░░░░░ 48%   (period income / target)         │
//! │                                                                         │
//! │  Fluxo mensal   2026-09  +… / −…                                        │
//! │                 2026-10  +… / −…                                        │
//! │                                                                         │
//! │  Stock crítico  (whole inventory, lowest first)                         │
//! │  Últimos lançamentos (period, newest first)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::product::ProductDto;
use crate::error::ApiError;
use crate::state::ConfigState;
use applemar_core::report::{
    critical_products, goal_progress, monthly_breakdown, FinancialSummary, InventorySnapshot,
    MonthlyTotals, Period, SalesSummary,
};
use applemar_core::validation::validate_sales_target;
use applemar_core::{Money, Transaction};
use applemar_db::Database;

/// Entries shown under "Últimos lançamentos".
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub period: Period,
    pub summary: FinancialSummary,
    pub sales: SalesSummary,
    pub sales_target_cents: i64,
    /// 0..=100
    pub goal_progress: u32,
    pub monthly: Vec<MonthlyTotals>,
    pub inventory: InventorySnapshot,
    pub critical: Vec<ProductDto>,
    pub recent: Vec<Transaction>,
}

/// Builds the dashboard for `period` as seen at `now`.
///
/// `target` overrides the configured sales target for this call.
pub async fn dashboard(
    db: &Database,
    config: &ConfigState,
    period: Period,
    target: Option<Money>,
    now: DateTime<Utc>,
) -> Result<DashboardView, ApiError> {
    debug!(period = ?period, "dashboard command");

    let target = match target {
        Some(target) => {
            validate_sales_target(target)?;
            target
        }
        None => config.sales_target(),
    };

    let ledger = db.transactions().list().await?;
    let products = db.products().list().await?;

    let scoped: Vec<Transaction> = period.select(&ledger, now).into_iter().cloned().collect();
    let summary = FinancialSummary::from_transactions(&scoped);
    let threshold = config.low_stock_threshold;

    let critical = critical_products(&products, threshold)
        .into_iter()
        .cloned()
        .map(|p| ProductDto::from_product(p, threshold))
        .collect();

    debug!(
        period_entries = scoped.len(),
        ledger_entries = ledger.len(),
        "Dashboard computed"
    );

    Ok(DashboardView {
        period,
        goal_progress: goal_progress(summary.total_income(), target),
        sales_target_cents: target.cents(),
        sales: SalesSummary::from_transactions(&scoped),
        monthly: monthly_breakdown(&scoped),
        inventory: InventorySnapshot::from_products(&products, threshold),
        recent: scoped.iter().take(RECENT_LIMIT).cloned().collect(),
        summary,
        critical,
    })
}
