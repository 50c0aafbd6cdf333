//! Report repository for summary queries.
//!
//! Aggregates for the back-office dashboards: commission cascade totals,
//! outstanding balances, and per-company billing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{invoices, operations};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Commission cascade totals over a date range.
#[derive(Debug, Clone, Default, Serialize, FromQueryResult)]
pub struct CommissionSummary {
    /// Operations counted.
    pub operation_count: i64,
    /// Sum of general commission amounts.
    pub general_amount: Option<Decimal>,
    /// Sum of savings fund carve-outs.
    pub savings_fund: Option<Decimal>,
    /// Sum of free savings funds.
    pub free_savings_fund: Option<Decimal>,
    /// Sum of first partner shares.
    pub partner_share_a: Option<Decimal>,
    /// Sum of second partner shares.
    pub partner_share_b: Option<Decimal>,
}

/// Balance totals over a date range.
#[derive(Debug, Clone, Default, Serialize, FromQueryResult)]
pub struct BalanceSummary {
    /// Operations counted.
    pub operation_count: i64,
    /// Sum of deposits.
    pub deposit_total: Option<Decimal>,
    /// Sum of persisted balances; negative entries net against positive.
    pub balance_total: Option<Decimal>,
}

/// Billing totals for one company over a date range.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct CompanyBillingRow {
    /// Company the totals belong to.
    pub company_id: Uuid,
    /// Invoices issued.
    pub invoice_count: i64,
    /// Sum of subtotals.
    pub subtotal: Option<Decimal>,
    /// Sum of VAT.
    pub vat: Option<Decimal>,
    /// Sum of totals.
    pub total: Option<Decimal>,
}

/// Report repository for aggregate queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Commission cascade totals for operations dated within the range,
    /// inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidDateRange`] when `start > end`.
    pub async fn commission_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CommissionSummary, ReportError> {
        validate_range(start, end)?;

        let summary = operations::Entity::find()
            .select_only()
            .column_as(Expr::col(operations::Column::Id).count(), "operation_count")
            .column_as(
                Expr::col(operations::Column::GeneralAmount).sum(),
                "general_amount",
            )
            .column_as(
                Expr::col(operations::Column::SavingsFund).sum(),
                "savings_fund",
            )
            .column_as(
                Expr::col(operations::Column::FreeSavingsFund).sum(),
                "free_savings_fund",
            )
            .column_as(
                Expr::col(operations::Column::PartnerShareA).sum(),
                "partner_share_a",
            )
            .column_as(
                Expr::col(operations::Column::PartnerShareB).sum(),
                "partner_share_b",
            )
            .filter(operations::Column::OperationDate.between(start, end))
            .into_model::<CommissionSummary>()
            .one(&self.db)
            .await?
            .unwrap_or_default();

        Ok(summary)
    }

    /// Deposit and balance totals for operations dated within the range,
    /// inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidDateRange`] when `start > end`.
    pub async fn balance_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BalanceSummary, ReportError> {
        validate_range(start, end)?;

        let summary = operations::Entity::find()
            .select_only()
            .column_as(Expr::col(operations::Column::Id).count(), "operation_count")
            .column_as(Expr::col(operations::Column::Deposit).sum(), "deposit_total")
            .column_as(Expr::col(operations::Column::Balance).sum(), "balance_total")
            .filter(operations::Column::OperationDate.between(start, end))
            .into_model::<BalanceSummary>()
            .one(&self.db)
            .await?
            .unwrap_or_default();

        Ok(summary)
    }

    /// Per-company billing totals for invoices issued within the range,
    /// inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidDateRange`] when `start > end`.
    pub async fn billing_by_company(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CompanyBillingRow>, ReportError> {
        validate_range(start, end)?;

        let rows = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::CompanyId)
            .column_as(Expr::col(invoices::Column::Id).count(), "invoice_count")
            .column_as(Expr::col(invoices::Column::Subtotal).sum(), "subtotal")
            .column_as(Expr::col(invoices::Column::Vat).sum(), "vat")
            .column_as(Expr::col(invoices::Column::Total).sum(), "total")
            .filter(invoices::Column::IssueDate.between(start, end))
            .group_by(invoices::Column::CompanyId)
            .into_model::<CompanyBillingRow>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), ReportError> {
    if start > end {
        return Err(ReportError::InvalidDateRange { start, end });
    }
    Ok(())
}
