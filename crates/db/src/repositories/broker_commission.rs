//! Broker commission repository for database operations.
//!
//! Commission rows are snapshots taken when an operation is captured; this
//! repository only moves them through their payment lifecycle and aggregates
//! them for payout reporting. Amounts are never resynced from the operation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{broker_commissions, sea_orm_active_enums::CommissionStatus};

/// Error types for broker commission operations.
#[derive(Debug, thiserror::Error)]
pub enum CommissionError {
    /// Commission not found.
    #[error("Broker commission not found: {0}")]
    NotFound(Uuid),

    /// Commission already settled; paid and cancelled rows are immutable.
    #[error("Broker commission {0} is already settled")]
    AlreadySettled(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Payout totals for one broker.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct BrokerPayoutStats {
    /// Broker the totals belong to.
    pub broker_id: Uuid,
    /// Sum of pending commission amounts.
    pub pending_total: Option<Decimal>,
    /// Sum of paid commission amounts.
    pub paid_total: Option<Decimal>,
    /// Number of commission rows.
    pub commission_count: i64,
}

/// Broker commission repository.
#[derive(Debug, Clone)]
pub struct BrokerCommissionRepository {
    db: DatabaseConnection,
}

impl BrokerCommissionRepository {
    /// Creates a new broker commission repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a commission by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<broker_commissions::Model>, DbErr> {
        broker_commissions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists commissions for a broker, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_broker(
        &self,
        broker_id: Uuid,
    ) -> Result<Vec<broker_commissions::Model>, DbErr> {
        broker_commissions::Entity::find()
            .filter(broker_commissions::Column::BrokerId.eq(broker_id))
            .order_by_desc(broker_commissions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists commissions for an operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_operation(
        &self,
        operation_id: Uuid,
    ) -> Result<Vec<broker_commissions::Model>, DbErr> {
        broker_commissions::Entity::find()
            .filter(broker_commissions::Column::OperationId.eq(operation_id))
            .all(&self.db)
            .await
    }

    /// Lists commissions in a given lifecycle status, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_status(
        &self,
        status: CommissionStatus,
    ) -> Result<Vec<broker_commissions::Model>, DbErr> {
        broker_commissions::Entity::find()
            .filter(broker_commissions::Column::Status.eq(status))
            .order_by_desc(broker_commissions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Marks a pending commission as paid.
    ///
    /// # Errors
    ///
    /// Returns [`CommissionError::AlreadySettled`] when the row is no longer
    /// pending.
    pub async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: Option<String>,
        payment_date: NaiveDate,
    ) -> Result<broker_commissions::Model, CommissionError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(CommissionError::NotFound(id))?;
        if existing.status != CommissionStatus::Pending {
            return Err(CommissionError::AlreadySettled(id));
        }

        let mut model: broker_commissions::ActiveModel = existing.into();
        model.status = Set(CommissionStatus::Paid);
        model.payment_method = Set(payment_method);
        model.payment_date = Set(Some(payment_date));
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Cancels a pending commission.
    ///
    /// # Errors
    ///
    /// Returns [`CommissionError::AlreadySettled`] when the row is no longer
    /// pending.
    pub async fn cancel(&self, id: Uuid) -> Result<broker_commissions::Model, CommissionError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(CommissionError::NotFound(id))?;
        if existing.status != CommissionStatus::Pending {
            return Err(CommissionError::AlreadySettled(id));
        }

        let mut model: broker_commissions::ActiveModel = existing.into();
        model.status = Set(CommissionStatus::Cancelled);
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Per-broker payout totals across all commissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn payout_stats(&self) -> Result<Vec<BrokerPayoutStats>, DbErr> {
        broker_commissions::Entity::find()
            .select_only()
            .column(broker_commissions::Column::BrokerId)
            .column_as(
                Expr::expr(
                    Expr::case(
                        Expr::col(broker_commissions::Column::Status)
                            .eq(CommissionStatus::Pending),
                        Expr::col(broker_commissions::Column::Amount),
                    )
                    .finally(Expr::value(Decimal::ZERO)),
                )
                .sum(),
                "pending_total",
            )
            .column_as(
                Expr::expr(
                    Expr::case(
                        Expr::col(broker_commissions::Column::Status).eq(CommissionStatus::Paid),
                        Expr::col(broker_commissions::Column::Amount),
                    )
                    .finally(Expr::value(Decimal::ZERO)),
                )
                .sum(),
                "paid_total",
            )
            .column_as(
                Expr::col(broker_commissions::Column::Id).count(),
                "commission_count",
            )
            .group_by(broker_commissions::Column::BrokerId)
            .into_model::<BrokerPayoutStats>()
            .all(&self.db)
            .await
    }
}
