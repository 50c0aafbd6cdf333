//! Return repository for database operations.
//!
//! Returns are partial repayments recorded against an operation. Every
//! mutation recomputes the parent operation's balance inside the same
//! transaction so the persisted balance never drifts from the return rows.

use chrono::NaiveDate;
use corretaje_core::commission::balance_after_returns;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{operation_returns, operations};
use crate::repositories::operation::returns_total;

/// Error types for return operations.
#[derive(Debug, thiserror::Error)]
pub enum ReturnError {
    /// Return not found.
    #[error("Return not found: {0}")]
    NotFound(Uuid),

    /// Parent operation not found.
    #[error("Operation not found: {0}")]
    OperationNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a return.
#[derive(Debug, Clone)]
pub struct CreateReturnInput {
    /// Operation the repayment belongs to.
    pub operation_id: Uuid,
    /// Date the repayment was made.
    pub payment_date: NaiveDate,
    /// Amount repaid.
    pub amount_paid: Decimal,
    /// Payment method (transfer, cash, cheque).
    pub payment_method: Option<String>,
    /// Free-form bank reference.
    pub reference: Option<String>,
    /// URL of the uploaded repayment receipt.
    pub receipt_url: Option<String>,
}

/// Input for updating a return.
#[derive(Debug, Clone, Default)]
pub struct UpdateReturnInput {
    /// Date the repayment was made.
    pub payment_date: Option<NaiveDate>,
    /// Amount repaid.
    pub amount_paid: Option<Decimal>,
    /// Payment method.
    pub payment_method: Option<Option<String>>,
    /// Free-form bank reference.
    pub reference: Option<Option<String>>,
    /// URL of the uploaded repayment receipt.
    pub receipt_url: Option<Option<String>>,
}

/// Return repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ReturnRepository {
    db: DatabaseConnection,
}

impl ReturnRepository {
    /// Creates a new return repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a return and refreshes the parent operation's balance.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnError::OperationNotFound`] if the parent operation
    /// does not exist.
    pub async fn create_return(
        &self,
        input: CreateReturnInput,
    ) -> Result<operation_returns::Model, ReturnError> {
        let txn = self.db.begin().await?;

        let operation = operations::Entity::find_by_id(input.operation_id)
            .one(&txn)
            .await?
            .ok_or(ReturnError::OperationNotFound(input.operation_id))?;

        let now = chrono::Utc::now().into();
        let created = operation_returns::ActiveModel {
            id: Set(Uuid::new_v4()),
            operation_id: Set(input.operation_id),
            payment_date: Set(input.payment_date),
            amount_paid: Set(input.amount_paid),
            payment_method: Set(input.payment_method),
            reference: Set(input.reference),
            receipt_url: Set(input.receipt_url),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        refresh_balance(&txn, operation).await?;
        txn.commit().await?;
        Ok(created)
    }

    /// Finds a return by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<operation_returns::Model>, DbErr> {
        operation_returns::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists returns for an operation, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_operation(
        &self,
        operation_id: Uuid,
    ) -> Result<Vec<operation_returns::Model>, DbErr> {
        operation_returns::Entity::find()
            .filter(operation_returns::Column::OperationId.eq(operation_id))
            .order_by_desc(operation_returns::Column::PaymentDate)
            .all(&self.db)
            .await
    }

    /// Updates a return and refreshes the parent operation's balance.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnError::NotFound`] if the return does not exist.
    pub async fn update_return(
        &self,
        id: Uuid,
        input: UpdateReturnInput,
    ) -> Result<operation_returns::Model, ReturnError> {
        let txn = self.db.begin().await?;

        let existing = operation_returns::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ReturnError::NotFound(id))?;
        let operation_id = existing.operation_id;

        let mut model: operation_returns::ActiveModel = existing.into();
        if let Some(v) = input.payment_date {
            model.payment_date = Set(v);
        }
        if let Some(v) = input.amount_paid {
            model.amount_paid = Set(v);
        }
        if let Some(v) = input.payment_method {
            model.payment_method = Set(v);
        }
        if let Some(v) = input.reference {
            model.reference = Set(v);
        }
        if let Some(v) = input.receipt_url {
            model.receipt_url = Set(v);
        }
        model.updated_at = Set(chrono::Utc::now().into());
        let updated = model.update(&txn).await?;

        let operation = operations::Entity::find_by_id(operation_id)
            .one(&txn)
            .await?
            .ok_or(ReturnError::OperationNotFound(operation_id))?;
        refresh_balance(&txn, operation).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a return and refreshes the parent operation's balance.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnError::NotFound`] if the return does not exist.
    pub async fn delete_return(&self, id: Uuid) -> Result<(), ReturnError> {
        let txn = self.db.begin().await?;

        let existing = operation_returns::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ReturnError::NotFound(id))?;
        let operation_id = existing.operation_id;
        existing.delete(&txn).await?;

        let operation = operations::Entity::find_by_id(operation_id)
            .one(&txn)
            .await?
            .ok_or(ReturnError::OperationNotFound(operation_id))?;
        refresh_balance(&txn, operation).await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Rewrites the operation's balance from its stored inputs and the current
/// sum of returns, bumping the version.
async fn refresh_balance(
    txn: &DatabaseTransaction,
    operation: operations::Model,
) -> Result<(), DbErr> {
    let basis: corretaje_core::commission::CostBasis = operation.cost_basis.into();
    let returned = returns_total(txn, operation.id).await?;
    let balance =
        balance_after_returns(operation.deposit, Some(operation.scheme_percent), basis, returned);

    let version = operation.version;
    let mut model: operations::ActiveModel = operation.into();
    model.balance = Set(balance);
    model.version = Set(version + 1);
    model.updated_at = Set(chrono::Utc::now().into());
    model.update(txn).await?;
    Ok(())
}
