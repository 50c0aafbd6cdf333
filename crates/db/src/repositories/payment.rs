//! Payment application repository for database operations.
//!
//! A payment application assigns (part of) a bank deposit to an operation.
//! The applied sums drive the unpaid / partially-paid / fully-paid views on
//! the operation side.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::{bank_movements, operations, payment_applications};

/// Error types for payment application operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Application not found.
    #[error("Payment application not found: {0}")]
    NotFound(Uuid),

    /// Operation not found.
    #[error("Operation not found: {0}")]
    OperationNotFound(Uuid),

    /// Bank movement not found.
    #[error("Bank movement not found: {0}")]
    MovementNotFound(Uuid),

    /// Applied amount must be positive.
    #[error("Applied amount must be positive")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for applying a deposit to an operation.
#[derive(Debug, Clone)]
pub struct ApplyPaymentInput {
    /// Operation being paid.
    pub operation_id: Uuid,
    /// Movement supplying the funds.
    pub bank_movement_id: Uuid,
    /// Amount of the movement applied to this operation.
    pub amount_applied: Decimal,
}

/// Payment application repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a deposit to an operation.
    ///
    /// # Errors
    ///
    /// Returns an error if either side of the application does not exist or
    /// the amount is not positive.
    pub async fn apply_payment(
        &self,
        input: ApplyPaymentInput,
    ) -> Result<payment_applications::Model, PaymentError> {
        if input.amount_applied <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount);
        }

        let operation = operations::Entity::find_by_id(input.operation_id)
            .one(&self.db)
            .await?;
        if operation.is_none() {
            return Err(PaymentError::OperationNotFound(input.operation_id));
        }

        let movement = bank_movements::Entity::find_by_id(input.bank_movement_id)
            .one(&self.db)
            .await?;
        if movement.is_none() {
            return Err(PaymentError::MovementNotFound(input.bank_movement_id));
        }

        let application = payment_applications::ActiveModel {
            id: Set(Uuid::new_v4()),
            operation_id: Set(input.operation_id),
            bank_movement_id: Set(input.bank_movement_id),
            amount_applied: Set(input.amount_applied),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;
        Ok(application)
    }

    /// Lists applications against an operation, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_operation(
        &self,
        operation_id: Uuid,
    ) -> Result<Vec<payment_applications::Model>, DbErr> {
        payment_applications::Entity::find()
            .filter(payment_applications::Column::OperationId.eq(operation_id))
            .order_by_desc(payment_applications::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists applications drawing on a bank movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_movement(
        &self,
        bank_movement_id: Uuid,
    ) -> Result<Vec<payment_applications::Model>, DbErr> {
        payment_applications::Entity::find()
            .filter(payment_applications::Column::BankMovementId.eq(bank_movement_id))
            .all(&self.db)
            .await
    }

    /// Removes a payment application.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::NotFound`] if the application does not exist.
    pub async fn remove_application(&self, id: Uuid) -> Result<(), PaymentError> {
        let result = payment_applications::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(PaymentError::NotFound(id));
        }
        Ok(())
    }
}
