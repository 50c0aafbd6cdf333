//! Invoice reconciliation repository.
//!
//! Links invoices to the bank movements that settle them. A link assigns an
//! amount of one movement to one invoice; the pair is unique.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{bank_movements, invoice_bank_links, invoices};

/// Error types for reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    /// Link not found.
    #[error("Invoice-movement link not found: {0}")]
    NotFound(Uuid),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Bank movement not found.
    #[error("Bank movement not found: {0}")]
    MovementNotFound(Uuid),

    /// The invoice is already linked to this movement.
    #[error("Invoice {invoice_id} is already linked to movement {bank_movement_id}")]
    AlreadyLinked {
        /// Invoice side of the pair.
        invoice_id: Uuid,
        /// Movement side of the pair.
        bank_movement_id: Uuid,
    },

    /// Assigned amount must be positive.
    #[error("Assigned amount must be positive")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Reconciliation repository for invoice-movement links.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns an amount of a bank movement to an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if either side does not exist, the pair is already
    /// linked, or the amount is not positive.
    pub async fn assign(
        &self,
        invoice_id: Uuid,
        bank_movement_id: Uuid,
        amount_assigned: Decimal,
    ) -> Result<invoice_bank_links::Model, ReconciliationError> {
        if amount_assigned <= Decimal::ZERO {
            return Err(ReconciliationError::NonPositiveAmount);
        }

        if invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(ReconciliationError::InvoiceNotFound(invoice_id));
        }
        if bank_movements::Entity::find_by_id(bank_movement_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(ReconciliationError::MovementNotFound(bank_movement_id));
        }

        let existing = invoice_bank_links::Entity::find()
            .filter(invoice_bank_links::Column::InvoiceId.eq(invoice_id))
            .filter(invoice_bank_links::Column::BankMovementId.eq(bank_movement_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ReconciliationError::AlreadyLinked {
                invoice_id,
                bank_movement_id,
            });
        }

        let link = invoice_bank_links::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            bank_movement_id: Set(bank_movement_id),
            amount_assigned: Set(amount_assigned),
            assigned_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;
        Ok(link)
    }

    /// Removes a link.
    ///
    /// # Errors
    ///
    /// Returns [`ReconciliationError::NotFound`] if the link does not exist.
    pub async fn unassign(&self, link_id: Uuid) -> Result<(), ReconciliationError> {
        let result = invoice_bank_links::Entity::delete_by_id(link_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ReconciliationError::NotFound(link_id));
        }
        Ok(())
    }

    /// Lists the movements linked to an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_invoice(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<invoice_bank_links::Model>, DbErr> {
        invoice_bank_links::Entity::find()
            .filter(invoice_bank_links::Column::InvoiceId.eq(invoice_id))
            .all(&self.db)
            .await
    }

    /// Lists the invoices linked to a movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_movement(
        &self,
        bank_movement_id: Uuid,
    ) -> Result<Vec<invoice_bank_links::Model>, DbErr> {
        invoice_bank_links::Entity::find()
            .filter(invoice_bank_links::Column::BankMovementId.eq(bank_movement_id))
            .all(&self.db)
            .await
    }
}
