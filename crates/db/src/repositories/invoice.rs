//! Invoice repository for database operations.
//!
//! Invoices and their concept lines are created atomically; totals are
//! derived from the lines at insert time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use corretaje_core::commission::VAT_FACTOR;

use crate::entities::{invoice_concepts, invoices, sea_orm_active_enums::InvoiceStatus};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Folio already in use.
    #[error("Invoice folio '{0}' already exists")]
    DuplicateFolio(String),

    /// An invoice needs at least one concept line.
    #[error("Invoice must have at least one concept")]
    NoConcepts,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One concept line of an invoice.
#[derive(Debug, Clone)]
pub struct ConceptInput {
    /// Line description.
    pub description: String,
    /// Quantity billed.
    pub quantity: Decimal,
    /// Price per unit, VAT-exclusive.
    pub unit_price: Decimal,
}

/// Input for creating an invoice with its concept lines.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Issuing company.
    pub company_id: Uuid,
    /// Receiver's legal name.
    pub receiver: String,
    /// Receiver's tax ID.
    pub rfc: Option<String>,
    /// Unique folio.
    pub folio: String,
    /// CFDI fiscal UUID.
    pub cfdi_uuid: Option<String>,
    /// CFDI voucher type code.
    pub voucher_type: Option<String>,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// CFDI payment method code.
    pub payment_method: Option<String>,
    /// CFDI payment form code.
    pub payment_form: Option<String>,
    /// Concept lines; must not be empty.
    pub concepts: Vec<ConceptInput>,
}

/// Invoice together with its concept lines.
#[derive(Debug, Clone)]
pub struct InvoiceWithConcepts {
    /// The invoice record.
    pub invoice: invoices::Model,
    /// Its concept lines.
    pub concepts: Vec<invoice_concepts::Model>,
}

/// Invoice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice and its concepts in one transaction. The subtotal
    /// is the sum of the lines; VAT is derived with the fixed factor.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::NoConcepts`] for an empty concept list and
    /// [`InvoiceError::DuplicateFolio`] when the folio is taken.
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceWithConcepts, InvoiceError> {
        if input.concepts.is_empty() {
            return Err(InvoiceError::NoConcepts);
        }

        let txn = self.db.begin().await?;

        let existing = invoices::Entity::find()
            .filter(invoices::Column::Folio.eq(&input.folio))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(InvoiceError::DuplicateFolio(input.folio));
        }

        let subtotal: Decimal = input
            .concepts
            .iter()
            .map(|c| c.quantity * c.unit_price)
            .sum();
        let total = subtotal * VAT_FACTOR;
        let vat = total - subtotal;

        let now = chrono::Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(input.company_id),
            receiver: Set(input.receiver),
            rfc: Set(input.rfc),
            folio: Set(input.folio),
            cfdi_uuid: Set(input.cfdi_uuid),
            voucher_type: Set(input.voucher_type),
            status: Set(InvoiceStatus::Pending),
            issue_date: Set(input.issue_date),
            payment_method: Set(input.payment_method),
            payment_form: Set(input.payment_form),
            subtotal: Set(subtotal),
            vat: Set(vat),
            total: Set(total),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut concepts = Vec::with_capacity(input.concepts.len());
        for concept in input.concepts {
            let amount = concept.quantity * concept.unit_price;
            let inserted = invoice_concepts::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice.id),
                description: Set(concept.description),
                quantity: Set(concept.quantity),
                unit_price: Set(concept.unit_price),
                amount: Set(amount),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            concepts.push(inserted);
        }

        txn.commit().await?;
        Ok(InvoiceWithConcepts { invoice, concepts })
    }

    /// Finds an invoice with its concepts.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::NotFound`] if the invoice does not exist.
    pub async fn find_with_concepts(&self, id: Uuid) -> Result<InvoiceWithConcepts, InvoiceError> {
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id))?;

        let concepts = invoice_concepts::Entity::find()
            .filter(invoice_concepts::Column::InvoiceId.eq(id))
            .all(&self.db)
            .await?;

        Ok(InvoiceWithConcepts { invoice, concepts })
    }

    /// Lists invoices, newest first, optionally scoped to a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, company_id: Option<Uuid>) -> Result<Vec<invoices::Model>, DbErr> {
        let mut query = invoices::Entity::find().order_by_desc(invoices::Column::IssueDate);
        if let Some(company_id) = company_id {
            query = query.filter(invoices::Column::CompanyId.eq(company_id));
        }
        query.all(&self.db).await
    }

    /// Moves an invoice to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::NotFound`] if the invoice does not exist.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<invoices::Model, InvoiceError> {
        let existing = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id))?;

        let mut model: invoices::ActiveModel = existing.into();
        model.status = Set(status);
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes an invoice and, via cascade, its concepts and bank links.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::NotFound`] if the invoice does not exist.
    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), InvoiceError> {
        let result = invoices::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(InvoiceError::NotFound(id));
        }
        Ok(())
    }
}
