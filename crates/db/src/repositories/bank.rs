//! Bank account repository for database operations.

use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{bank_movements, banks};

/// Error types for bank operations.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a bank account.
#[derive(Debug, Clone)]
pub struct CreateBankInput {
    /// Bank institution name.
    pub bank_name: String,
    /// Account number.
    pub account_number: String,
    /// 18-digit CLABE, if known.
    pub clabe: Option<String>,
    /// Opening balance before recorded movements.
    pub initial_balance: Decimal,
    /// Owning company.
    pub company_id: Uuid,
}

/// Input for updating a bank account.
#[derive(Debug, Clone, Default)]
pub struct UpdateBankInput {
    /// Bank institution name.
    pub bank_name: Option<String>,
    /// Account number.
    pub account_number: Option<String>,
    /// 18-digit CLABE.
    pub clabe: Option<Option<String>>,
    /// Opening balance before recorded movements.
    pub initial_balance: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct FlowSums {
    inflow: Option<Decimal>,
    outflow: Option<Decimal>,
}

/// Bank repository for CRUD operations and balance derivation.
#[derive(Debug, Clone)]
pub struct BankRepository {
    db: DatabaseConnection,
}

impl BankRepository {
    /// Creates a new bank repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a bank account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_bank(&self, input: CreateBankInput) -> Result<banks::Model, DbErr> {
        let now = chrono::Utc::now().into();
        banks::ActiveModel {
            id: Set(Uuid::new_v4()),
            bank_name: Set(input.bank_name),
            account_number: Set(input.account_number),
            clabe: Set(input.clabe),
            initial_balance: Set(input.initial_balance),
            company_id: Set(input.company_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a bank account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<banks::Model>, DbErr> {
        banks::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists bank accounts, optionally scoped to a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, company_id: Option<Uuid>) -> Result<Vec<banks::Model>, DbErr> {
        let mut query = banks::Entity::find().order_by_asc(banks::Column::BankName);
        if let Some(company_id) = company_id {
            query = query.filter(banks::Column::CompanyId.eq(company_id));
        }
        query.all(&self.db).await
    }

    /// Updates a bank account.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::NotFound`] if the account does not exist.
    pub async fn update_bank(
        &self,
        id: Uuid,
        input: UpdateBankInput,
    ) -> Result<banks::Model, BankError> {
        let existing = self.find_by_id(id).await?.ok_or(BankError::NotFound(id))?;

        let mut model: banks::ActiveModel = existing.into();
        if let Some(v) = input.bank_name {
            model.bank_name = Set(v);
        }
        if let Some(v) = input.account_number {
            model.account_number = Set(v);
        }
        if let Some(v) = input.clabe {
            model.clabe = Set(v);
        }
        if let Some(v) = input.initial_balance {
            model.initial_balance = Set(v);
        }
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a bank account and, via cascade, its movements.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::NotFound`] if the account does not exist.
    pub async fn delete_bank(&self, id: Uuid) -> Result<(), BankError> {
        let result = banks::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(BankError::NotFound(id));
        }
        Ok(())
    }

    /// Current balance: initial balance plus inflows minus outflows.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::NotFound`] if the account does not exist.
    pub async fn current_balance(&self, id: Uuid) -> Result<Decimal, BankError> {
        let bank = self.find_by_id(id).await?.ok_or(BankError::NotFound(id))?;

        let sums = bank_movements::Entity::find()
            .select_only()
            .column_as(Expr::col(bank_movements::Column::Inflow).sum(), "inflow")
            .column_as(Expr::col(bank_movements::Column::Outflow).sum(), "outflow")
            .filter(bank_movements::Column::BankId.eq(id))
            .into_model::<FlowSums>()
            .one(&self.db)
            .await?;

        let (inflow, outflow) = sums
            .map(|s| {
                (
                    s.inflow.unwrap_or(Decimal::ZERO),
                    s.outflow.unwrap_or(Decimal::ZERO),
                )
            })
            .unwrap_or((Decimal::ZERO, Decimal::ZERO));

        Ok(bank.initial_balance + inflow - outflow)
    }
}
