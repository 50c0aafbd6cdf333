//! Company repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::companies;

/// Error types for company operations.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    /// Company not found.
    #[error("Company not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a company.
#[derive(Debug, Clone)]
pub struct CreateCompanyInput {
    /// Legal name.
    pub name: String,
    /// Tax ID.
    pub rfc: Option<String>,
    /// Declared line of business.
    pub line_of_business: Option<String>,
    /// Destination notes.
    pub destination: Option<String>,
}

/// Input for updating a company.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompanyInput {
    /// Legal name.
    pub name: Option<String>,
    /// Tax ID.
    pub rfc: Option<Option<String>>,
    /// Declared line of business.
    pub line_of_business: Option<Option<String>>,
    /// Destination notes.
    pub destination: Option<Option<String>>,
}

/// Company repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_company(
        &self,
        input: CreateCompanyInput,
    ) -> Result<companies::Model, DbErr> {
        let now = chrono::Utc::now().into();
        companies::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            rfc: Set(input.rfc),
            line_of_business: Set(input.line_of_business),
            destination: Set(input.destination),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists all companies ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<companies::Model>, DbErr> {
        companies::Entity::find()
            .order_by_asc(companies::Column::Name)
            .all(&self.db)
            .await
    }

    /// Updates a company.
    ///
    /// # Errors
    ///
    /// Returns [`CompanyError::NotFound`] if the company does not exist.
    pub async fn update_company(
        &self,
        id: Uuid,
        input: UpdateCompanyInput,
    ) -> Result<companies::Model, CompanyError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(CompanyError::NotFound(id))?;

        let mut model: companies::ActiveModel = existing.into();
        if let Some(v) = input.name {
            model.name = Set(v);
        }
        if let Some(v) = input.rfc {
            model.rfc = Set(v);
        }
        if let Some(v) = input.line_of_business {
            model.line_of_business = Set(v);
        }
        if let Some(v) = input.destination {
            model.destination = Set(v);
        }
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a company and, via cascade, its banks, operations, and
    /// invoices.
    ///
    /// # Errors
    ///
    /// Returns [`CompanyError::NotFound`] if the company does not exist.
    pub async fn delete_company(&self, id: Uuid) -> Result<(), CompanyError> {
        let result = companies::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CompanyError::NotFound(id));
        }
        Ok(())
    }
}
