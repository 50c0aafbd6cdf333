//! Scheme repository for database operations.
//!
//! Schemes are catalog templates: their percentages are copied onto an
//! operation at capture time, so editing a scheme never rewrites history.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::{
    schemes,
    sea_orm_active_enums::{CostBasis, SchemeType},
};

/// Error types for scheme operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    /// Scheme not found.
    #[error("Scheme not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a scheme.
#[derive(Debug, Clone)]
pub struct CreateSchemeInput {
    /// Scheme type.
    pub scheme_type: SchemeType,
    /// Overall retained percentage.
    pub scheme_percent: Decimal,
    /// Basis the percentages apply to.
    pub cost_basis: CostBasis,
    /// First broker, if any.
    pub broker1_id: Option<Uuid>,
    /// First broker's percentage.
    pub broker1_percent: Option<Decimal>,
    /// Second broker, if any.
    pub broker2_id: Option<Uuid>,
    /// Second broker's percentage.
    pub broker2_percent: Option<Decimal>,
    /// Third broker, if any.
    pub broker3_id: Option<Uuid>,
    /// Third broker's percentage.
    pub broker3_percent: Option<Decimal>,
}

/// Input for updating a scheme.
#[derive(Debug, Clone, Default)]
pub struct UpdateSchemeInput {
    /// Overall retained percentage.
    pub scheme_percent: Option<Decimal>,
    /// Basis the percentages apply to.
    pub cost_basis: Option<CostBasis>,
    /// First broker.
    pub broker1_id: Option<Option<Uuid>>,
    /// First broker's percentage.
    pub broker1_percent: Option<Option<Decimal>>,
    /// Second broker.
    pub broker2_id: Option<Option<Uuid>>,
    /// Second broker's percentage.
    pub broker2_percent: Option<Option<Decimal>>,
    /// Third broker.
    pub broker3_id: Option<Option<Uuid>>,
    /// Third broker's percentage.
    pub broker3_percent: Option<Option<Decimal>>,
}

/// Scheme repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SchemeRepository {
    db: DatabaseConnection,
}

impl SchemeRepository {
    /// Creates a new scheme repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_scheme(&self, input: CreateSchemeInput) -> Result<schemes::Model, DbErr> {
        let now = chrono::Utc::now().into();
        schemes::ActiveModel {
            id: Set(Uuid::new_v4()),
            scheme_type: Set(input.scheme_type),
            scheme_percent: Set(input.scheme_percent),
            cost_basis: Set(input.cost_basis),
            broker1_id: Set(input.broker1_id),
            broker1_percent: Set(input.broker1_percent),
            broker2_id: Set(input.broker2_id),
            broker2_percent: Set(input.broker2_percent),
            broker3_id: Set(input.broker3_id),
            broker3_percent: Set(input.broker3_percent),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a scheme by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<schemes::Model>, DbErr> {
        schemes::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists schemes, optionally filtered by type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, scheme_type: Option<SchemeType>) -> Result<Vec<schemes::Model>, DbErr> {
        let mut query = schemes::Entity::find().order_by_asc(schemes::Column::CreatedAt);
        if let Some(scheme_type) = scheme_type {
            query = query.filter(schemes::Column::SchemeType.eq(scheme_type));
        }
        query.all(&self.db).await
    }

    /// Updates a scheme. Existing operations keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::NotFound`] if the scheme does not exist.
    pub async fn update_scheme(
        &self,
        id: Uuid,
        input: UpdateSchemeInput,
    ) -> Result<schemes::Model, SchemeError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(SchemeError::NotFound(id))?;

        let mut model: schemes::ActiveModel = existing.into();
        if let Some(v) = input.scheme_percent {
            model.scheme_percent = Set(v);
        }
        if let Some(v) = input.cost_basis {
            model.cost_basis = Set(v);
        }
        if let Some(v) = input.broker1_id {
            model.broker1_id = Set(v);
        }
        if let Some(v) = input.broker1_percent {
            model.broker1_percent = Set(v);
        }
        if let Some(v) = input.broker2_id {
            model.broker2_id = Set(v);
        }
        if let Some(v) = input.broker2_percent {
            model.broker2_percent = Set(v);
        }
        if let Some(v) = input.broker3_id {
            model.broker3_id = Set(v);
        }
        if let Some(v) = input.broker3_percent {
            model.broker3_percent = Set(v);
        }
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a scheme.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::NotFound`] if the scheme does not exist.
    pub async fn delete_scheme(&self, id: Uuid) -> Result<(), SchemeError> {
        let result = schemes::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(SchemeError::NotFound(id));
        }
        Ok(())
    }
}
