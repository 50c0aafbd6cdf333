//! Broker repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::brokers;

/// Error types for broker operations.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// Broker not found.
    #[error("Broker not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Broker repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BrokerRepository {
    db: DatabaseConnection,
}

impl BrokerRepository {
    /// Creates a new broker repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a broker.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_broker(&self, name: String) -> Result<brokers::Model, DbErr> {
        let now = chrono::Utc::now().into();
        brokers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a broker by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<brokers::Model>, DbErr> {
        brokers::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists all brokers ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<brokers::Model>, DbErr> {
        brokers::Entity::find()
            .order_by_asc(brokers::Column::Name)
            .all(&self.db)
            .await
    }

    /// Renames a broker.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::NotFound`] if the broker does not exist.
    pub async fn rename_broker(&self, id: Uuid, name: String) -> Result<brokers::Model, BrokerError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(BrokerError::NotFound(id))?;

        let mut model: brokers::ActiveModel = existing.into();
        model.name = Set(name);
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a broker and, via cascade, its commission rows.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::NotFound`] if the broker does not exist.
    pub async fn delete_broker(&self, id: Uuid) -> Result<(), BrokerError> {
        let result = brokers::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(BrokerError::NotFound(id));
        }
        Ok(())
    }
}
