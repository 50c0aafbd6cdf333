//! Bank movement repository for database operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::bank_movements;

/// Error types for bank movement operations.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// Movement not found.
    #[error("Bank movement not found: {0}")]
    NotFound(Uuid),

    /// A movement must move money in exactly one direction.
    #[error("A movement must have a positive inflow or outflow, not both")]
    InvalidFlow,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a bank movement.
#[derive(Debug, Clone)]
pub struct CreateMovementInput {
    /// Account the movement belongs to.
    pub bank_id: Uuid,
    /// Money in.
    pub inflow: Decimal,
    /// Money out.
    pub outflow: Decimal,
    /// Statement date.
    pub movement_date: NaiveDate,
    /// Statement description.
    pub description: Option<String>,
    /// Bank reference.
    pub reference: Option<String>,
    /// Operator comments.
    pub comments: Option<String>,
    /// Invoice this movement settles, if already known.
    pub invoice_id: Option<Uuid>,
    /// User who captured the movement.
    pub user_id: Option<Uuid>,
}

/// Input for updating a bank movement.
#[derive(Debug, Clone, Default)]
pub struct UpdateMovementInput {
    /// Money in.
    pub inflow: Option<Decimal>,
    /// Money out.
    pub outflow: Option<Decimal>,
    /// Statement date.
    pub movement_date: Option<NaiveDate>,
    /// Statement description.
    pub description: Option<Option<String>>,
    /// Bank reference.
    pub reference: Option<Option<String>>,
    /// Operator comments.
    pub comments: Option<Option<String>>,
    /// Invoice this movement settles.
    pub invoice_id: Option<Option<Uuid>>,
}

/// Bank movement repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a movement. Exactly one of inflow or outflow must be positive.
    ///
    /// # Errors
    ///
    /// Returns [`MovementError::InvalidFlow`] when both or neither direction
    /// carries an amount.
    pub async fn create_movement(
        &self,
        input: CreateMovementInput,
    ) -> Result<bank_movements::Model, MovementError> {
        if !valid_flow(input.inflow, input.outflow) {
            return Err(MovementError::InvalidFlow);
        }

        let now = chrono::Utc::now().into();
        let movement = bank_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            bank_id: Set(input.bank_id),
            inflow: Set(input.inflow),
            outflow: Set(input.outflow),
            movement_date: Set(input.movement_date),
            description: Set(input.description),
            reference: Set(input.reference),
            comments: Set(input.comments),
            invoice_id: Set(input.invoice_id),
            user_id: Set(input.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(movement)
    }

    /// Finds a movement by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<bank_movements::Model>, DbErr> {
        bank_movements::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists movements for an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_bank(&self, bank_id: Uuid) -> Result<Vec<bank_movements::Model>, DbErr> {
        bank_movements::Entity::find()
            .filter(bank_movements::Column::BankId.eq(bank_id))
            .order_by_desc(bank_movements::Column::MovementDate)
            .all(&self.db)
            .await
    }

    /// Updates a movement.
    ///
    /// # Errors
    ///
    /// Returns [`MovementError::NotFound`] if the movement does not exist,
    /// or [`MovementError::InvalidFlow`] if the patched amounts are invalid.
    pub async fn update_movement(
        &self,
        id: Uuid,
        input: UpdateMovementInput,
    ) -> Result<bank_movements::Model, MovementError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(MovementError::NotFound(id))?;

        let inflow = input.inflow.unwrap_or(existing.inflow);
        let outflow = input.outflow.unwrap_or(existing.outflow);
        if !valid_flow(inflow, outflow) {
            return Err(MovementError::InvalidFlow);
        }

        let mut model: bank_movements::ActiveModel = existing.into();
        model.inflow = Set(inflow);
        model.outflow = Set(outflow);
        if let Some(v) = input.movement_date {
            model.movement_date = Set(v);
        }
        if let Some(v) = input.description {
            model.description = Set(v);
        }
        if let Some(v) = input.reference {
            model.reference = Set(v);
        }
        if let Some(v) = input.comments {
            model.comments = Set(v);
        }
        if let Some(v) = input.invoice_id {
            model.invoice_id = Set(v);
        }
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a movement and, via cascade, its payment applications and
    /// invoice links.
    ///
    /// # Errors
    ///
    /// Returns [`MovementError::NotFound`] if the movement does not exist.
    pub async fn delete_movement(&self, id: Uuid) -> Result<(), MovementError> {
        let result = bank_movements::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(MovementError::NotFound(id));
        }
        Ok(())
    }
}

/// A movement carries money in exactly one direction.
fn valid_flow(inflow: Decimal, outflow: Decimal) -> bool {
    if inflow.is_sign_negative() || outflow.is_sign_negative() {
        return false;
    }
    let has_inflow = !inflow.is_zero();
    let has_outflow = !outflow.is_zero();
    has_inflow != has_outflow
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn one_direction_is_valid() {
        assert!(valid_flow(dec!(100), Decimal::ZERO));
        assert!(valid_flow(Decimal::ZERO, dec!(50)));
    }

    #[test]
    fn both_or_neither_is_invalid() {
        assert!(!valid_flow(dec!(100), dec!(50)));
        assert!(!valid_flow(Decimal::ZERO, Decimal::ZERO));
    }

    #[test]
    fn negative_amounts_are_invalid() {
        assert!(!valid_flow(dec!(-10), Decimal::ZERO));
        assert!(!valid_flow(Decimal::ZERO, dec!(-10)));
    }
}
