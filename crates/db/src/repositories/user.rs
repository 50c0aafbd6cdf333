//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Email already registered.
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email, unique.
    pub email: String,
    /// Access role.
    pub role: UserRole,
    /// Argon2 hash of the password.
    pub password_hash: String,
}

/// Input for updating a user.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Access role.
    pub role: Option<UserRole>,
    /// Replacement password hash.
    pub password_hash: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::DuplicateEmail`] when the email is taken.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let existing = self.find_by_email(&input.email).await?;
        if existing.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            role: Set(input.role),
            password_hash: Set(input.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(user)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Lists all users ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::Email)
            .all(&self.db)
            .await
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if the user does not exist.
    pub async fn update_user(
        &self,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<users::Model, UserError> {
        let existing = self.find_by_id(id).await?.ok_or(UserError::NotFound(id))?;

        let mut model: users::ActiveModel = existing.into();
        if let Some(v) = input.first_name {
            model.first_name = Set(v);
        }
        if let Some(v) = input.last_name {
            model.last_name = Set(v);
        }
        if let Some(v) = input.role {
            model.role = Set(v);
        }
        if let Some(v) = input.password_hash {
            model.password_hash = Set(v);
        }
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if the user does not exist.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), UserError> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }
}
