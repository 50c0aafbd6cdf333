//! Client repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::clients;

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a client. The code is generated, not supplied.
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    /// Display name.
    pub name: String,
    /// Site the client is attached to; drives the code prefix.
    pub site: String,
    /// How the client was referred.
    pub origin: Option<String>,
}

/// Input for updating a client.
#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    /// Display name.
    pub name: Option<String>,
    /// How the client was referred.
    pub origin: Option<Option<String>>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a client with a generated per-site code.
    ///
    /// Codes follow `SITE-0001`: the site prefix uppercased plus a sequence
    /// number scoped to that site.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_client(
        &self,
        input: CreateClientInput,
    ) -> Result<clients::Model, ClientError> {
        let txn = self.db.begin().await?;

        // The sequence continues from the highest code already issued for
        // the site; deleted clients never free their number for reuse.
        let last = clients::Entity::find()
            .filter(clients::Column::Site.eq(&input.site))
            .order_by_desc(clients::Column::Code)
            .one(&txn)
            .await?;
        let sequence = next_sequence(last.as_ref().map(|c| c.code.as_str()));
        let code = generate_code(&input.site, sequence);

        let now = chrono::Utc::now().into();
        let client = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            site: Set(input.site),
            origin: Set(input.origin),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(client)
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists all clients ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<clients::Model>, DbErr> {
        clients::Entity::find()
            .order_by_asc(clients::Column::Code)
            .all(&self.db)
            .await
    }

    /// Updates a client. Code and site are immutable once assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the client does not exist.
    pub async fn update_client(
        &self,
        id: Uuid,
        input: UpdateClientInput,
    ) -> Result<clients::Model, ClientError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let mut model: clients::ActiveModel = existing.into();
        if let Some(v) = input.name {
            model.name = Set(v);
        }
        if let Some(v) = input.origin {
            model.origin = Set(v);
        }
        model.updated_at = Set(chrono::Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a client and, via cascade, its operations.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the client does not exist.
    pub async fn delete_client(&self, id: Uuid) -> Result<(), ClientError> {
        let result = clients::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ClientError::NotFound(id));
        }
        Ok(())
    }
}

/// 1-based sequence for the next code, derived from the highest code the
/// site has issued so far.
fn next_sequence(last_code: Option<&str>) -> u64 {
    last_code
        .and_then(|code| code.rsplit('-').next())
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or(0)
        + 1
}

/// Builds a client code from the site name and a 1-based sequence number.
fn generate_code(site: &str, sequence: u64) -> String {
    let prefix: String = site
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    format!("{prefix}-{sequence:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_uses_site_prefix_and_sequence() {
        assert_eq!(generate_code("Monterrey", 1), "MON-0001");
        assert_eq!(generate_code("cdmx", 42), "CDM-0042");
    }

    #[test]
    fn code_skips_non_alphanumeric_characters() {
        assert_eq!(generate_code("S. Luis", 7), "SLU-0007");
    }

    #[test]
    fn first_code_for_a_site_starts_at_one() {
        assert_eq!(next_sequence(None), 1);
    }

    #[test]
    fn sequence_continues_from_the_highest_issued_code() {
        // Three clients issued, one deleted: the next code must still be
        // MON-0004, never a reissue of an existing one.
        assert_eq!(next_sequence(Some("MON-0003")), 4);
        assert_eq!(next_sequence(Some("CDM-0042")), 43);
    }

    #[test]
    fn malformed_last_code_restarts_the_sequence() {
        assert_eq!(next_sequence(Some("MON-")), 1);
        assert_eq!(next_sequence(Some("legacy")), 1);
    }
}
