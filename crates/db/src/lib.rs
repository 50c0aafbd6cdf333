//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - The stateful recompute operations for operation balances and
//!   commission cascades

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    ApplyPaymentInput, BankRepository, BrokerCommissionRepository, BrokerRepository,
    ClientRepository, CompanyRepository, ConceptInput, CreateBankInput, CreateClientInput,
    CreateCompanyInput, CreateInvoiceInput, CreateMovementInput, CreateOperationInput,
    CreateReturnInput, CreateSchemeInput, CreateUserInput, InvoiceRepository, MovementRepository,
    OperationRepository, PaymentRepository, ReconciliationRepository, ReportRepository,
    ReturnRepository, SchemeRepository, SessionRepository, UpdateBankInput, UpdateClientInput,
    UpdateCompanyInput, UpdateMovementInput, UpdateOperationInput, UpdateReturnInput,
    UpdateSchemeInput, UpdateUserInput, UserRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
