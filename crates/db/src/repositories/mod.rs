//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod bank;
pub mod bank_movement;
pub mod broker;
pub mod broker_commission;
pub mod client;
pub mod company;
pub mod invoice;
pub mod operation;
pub mod operation_return;
pub mod payment;
pub mod reconciliation;
pub mod report;
pub mod scheme;
pub mod session;
pub mod user;

pub use bank::{BankError, BankRepository, CreateBankInput, UpdateBankInput};
pub use bank_movement::{
    CreateMovementInput, MovementError, MovementRepository, UpdateMovementInput,
};
pub use broker::{BrokerError, BrokerRepository};
pub use broker_commission::{BrokerCommissionRepository, BrokerPayoutStats, CommissionError};
pub use client::{ClientError, ClientRepository, CreateClientInput, UpdateClientInput};
pub use company::{CompanyError, CompanyRepository, CreateCompanyInput, UpdateCompanyInput};
pub use invoice::{
    ConceptInput, CreateInvoiceInput, InvoiceError, InvoiceRepository, InvoiceWithConcepts,
};
pub use operation::{
    classify_payment, CreateOperationInput, OperationError, OperationRepository, PaymentStats,
    PaymentStatus, UpdateOperationInput,
};
pub use operation_return::{CreateReturnInput, ReturnError, ReturnRepository, UpdateReturnInput};
pub use payment::{ApplyPaymentInput, PaymentError, PaymentRepository};
pub use reconciliation::{ReconciliationError, ReconciliationRepository};
pub use report::{
    BalanceSummary, CommissionSummary, CompanyBillingRow, ReportError, ReportRepository,
};
pub use scheme::{CreateSchemeInput, SchemeError, SchemeRepository, UpdateSchemeInput};
pub use session::SessionRepository;
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserRepository};
