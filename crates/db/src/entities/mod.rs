//! `SeaORM` entity definitions for the back-office schema.

pub mod bank_movements;
pub mod banks;
pub mod broker_commissions;
pub mod brokers;
pub mod clients;
pub mod companies;
pub mod invoice_bank_links;
pub mod invoice_concepts;
pub mod invoices;
pub mod operation_returns;
pub mod operations;
pub mod payment_applications;
pub mod schemes;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod users;
