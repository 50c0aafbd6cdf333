//! `SeaORM` Entity for the invoice_bank_links table.
//!
//! Reconciliation between invoices and bank movements: each row assigns an
//! amount of a movement to an invoice.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_bank_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub bank_movement_id: Uuid,
    pub amount_assigned: Decimal,
    pub assigned_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
    #[sea_orm(
        belongs_to = "super::bank_movements::Entity",
        from = "Column::BankMovementId",
        to = "super::bank_movements::Column::Id"
    )]
    BankMovements,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::bank_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
