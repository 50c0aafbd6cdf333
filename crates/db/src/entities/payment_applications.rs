//! `SeaORM` Entity for the payment_applications table.
//!
//! Applies (part of) a bank deposit against an operation; drives the
//! unpaid / partially-paid / fully-paid classification.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub operation_id: Uuid,
    /// Bank movement supplying the funds.
    pub bank_movement_id: Uuid,
    pub amount_applied: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::operations::Entity",
        from = "Column::OperationId",
        to = "super::operations::Column::Id"
    )]
    Operations,
    #[sea_orm(
        belongs_to = "super::bank_movements::Entity",
        from = "Column::BankMovementId",
        to = "super::bank_movements::Column::Id"
    )]
    BankMovements,
}

impl Related<super::operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl Related<super::bank_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
