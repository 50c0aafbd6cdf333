//! `SeaORM` Entity for the broker_commissions table.
//!
//! One row per broker per operation, snapshotted at operation-creation time.
//! Rows are independently mutable and never resynchronized when the parent
//! operation's percentages change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CommissionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "broker_commissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub broker_id: Uuid,
    pub operation_id: Uuid,
    pub amount: Decimal,
    pub status: CommissionStatus,
    pub payment_method: Option<String>,
    pub payment_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brokers::Entity",
        from = "Column::BrokerId",
        to = "super::brokers::Column::Id"
    )]
    Brokers,
    #[sea_orm(
        belongs_to = "super::operations::Entity",
        from = "Column::OperationId",
        to = "super::operations::Column::Id"
    )]
    Operations,
}

impl Related<super::brokers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brokers.def()
    }
}

impl Related<super::operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
