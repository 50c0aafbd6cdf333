//! `SeaORM` Entity for the banks (bank accounts) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "banks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bank_name: String,
    pub account_number: String,
    /// Mexican interbank CLABE (18 digits).
    pub clabe: Option<String>,
    pub initial_balance: Decimal,
    pub company_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(has_many = "super::bank_movements::Entity")]
    BankMovements,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::bank_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
