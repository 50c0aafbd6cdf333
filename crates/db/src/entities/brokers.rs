//! `SeaORM` Entity for the brokers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "brokers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::broker_commissions::Entity")]
    BrokerCommissions,
}

impl Related<super::broker_commissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BrokerCommissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
