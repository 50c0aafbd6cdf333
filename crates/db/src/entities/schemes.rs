//! `SeaORM` Entity for the schemes table.
//!
//! A scheme is a pricing template: the retained percentage, the cost basis
//! and the default broker split copied onto new operations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CostBasis, SchemeType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "schemes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub scheme_type: SchemeType,
    pub scheme_percent: Decimal,
    pub cost_basis: CostBasis,
    pub broker1_id: Option<Uuid>,
    pub broker1_percent: Option<Decimal>,
    pub broker2_id: Option<Uuid>,
    pub broker2_percent: Option<Decimal>,
    pub broker3_id: Option<Uuid>,
    pub broker3_percent: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
