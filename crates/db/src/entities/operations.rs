//! `SeaORM` Entity for the operations table.
//!
//! The central record of a brokered deal. Besides the captured inputs it
//! carries the derived commission fields and the running balance, plus a
//! `version` column used for optimistic concurrency on recompute.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CostBasis, SchemeType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub operation_number: i64,
    pub client_id: Uuid,
    pub company_id: Uuid,
    pub scheme_type: SchemeType,
    pub scheme_percent: Decimal,
    pub broker1_id: Option<Uuid>,
    pub broker1_percent: Option<Decimal>,
    pub broker2_id: Option<Uuid>,
    pub broker2_percent: Option<Decimal>,
    pub broker3_id: Option<Uuid>,
    pub broker3_percent: Option<Decimal>,
    pub deposit: Option<Decimal>,
    pub operation_date: Date,
    pub invoice_folio: Option<String>,
    pub reference: Option<String>,
    pub cost_basis: CostBasis,
    pub subtotal: Option<Decimal>,
    pub vat: Option<Decimal>,
    pub total: Option<Decimal>,
    pub receipt_url: Option<String>,
    // Derived commission cascade
    pub general_percent: Decimal,
    pub general_amount: Decimal,
    pub savings_fund: Decimal,
    pub free_savings_fund: Decimal,
    pub partner_share_a: Decimal,
    pub partner_share_b: Decimal,
    /// Retained base minus registered returns; may go negative on
    /// over-payment.
    pub balance: Decimal,
    /// Optimistic concurrency version, bumped on every recompute write.
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(has_many = "super::operation_returns::Entity")]
    OperationReturns,
    #[sea_orm(has_many = "super::broker_commissions::Entity")]
    BrokerCommissions,
    #[sea_orm(has_many = "super::payment_applications::Entity")]
    PaymentApplications,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::operation_returns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperationReturns.def()
    }
}

impl Related<super::broker_commissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BrokerCommissions.def()
    }
}

impl Related<super::payment_applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentApplications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
