//! `SeaORM` Entity for the invoices (facturas) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::InvoiceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub receiver: String,
    pub rfc: Option<String>,
    #[sea_orm(unique)]
    pub folio: String,
    /// CFDI fiscal UUID assigned by the tax authority.
    pub cfdi_uuid: Option<String>,
    pub voucher_type: Option<String>,
    pub status: InvoiceStatus,
    pub issue_date: Date,
    pub payment_method: Option<String>,
    pub payment_form: Option<String>,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
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
    #[sea_orm(has_many = "super::invoice_concepts::Entity")]
    InvoiceConcepts,
    #[sea_orm(has_many = "super::invoice_bank_links::Entity")]
    InvoiceBankLinks,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::invoice_concepts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceConcepts.def()
    }
}

impl Related<super::invoice_bank_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceBankLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
