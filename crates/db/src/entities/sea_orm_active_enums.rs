//! Database enum types shared by the entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cost basis commission percentages are applied against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cost_basis")]
#[serde(rename_all = "UPPERCASE")]
pub enum CostBasis {
    /// VAT-inclusive total.
    #[sea_orm(string_value = "TOTAL")]
    Total,
    /// VAT-exclusive subtotal.
    #[sea_orm(string_value = "SUBTOTAL")]
    Subtotal,
}

impl From<CostBasis> for corretaje_core::commission::CostBasis {
    fn from(value: CostBasis) -> Self {
        match value {
            CostBasis::Total => Self::Total,
            CostBasis::Subtotal => Self::Subtotal,
        }
    }
}

/// Pricing scheme type for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "scheme_type")]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemeType {
    /// Invoice-backed scheme.
    #[sea_orm(string_value = "FACTURA")]
    Factura,
    /// Union scheme.
    #[sea_orm(string_value = "SINDICATO")]
    Sindicato,
    /// SAPI scheme.
    #[sea_orm(string_value = "SAPI")]
    Sapi,
    /// C909 scheme.
    #[sea_orm(string_value = "C909")]
    C909,
    /// Banking scheme.
    #[sea_orm(string_value = "BANCARIZACION")]
    Bancarizacion,
    /// Accounting scheme.
    #[sea_orm(string_value = "CONTABILIDAD")]
    Contabilidad,
}

/// Payment status of a broker commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "commission_status")]
#[serde(rename_all = "UPPERCASE")]
pub enum CommissionStatus {
    /// Not yet paid out.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Paid out to the broker.
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Cancelled; never paid.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    /// Issued, awaiting payment.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Fully paid.
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Cancelled.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Role of a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including user management.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Day-to-day capture and edits.
    #[sea_orm(string_value = "operator")]
    Operator,
}

impl UserRole {
    /// String form used inside JWT claims.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
        }
    }
}
