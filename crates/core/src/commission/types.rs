//! Types for the commission calculation cascade.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Factor that backs a fixed 16% VAT out of a VAT-inclusive amount.
///
/// This is a policy fact of the domain (Mexican VAT), kept as a named
/// constant so a future multi-jurisdiction requirement has one place to
/// parameterize.
pub const VAT_FACTOR: Decimal = Decimal::from_parts(116, 0, 0, false, 2);

/// Share of the general commission carved out into the savings fund.
pub const SAVINGS_FUND_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Whether commission percentages apply to the VAT-inclusive total or the
/// VAT-exclusive subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CostBasis {
    /// Percentages apply to the VAT-inclusive total.
    Total,
    /// Percentages apply to the VAT-exclusive subtotal; VAT-inclusive
    /// amounts are first divided by [`VAT_FACTOR`].
    Subtotal,
}

impl std::fmt::Display for CostBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Total => write!(f, "TOTAL"),
            Self::Subtotal => write!(f, "SUBTOTAL"),
        }
    }
}

impl std::str::FromStr for CostBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TOTAL" => Ok(Self::Total),
            "SUBTOTAL" => Ok(Self::Subtotal),
            _ => Err(format!("Unknown cost basis: {s}")),
        }
    }
}

/// Inputs to the general-commission cascade.
///
/// Absent percentages and amounts are treated as zero; the calculator never
/// rejects inputs, it clamps (see [`super::compute_commissions`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct CommissionInputs {
    /// Overall percentage of the deposit retained under the scheme.
    pub scheme_percent: Option<Decimal>,
    /// Sub-share allocated to the first broker.
    pub broker1_percent: Option<Decimal>,
    /// Sub-share allocated to the second broker.
    pub broker2_percent: Option<Decimal>,
    /// Sub-share allocated to the third broker.
    pub broker3_percent: Option<Decimal>,
    /// Cost basis the general commission is computed against.
    pub cost_basis: CostBasis,
    /// VAT-inclusive total of the operation.
    pub total: Option<Decimal>,
    /// VAT-exclusive subtotal of the operation.
    pub subtotal: Option<Decimal>,
}

impl Default for CostBasis {
    fn default() -> Self {
        // Matches the creation default applied when no basis is supplied.
        Self::Subtotal
    }
}

/// Derived commission fields for an operation.
///
/// Every field is clamped to be non-negative independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    /// Residual percentage after broker shares: scheme − Σ broker, floored at 0.
    pub general_percent: Decimal,
    /// General commission amount against the selected cost basis.
    pub general_amount: Decimal,
    /// 10% carve-out of the general commission.
    pub savings_fund: Decimal,
    /// Remaining 90% of the general commission.
    pub free_savings_fund: Decimal,
    /// First partner's equal share of the free savings fund.
    pub partner_share_a: Decimal,
    /// Second partner's equal share of the free savings fund.
    pub partner_share_b: Decimal,
}

impl CommissionBreakdown {
    /// A breakdown with every field at zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            general_percent: Decimal::ZERO,
            general_amount: Decimal::ZERO,
            savings_fund: Decimal::ZERO,
            free_savings_fund: Decimal::ZERO,
            partner_share_a: Decimal::ZERO,
            partner_share_b: Decimal::ZERO,
        }
    }
}
