//! Pure calculation functions for commissions and balances.
//!
//! All functions here are total: malformed or absent numeric input yields
//! zero or a clamped value, never an error. Input validation belongs to the
//! surrounding create/update handlers.

use rust_decimal::Decimal;

use super::types::{CommissionBreakdown, CommissionInputs, CostBasis, SAVINGS_FUND_RATE, VAT_FACTOR};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Base amount the operation retains before returns are subtracted.
///
/// Returns zero when the deposit or the scheme percentage is absent or zero.
/// For `Subtotal` the deposit is first divided by [`VAT_FACTOR`] to obtain a
/// VAT-exclusive base.
#[must_use]
pub fn base_balance(
    deposit: Option<Decimal>,
    scheme_percent: Option<Decimal>,
    cost_basis: CostBasis,
) -> Decimal {
    let (Some(deposit), Some(scheme_percent)) = (deposit, scheme_percent) else {
        return Decimal::ZERO;
    };
    if deposit.is_zero() || scheme_percent.is_zero() {
        return Decimal::ZERO;
    }

    let retained = Decimal::ONE - scheme_percent / ONE_HUNDRED;
    match cost_basis {
        CostBasis::Total => deposit * retained,
        CostBasis::Subtotal => (deposit / VAT_FACTOR) * retained,
    }
}

/// Running balance of an operation: the retained base minus the total of
/// registered returns.
///
/// Unlike [`base_balance`] the result may go negative when the returns
/// exceed the retained base; over-repayment is a visible state, not an
/// error.
#[must_use]
pub fn balance_after_returns(
    deposit: Option<Decimal>,
    scheme_percent: Option<Decimal>,
    cost_basis: CostBasis,
    returns_total: Decimal,
) -> Decimal {
    base_balance(deposit, scheme_percent, cost_basis) - returns_total
}

/// Commission owed to a single broker for an operation.
///
/// `deposit × (scheme/100) × (broker/100)`, against the VAT-exclusive
/// deposit when the cost basis is `Subtotal`.
#[must_use]
pub fn broker_commission(
    deposit: Decimal,
    scheme_percent: Decimal,
    broker_percent: Decimal,
    cost_basis: CostBasis,
) -> Decimal {
    let base = match cost_basis {
        CostBasis::Total => deposit,
        CostBasis::Subtotal => deposit / VAT_FACTOR,
    };
    base * (scheme_percent / ONE_HUNDRED) * (broker_percent / ONE_HUNDRED)
}

/// Runs the general-commission cascade.
///
/// Sequential derivation, each step from the prior:
/// 1. general percent = scheme − Σ broker percents, floored at 0
/// 2. general amount = general percent applied to total or subtotal
/// 3. savings fund = 10% of general amount
/// 4. free savings fund = the remaining 90%
/// 5. two equal partner shares of the free savings fund
///
/// Every output is clamped to ≥ 0 independently, so an intermediate negative
/// percentage cannot propagate through an otherwise positive base. The
/// function is pure and idempotent, which makes the persisted recompute
/// operation safe to re-run.
#[must_use]
pub fn compute_commissions(inputs: &CommissionInputs) -> CommissionBreakdown {
    let scheme = inputs.scheme_percent.unwrap_or(Decimal::ZERO);
    let brokers = inputs.broker1_percent.unwrap_or(Decimal::ZERO)
        + inputs.broker2_percent.unwrap_or(Decimal::ZERO)
        + inputs.broker3_percent.unwrap_or(Decimal::ZERO);

    let general_percent = (scheme - brokers).max(Decimal::ZERO);

    let base = match inputs.cost_basis {
        CostBasis::Total => inputs.total,
        CostBasis::Subtotal => inputs.subtotal,
    };
    let general_amount = base
        .map(|b| (general_percent / ONE_HUNDRED) * b)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);

    let savings_fund = (general_amount * SAVINGS_FUND_RATE).max(Decimal::ZERO);
    let free_savings_fund = (general_amount - savings_fund).max(Decimal::ZERO);
    let partner_share = (free_savings_fund / Decimal::TWO).max(Decimal::ZERO);

    CommissionBreakdown {
        general_percent,
        general_amount,
        savings_fund,
        free_savings_fund,
        partner_share_a: partner_share,
        partner_share_b: partner_share,
    }
}
