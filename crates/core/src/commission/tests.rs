//! Tests for the commission cascade and balance calculators.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calculator::{
    balance_after_returns, base_balance, broker_commission, compute_commissions,
};
use super::types::{CommissionInputs, CostBasis};

// ============================================================================
// base_balance
// ============================================================================

#[test]
fn test_base_balance_total() {
    // 1000 deposit, 20% retained by the scheme -> 800 stays on the balance
    let result = base_balance(Some(dec!(1000)), Some(dec!(20)), CostBasis::Total);
    assert_eq!(result, dec!(800.00));
}

#[test]
fn test_base_balance_subtotal_backs_out_vat() {
    // 1160 VAT-inclusive -> 1000 net, then 20% retained -> 800
    let result = base_balance(Some(dec!(1160)), Some(dec!(20)), CostBasis::Subtotal);
    assert_eq!(result, dec!(800.00));
}

#[test]
fn test_base_balance_absent_inputs() {
    assert_eq!(
        base_balance(None, Some(dec!(20)), CostBasis::Total),
        Decimal::ZERO
    );
    assert_eq!(
        base_balance(Some(dec!(1000)), None, CostBasis::Total),
        Decimal::ZERO
    );
    assert_eq!(
        base_balance(Some(dec!(0)), Some(dec!(20)), CostBasis::Subtotal),
        Decimal::ZERO
    );
    assert_eq!(
        base_balance(Some(dec!(1000)), Some(dec!(0)), CostBasis::Subtotal),
        Decimal::ZERO
    );
}

// ============================================================================
// balance_after_returns
// ============================================================================

#[test]
fn test_balance_after_returns() {
    // 1000 deposit, 20% retained -> 800 base; two returns of 100 and 50
    let result = balance_after_returns(
        Some(dec!(1000)),
        Some(dec!(20)),
        CostBasis::Total,
        dec!(100) + dec!(50),
    );
    assert_eq!(result, dec!(650.00));
}

#[test]
fn test_balance_goes_negative_on_over_repayment() {
    let result =
        balance_after_returns(Some(dec!(1000)), Some(dec!(20)), CostBasis::Total, dec!(900));
    assert_eq!(result, dec!(-100.00));
}

#[test]
fn test_balance_without_returns_is_the_base() {
    let result = balance_after_returns(
        Some(dec!(1160)),
        Some(dec!(20)),
        CostBasis::Subtotal,
        Decimal::ZERO,
    );
    assert_eq!(result, base_balance(Some(dec!(1160)), Some(dec!(20)), CostBasis::Subtotal));
}

// ============================================================================
// broker_commission
// ============================================================================

#[test]
fn test_broker_commission_total() {
    let result = broker_commission(dec!(1000), dec!(20), dec!(10), CostBasis::Total);
    assert_eq!(result, dec!(20.00));
}

#[test]
fn test_broker_commission_subtotal() {
    // 1160 / 1.16 = 1000, then 20% x 10%
    let result = broker_commission(dec!(1160), dec!(20), dec!(10), CostBasis::Subtotal);
    assert_eq!(result, dec!(20.00));
}

// ============================================================================
// compute_commissions cascade
// ============================================================================

fn inputs(
    scheme: Decimal,
    b1: Decimal,
    b2: Decimal,
    b3: Decimal,
    cost_basis: CostBasis,
    total: Decimal,
    subtotal: Decimal,
) -> CommissionInputs {
    CommissionInputs {
        scheme_percent: Some(scheme),
        broker1_percent: Some(b1),
        broker2_percent: Some(b2),
        broker3_percent: Some(b3),
        cost_basis,
        total: Some(total),
        subtotal: Some(subtotal),
    }
}

#[test]
fn test_cascade_example() {
    let breakdown = compute_commissions(&inputs(
        dec!(30),
        dec!(10),
        dec!(5),
        dec!(0),
        CostBasis::Total,
        dec!(1000),
        dec!(862.07),
    ));

    assert_eq!(breakdown.general_percent, dec!(15));
    assert_eq!(breakdown.general_amount, dec!(150.00));
    assert_eq!(breakdown.savings_fund, dec!(15.000));
    assert_eq!(breakdown.free_savings_fund, dec!(135.000));
    assert_eq!(breakdown.partner_share_a, dec!(67.500));
    assert_eq!(breakdown.partner_share_b, dec!(67.500));
}

#[test]
fn test_cascade_subtotal_basis() {
    let breakdown = compute_commissions(&inputs(
        dec!(30),
        dec!(10),
        dec!(5),
        dec!(0),
        CostBasis::Subtotal,
        dec!(1000),
        dec!(800),
    ));

    assert_eq!(breakdown.general_percent, dec!(15));
    assert_eq!(breakdown.general_amount, dec!(120.00));
}

#[test]
fn test_cascade_absent_base_yields_zero_amounts() {
    let mut i = inputs(
        dec!(30),
        dec!(0),
        dec!(0),
        dec!(0),
        CostBasis::Total,
        dec!(1000),
        dec!(800),
    );
    i.total = None;

    let breakdown = compute_commissions(&i);
    assert_eq!(breakdown.general_percent, dec!(30));
    assert_eq!(breakdown.general_amount, Decimal::ZERO);
    assert_eq!(breakdown.savings_fund, Decimal::ZERO);
    assert_eq!(breakdown.free_savings_fund, Decimal::ZERO);
    assert_eq!(breakdown.partner_share_a, Decimal::ZERO);
}

#[test]
fn test_cascade_clamps_oversubscribed_brokers() {
    // Broker shares exceed the scheme percentage: everything floors at zero,
    // regardless of how large the total is.
    let breakdown = compute_commissions(&inputs(
        dec!(10),
        dec!(8),
        dec!(8),
        dec!(8),
        CostBasis::Total,
        dec!(1_000_000),
        dec!(862_068.97),
    ));

    assert_eq!(breakdown.general_percent, Decimal::ZERO);
    assert_eq!(breakdown.general_amount, Decimal::ZERO);
    assert_eq!(breakdown.savings_fund, Decimal::ZERO);
    assert_eq!(breakdown.free_savings_fund, Decimal::ZERO);
    assert_eq!(breakdown.partner_share_a, Decimal::ZERO);
    assert_eq!(breakdown.partner_share_b, Decimal::ZERO);
}

#[test]
fn test_cascade_idempotent() {
    let i = inputs(
        dec!(25),
        dec!(5),
        dec!(3),
        dec!(2),
        CostBasis::Subtotal,
        dec!(11600),
        dec!(10000),
    );

    let first = compute_commissions(&i);
    let second = compute_commissions(&i);
    assert_eq!(first, second);
}

#[test]
fn test_cascade_absent_broker_percents_treated_as_zero() {
    let i = CommissionInputs {
        scheme_percent: Some(dec!(20)),
        cost_basis: CostBasis::Total,
        total: Some(dec!(500)),
        ..CommissionInputs::default()
    };

    let breakdown = compute_commissions(&i);
    assert_eq!(breakdown.general_percent, dec!(20));
    assert_eq!(breakdown.general_amount, dec!(100.00));
}

// ============================================================================
// Properties
// ============================================================================

/// Strategy for percentages in [0, 100] with two decimal places.
fn percent_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for non-negative amounts with two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn cost_basis_strategy() -> impl Strategy<Value = CostBasis> {
    prop_oneof![Just(CostBasis::Total), Just(CostBasis::Subtotal)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any deposit >= 0 and scheme percent in [0, 100], the base balance
    /// is non-negative.
    #[test]
    fn prop_base_balance_non_negative(
        deposit in amount_strategy(),
        scheme in percent_strategy(),
        basis in cost_basis_strategy(),
    ) {
        let result = base_balance(Some(deposit), Some(scheme), basis);
        prop_assert!(result >= Decimal::ZERO);
    }

    /// Every field of the cascade output is non-negative, whatever the
    /// combination of percentages.
    #[test]
    fn prop_cascade_outputs_non_negative(
        scheme in percent_strategy(),
        b1 in percent_strategy(),
        b2 in percent_strategy(),
        b3 in percent_strategy(),
        basis in cost_basis_strategy(),
        total in amount_strategy(),
        subtotal in amount_strategy(),
    ) {
        let breakdown = compute_commissions(&inputs(scheme, b1, b2, b3, basis, total, subtotal));

        prop_assert!(breakdown.general_percent >= Decimal::ZERO);
        prop_assert!(breakdown.general_amount >= Decimal::ZERO);
        prop_assert!(breakdown.savings_fund >= Decimal::ZERO);
        prop_assert!(breakdown.free_savings_fund >= Decimal::ZERO);
        prop_assert!(breakdown.partner_share_a >= Decimal::ZERO);
        prop_assert!(breakdown.partner_share_b >= Decimal::ZERO);
    }

    /// Increasing a single broker percentage never increases the general
    /// commission amount.
    #[test]
    fn prop_broker_increase_never_raises_general_amount(
        scheme in percent_strategy(),
        b1 in percent_strategy(),
        b2 in percent_strategy(),
        b3 in percent_strategy(),
        bump in (1i64..=2_000i64).prop_map(|n| Decimal::new(n, 2)),
        basis in cost_basis_strategy(),
        total in amount_strategy(),
        subtotal in amount_strategy(),
    ) {
        let before = compute_commissions(&inputs(scheme, b1, b2, b3, basis, total, subtotal));
        let after = compute_commissions(&inputs(scheme, b1 + bump, b2, b3, basis, total, subtotal));

        prop_assert!(after.general_amount <= before.general_amount);
    }

    /// The savings fund and free savings fund always recompose the general
    /// amount, and the partner shares recompose the free savings fund.
    #[test]
    fn prop_cascade_splits_recompose(
        scheme in percent_strategy(),
        b1 in percent_strategy(),
        b2 in percent_strategy(),
        b3 in percent_strategy(),
        basis in cost_basis_strategy(),
        total in amount_strategy(),
        subtotal in amount_strategy(),
    ) {
        let b = compute_commissions(&inputs(scheme, b1, b2, b3, basis, total, subtotal));

        prop_assert_eq!(b.savings_fund + b.free_savings_fund, b.general_amount);
        prop_assert_eq!(b.partner_share_a + b.partner_share_b, b.free_savings_fund);
        prop_assert_eq!(b.partner_share_a, b.partner_share_b);
    }
}
