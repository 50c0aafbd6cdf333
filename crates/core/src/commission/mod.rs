//! Commission cascade and balance derivation for brokerage operations.
//!
//! An operation retains a percentage of the client's deposit under a pricing
//! scheme. Up to three brokers take a sub-share of that percentage; the
//! residual is the general commission, which is further split into a savings
//! fund (10%) and a free savings fund (90%) divided equally between two
//! internal partners. The operation's running balance is the retained base
//! minus the returns registered against it.
//!
//! Everything in this module is pure arithmetic over `Decimal`; persistence
//! of the derived fields lives in the `db` crate.

pub mod calculator;
pub mod types;

#[cfg(test)]
mod tests;

pub use calculator::{balance_after_returns, base_balance, broker_commission, compute_commissions};
pub use types::{CommissionBreakdown, CommissionInputs, CostBasis, SAVINGS_FUND_RATE, VAT_FACTOR};
