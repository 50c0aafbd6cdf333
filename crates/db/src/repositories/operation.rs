//! Operation repository for database operations.
//!
//! Operations are the central record of the system: a client deposit captured
//! under a commission scheme snapshot, with the derived commission cascade and
//! a running balance persisted alongside the raw inputs.

use std::collections::HashMap;

use chrono::NaiveDate;
use corretaje_core::commission::{
    balance_after_returns, base_balance, broker_commission, compute_commissions, CommissionInputs,
};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    broker_commissions, operation_returns, operations, payment_applications,
    sea_orm_active_enums::{CommissionStatus, CostBasis, SchemeType},
};

/// Error types for operation repository operations.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// Operation not found.
    #[error("Operation not found: {0}")]
    NotFound(Uuid),

    /// Version mismatch on a recompute; the caller must re-read and retry.
    #[error("Operation {id} was modified concurrently (expected version {expected})")]
    VersionConflict {
        /// Operation ID.
        id: Uuid,
        /// Version the caller based its request on.
        expected: i64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an operation.
///
/// Scheme and broker fields are snapshotted onto the operation at creation
/// time; later scheme catalog edits never touch existing operations.
#[derive(Debug, Clone)]
pub struct CreateOperationInput {
    /// Client the deposit belongs to.
    pub client_id: Uuid,
    /// Company the operation is billed through.
    pub company_id: Uuid,
    /// Scheme type snapshot.
    pub scheme_type: SchemeType,
    /// Overall retained percentage snapshot.
    pub scheme_percent: Decimal,
    /// Basis the percentages apply to.
    pub cost_basis: CostBasis,
    /// First broker, if any.
    pub broker1_id: Option<Uuid>,
    /// First broker's percentage.
    pub broker1_percent: Option<Decimal>,
    /// Second broker, if any.
    pub broker2_id: Option<Uuid>,
    /// Second broker's percentage.
    pub broker2_percent: Option<Decimal>,
    /// Third broker, if any.
    pub broker3_id: Option<Uuid>,
    /// Third broker's percentage.
    pub broker3_percent: Option<Decimal>,
    /// VAT-inclusive deposit received.
    pub deposit: Option<Decimal>,
    /// VAT-exclusive subtotal.
    pub subtotal: Option<Decimal>,
    /// VAT portion.
    pub vat: Option<Decimal>,
    /// VAT-inclusive total.
    pub total: Option<Decimal>,
    /// Date the deposit was received.
    pub operation_date: NaiveDate,
    /// Folio of the invoice issued for the deposit.
    pub invoice_folio: Option<String>,
    /// Free-form bank reference.
    pub reference: Option<String>,
    /// URL of the uploaded deposit receipt.
    pub receipt_url: Option<String>,
}

/// Input for updating an operation.
///
/// `None` leaves a field untouched; `Some(None)` on a nested option clears a
/// nullable column.
#[derive(Debug, Clone, Default)]
pub struct UpdateOperationInput {
    /// Client the deposit belongs to.
    pub client_id: Option<Uuid>,
    /// Company the operation is billed through.
    pub company_id: Option<Uuid>,
    /// Scheme type snapshot.
    pub scheme_type: Option<SchemeType>,
    /// Overall retained percentage.
    pub scheme_percent: Option<Decimal>,
    /// Basis the percentages apply to.
    pub cost_basis: Option<CostBasis>,
    /// First broker's percentage.
    pub broker1_percent: Option<Option<Decimal>>,
    /// Second broker's percentage.
    pub broker2_percent: Option<Option<Decimal>>,
    /// Third broker's percentage.
    pub broker3_percent: Option<Option<Decimal>>,
    /// VAT-inclusive deposit received.
    pub deposit: Option<Option<Decimal>>,
    /// VAT-exclusive subtotal.
    pub subtotal: Option<Option<Decimal>>,
    /// VAT portion.
    pub vat: Option<Option<Decimal>>,
    /// VAT-inclusive total.
    pub total: Option<Option<Decimal>>,
    /// Date the deposit was received.
    pub operation_date: Option<NaiveDate>,
    /// Folio of the invoice issued for the deposit.
    pub invoice_folio: Option<Option<String>>,
    /// Free-form bank reference.
    pub reference: Option<Option<String>>,
    /// URL of the uploaded deposit receipt.
    pub receipt_url: Option<Option<String>>,
}

impl UpdateOperationInput {
    /// Whether any field entering the commission or balance derivation is
    /// being changed.
    #[must_use]
    pub const fn touches_derived_fields(&self) -> bool {
        self.scheme_percent.is_some()
            || self.cost_basis.is_some()
            || self.broker1_percent.is_some()
            || self.broker2_percent.is_some()
            || self.broker3_percent.is_some()
            || self.deposit.is_some()
            || self.subtotal.is_some()
            || self.total.is_some()
    }
}

/// Payment state of an operation against its applied deposits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Nothing applied yet.
    Unpaid,
    /// Applied amount is positive but below the total.
    Partial,
    /// Applied amount covers the total.
    Paid,
}

/// Classifies an operation's payment state.
///
/// Operations without a total are considered unpaid until something is
/// applied to them.
#[must_use]
pub fn classify_payment(total: Option<Decimal>, applied: Decimal) -> PaymentStatus {
    if applied <= Decimal::ZERO {
        return PaymentStatus::Unpaid;
    }
    match total {
        Some(t) if applied >= t && t > Decimal::ZERO => PaymentStatus::Paid,
        _ => PaymentStatus::Partial,
    }
}

/// Aggregate payment figures for a single operation.
#[derive(Debug, Clone, Copy)]
pub struct PaymentStats {
    /// VAT-inclusive total of the operation, if captured.
    pub total: Option<Decimal>,
    /// Sum of applied bank deposits.
    pub applied: Decimal,
    /// Remaining amount; negative means overpaid.
    pub outstanding: Decimal,
    /// Derived classification.
    pub status: PaymentStatus,
}

#[derive(Debug, FromQueryResult)]
struct AppliedSumRow {
    operation_id: Uuid,
    applied: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct SumRow {
    total: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct MaxNumberRow {
    max_number: Option<i64>,
}

/// Operation repository for CRUD and recompute operations.
#[derive(Debug, Clone)]
pub struct OperationRepository {
    db: DatabaseConnection,
}

impl OperationRepository {
    /// Creates a new operation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an operation, deriving the commission cascade and initial
    /// balance, and snapshots one pending broker commission row per assigned
    /// broker. Everything happens in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub async fn create_operation(
        &self,
        input: CreateOperationInput,
    ) -> Result<operations::Model, OperationError> {
        let txn = self.db.begin().await?;

        let next_number = next_operation_number(&txn).await?;

        let basis: corretaje_core::commission::CostBasis = input.cost_basis.into();
        let breakdown = compute_commissions(&CommissionInputs {
            scheme_percent: Some(input.scheme_percent),
            broker1_percent: input.broker1_percent,
            broker2_percent: input.broker2_percent,
            broker3_percent: input.broker3_percent,
            cost_basis: basis,
            total: input.total,
            subtotal: input.subtotal,
        });
        let balance = base_balance(input.deposit, Some(input.scheme_percent), basis);

        let now = chrono::Utc::now().into();
        let operation = operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            operation_number: Set(next_number),
            client_id: Set(input.client_id),
            company_id: Set(input.company_id),
            scheme_type: Set(input.scheme_type),
            scheme_percent: Set(input.scheme_percent),
            cost_basis: Set(input.cost_basis),
            broker1_id: Set(input.broker1_id),
            broker1_percent: Set(input.broker1_percent),
            broker2_id: Set(input.broker2_id),
            broker2_percent: Set(input.broker2_percent),
            broker3_id: Set(input.broker3_id),
            broker3_percent: Set(input.broker3_percent),
            deposit: Set(input.deposit),
            subtotal: Set(input.subtotal),
            vat: Set(input.vat),
            total: Set(input.total),
            operation_date: Set(input.operation_date),
            invoice_folio: Set(input.invoice_folio),
            reference: Set(input.reference),
            receipt_url: Set(input.receipt_url),
            general_percent: Set(breakdown.general_percent),
            general_amount: Set(breakdown.general_amount),
            savings_fund: Set(breakdown.savings_fund),
            free_savings_fund: Set(breakdown.free_savings_fund),
            partner_share_a: Set(breakdown.partner_share_a),
            partner_share_b: Set(breakdown.partner_share_b),
            balance: Set(balance),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let operation = operation.insert(&txn).await?;

        // One pending commission row per assigned broker, amount frozen at
        // capture time. Zero deposits and zero shares leave no row behind.
        let brokers = [
            (input.broker1_id, input.broker1_percent),
            (input.broker2_id, input.broker2_percent),
            (input.broker3_id, input.broker3_percent),
        ];
        if let Some(deposit) = input.deposit {
            for (broker_id, percent) in brokers {
                let (Some(broker_id), Some(percent)) = (broker_id, percent) else {
                    continue;
                };
                if !earns_commission(deposit, percent) {
                    continue;
                }
                let amount = broker_commission(deposit, input.scheme_percent, percent, basis);
                broker_commissions::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    broker_id: Set(broker_id),
                    operation_id: Set(operation.id),
                    amount: Set(amount),
                    status: Set(CommissionStatus::Pending),
                    payment_method: Set(None),
                    payment_date: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(operation)
    }

    /// Finds an operation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<operations::Model>, DbErr> {
        operations::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists operations, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<operations::Model>, DbErr> {
        operations::Entity::find()
            .order_by_desc(operations::Column::OperationDate)
            .order_by_desc(operations::Column::OperationNumber)
            .all(&self.db)
            .await
    }

    /// Lists operations for a client, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<operations::Model>, DbErr> {
        operations::Entity::find()
            .filter(operations::Column::ClientId.eq(client_id))
            .order_by_desc(operations::Column::OperationDate)
            .all(&self.db)
            .await
    }

    /// Updates an operation. When any field feeding the commission cascade or
    /// the balance changes, both are recomputed from the patched values. The
    /// broker commission rows created at capture time are never resynced.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] if the operation does not exist.
    pub async fn update_operation(
        &self,
        id: Uuid,
        input: UpdateOperationInput,
    ) -> Result<operations::Model, OperationError> {
        let txn = self.db.begin().await?;

        let existing = operations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(OperationError::NotFound(id))?;

        let recompute = input.touches_derived_fields();
        let version = existing.version;
        let mut model: operations::ActiveModel = existing.into();

        if let Some(v) = input.client_id {
            model.client_id = Set(v);
        }
        if let Some(v) = input.company_id {
            model.company_id = Set(v);
        }
        if let Some(v) = input.scheme_type {
            model.scheme_type = Set(v);
        }
        if let Some(v) = input.scheme_percent {
            model.scheme_percent = Set(v);
        }
        if let Some(v) = input.cost_basis {
            model.cost_basis = Set(v);
        }
        if let Some(v) = input.broker1_percent {
            model.broker1_percent = Set(v);
        }
        if let Some(v) = input.broker2_percent {
            model.broker2_percent = Set(v);
        }
        if let Some(v) = input.broker3_percent {
            model.broker3_percent = Set(v);
        }
        if let Some(v) = input.deposit {
            model.deposit = Set(v);
        }
        if let Some(v) = input.subtotal {
            model.subtotal = Set(v);
        }
        if let Some(v) = input.vat {
            model.vat = Set(v);
        }
        if let Some(v) = input.total {
            model.total = Set(v);
        }
        if let Some(v) = input.operation_date {
            model.operation_date = Set(v);
        }
        if let Some(v) = input.invoice_folio {
            model.invoice_folio = Set(v);
        }
        if let Some(v) = input.reference {
            model.reference = Set(v);
        }
        if let Some(v) = input.receipt_url {
            model.receipt_url = Set(v);
        }

        if recompute {
            let scheme_percent = *model.scheme_percent.as_ref();
            let basis: corretaje_core::commission::CostBasis = (*model.cost_basis.as_ref()).into();
            let breakdown = compute_commissions(&CommissionInputs {
                scheme_percent: Some(scheme_percent),
                broker1_percent: *model.broker1_percent.as_ref(),
                broker2_percent: *model.broker2_percent.as_ref(),
                broker3_percent: *model.broker3_percent.as_ref(),
                cost_basis: basis,
                total: *model.total.as_ref(),
                subtotal: *model.subtotal.as_ref(),
            });
            let returned = returns_total(&txn, id).await?;
            let balance = balance_after_returns(
                *model.deposit.as_ref(),
                Some(scheme_percent),
                basis,
                returned,
            );

            model.general_percent = Set(breakdown.general_percent);
            model.general_amount = Set(breakdown.general_amount);
            model.savings_fund = Set(breakdown.savings_fund);
            model.free_savings_fund = Set(breakdown.free_savings_fund);
            model.partner_share_a = Set(breakdown.partner_share_a);
            model.partner_share_b = Set(breakdown.partner_share_b);
            model.balance = Set(balance);
        }

        model.version = Set(version + 1);
        model.updated_at = Set(chrono::Utc::now().into());

        let updated = model.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes an operation; returns, commissions, and payment applications
    /// go with it via cascade.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] if the operation does not exist.
    pub async fn delete_operation(&self, id: Uuid) -> Result<(), OperationError> {
        let result = operations::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(OperationError::NotFound(id));
        }
        Ok(())
    }

    /// Recomputes the persisted balance from the stored deposit, scheme
    /// percentage, and the sum of recorded returns.
    ///
    /// The write is guarded by `expected_version`; a concurrent modification
    /// surfaces as [`OperationError::VersionConflict`].
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] or [`OperationError::VersionConflict`].
    pub async fn recalculate_balance(
        &self,
        id: Uuid,
        expected_version: i64,
    ) -> Result<operations::Model, OperationError> {
        let operation = self
            .find_by_id(id)
            .await?
            .ok_or(OperationError::NotFound(id))?;

        let basis: corretaje_core::commission::CostBasis = operation.cost_basis.into();
        let returned = returns_total(&self.db, id).await?;
        let balance = balance_after_returns(
            operation.deposit,
            Some(operation.scheme_percent),
            basis,
            returned,
        );

        self.guarded_write(id, expected_version, move |update| {
            update.col_expr(operations::Column::Balance, Expr::value(balance))
        })
        .await
    }

    /// Recomputes the persisted commission cascade from the stored inputs.
    ///
    /// Idempotent: re-running against unchanged inputs writes identical
    /// values. Guarded by `expected_version` like
    /// [`Self::recalculate_balance`].
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] or [`OperationError::VersionConflict`].
    pub async fn recalculate_commissions(
        &self,
        id: Uuid,
        expected_version: i64,
    ) -> Result<operations::Model, OperationError> {
        let operation = self
            .find_by_id(id)
            .await?
            .ok_or(OperationError::NotFound(id))?;

        let basis: corretaje_core::commission::CostBasis = operation.cost_basis.into();
        let breakdown = compute_commissions(&CommissionInputs {
            scheme_percent: Some(operation.scheme_percent),
            broker1_percent: operation.broker1_percent,
            broker2_percent: operation.broker2_percent,
            broker3_percent: operation.broker3_percent,
            cost_basis: basis,
            total: operation.total,
            subtotal: operation.subtotal,
        });

        self.guarded_write(id, expected_version, move |update| {
            update
                .col_expr(
                    operations::Column::GeneralPercent,
                    Expr::value(breakdown.general_percent),
                )
                .col_expr(
                    operations::Column::GeneralAmount,
                    Expr::value(breakdown.general_amount),
                )
                .col_expr(
                    operations::Column::SavingsFund,
                    Expr::value(breakdown.savings_fund),
                )
                .col_expr(
                    operations::Column::FreeSavingsFund,
                    Expr::value(breakdown.free_savings_fund),
                )
                .col_expr(
                    operations::Column::PartnerShareA,
                    Expr::value(breakdown.partner_share_a),
                )
                .col_expr(
                    operations::Column::PartnerShareB,
                    Expr::value(breakdown.partner_share_b),
                )
        })
        .await
    }

    /// Aggregate payment figures for one operation.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotFound`] if the operation does not exist.
    pub async fn payment_stats(&self, id: Uuid) -> Result<PaymentStats, OperationError> {
        let operation = self
            .find_by_id(id)
            .await?
            .ok_or(OperationError::NotFound(id))?;

        let applied = payment_applications::Entity::find()
            .select_only()
            .column_as(
                Expr::col(payment_applications::Column::AmountApplied).sum(),
                "total",
            )
            .filter(payment_applications::Column::OperationId.eq(id))
            .into_model::<SumRow>()
            .one(&self.db)
            .await?
            .and_then(|row| row.total)
            .unwrap_or(Decimal::ZERO);

        let total = operation.total;
        let outstanding = total.unwrap_or(Decimal::ZERO) - applied;
        Ok(PaymentStats {
            total,
            applied,
            outstanding,
            status: classify_payment(total, applied),
        })
    }

    /// Lists operations in a given payment state.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_payment_status(
        &self,
        status: PaymentStatus,
    ) -> Result<Vec<operations::Model>, DbErr> {
        let operations = self.list().await?;
        let applied = self.applied_totals().await?;

        Ok(operations
            .into_iter()
            .filter(|op| {
                let paid = applied.get(&op.id).copied().unwrap_or(Decimal::ZERO);
                classify_payment(op.total, paid) == status
            })
            .collect())
    }

    /// Sum of applied payments grouped by operation.
    async fn applied_totals(&self) -> Result<HashMap<Uuid, Decimal>, DbErr> {
        let rows = payment_applications::Entity::find()
            .select_only()
            .column(payment_applications::Column::OperationId)
            .column_as(
                Expr::col(payment_applications::Column::AmountApplied).sum(),
                "applied",
            )
            .group_by(payment_applications::Column::OperationId)
            .into_model::<AppliedSumRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.operation_id, row.applied.unwrap_or(Decimal::ZERO)))
            .collect())
    }

    /// Runs an `update_many` against one row at one version, bumping the
    /// version, and maps an empty match to `NotFound` or `VersionConflict`.
    async fn guarded_write<F>(
        &self,
        id: Uuid,
        expected_version: i64,
        apply: F,
    ) -> Result<operations::Model, OperationError>
    where
        F: FnOnce(
            sea_orm::UpdateMany<operations::Entity>,
        ) -> sea_orm::UpdateMany<operations::Entity>,
    {
        let update = apply(operations::Entity::update_many())
            .col_expr(
                operations::Column::Version,
                Expr::col(operations::Column::Version).add(1),
            )
            .col_expr(
                operations::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(operations::Column::Id.eq(id))
            .filter(operations::Column::Version.eq(expected_version));

        let result = update.exec(&self.db).await?;
        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                None => Err(OperationError::NotFound(id)),
                Some(_) => Err(OperationError::VersionConflict {
                    id,
                    expected: expected_version,
                }),
            };
        }

        self.find_by_id(id)
            .await?
            .ok_or(OperationError::NotFound(id))
    }
}

/// Sum of returns recorded against an operation.
pub(crate) async fn returns_total<C: ConnectionTrait>(
    conn: &C,
    operation_id: Uuid,
) -> Result<Decimal, DbErr> {
    let row = operation_returns::Entity::find()
        .select_only()
        .column_as(Expr::col(operation_returns::Column::AmountPaid).sum(), "total")
        .filter(operation_returns::Column::OperationId.eq(operation_id))
        .into_model::<SumRow>()
        .one(conn)
        .await?;

    Ok(row.and_then(|r| r.total).unwrap_or(Decimal::ZERO))
}

/// A broker commission snapshot is only due when money actually moved and
/// the broker holds a positive share.
fn earns_commission(deposit: Decimal, percent: Decimal) -> bool {
    deposit > Decimal::ZERO && percent > Decimal::ZERO
}

/// Next sequential operation number.
async fn next_operation_number<C: ConnectionTrait>(conn: &C) -> Result<i64, DbErr> {
    let row = operations::Entity::find()
        .select_only()
        .column_as(Expr::col(operations::Column::OperationNumber).max(), "max_number")
        .into_model::<MaxNumberRow>()
        .one(conn)
        .await?;

    Ok(row.and_then(|r| r.max_number).unwrap_or(0) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn classify_nothing_applied_is_unpaid() {
        assert_eq!(
            classify_payment(Some(dec!(1000)), Decimal::ZERO),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn classify_partial_application() {
        assert_eq!(
            classify_payment(Some(dec!(1000)), dec!(400)),
            PaymentStatus::Partial
        );
    }

    #[test]
    fn classify_exact_and_overpayment_are_paid() {
        assert_eq!(
            classify_payment(Some(dec!(1000)), dec!(1000)),
            PaymentStatus::Paid
        );
        assert_eq!(
            classify_payment(Some(dec!(1000)), dec!(1200)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn classify_without_total_never_reaches_paid() {
        assert_eq!(classify_payment(None, dec!(500)), PaymentStatus::Partial);
        assert_eq!(classify_payment(None, Decimal::ZERO), PaymentStatus::Unpaid);
    }

    #[test]
    fn zero_deposit_earns_no_commission_snapshot() {
        assert!(!earns_commission(Decimal::ZERO, dec!(10)));
    }

    #[test]
    fn zero_broker_share_earns_no_commission_snapshot() {
        assert!(!earns_commission(dec!(1000), Decimal::ZERO));
    }

    #[test]
    fn positive_deposit_and_share_earn_a_snapshot() {
        assert!(earns_commission(dec!(1000), dec!(10)));
    }

    #[test]
    fn derived_field_detection() {
        let input = UpdateOperationInput {
            reference: Some(Some("SPEI 123".to_owned())),
            ..Default::default()
        };
        assert!(!input.touches_derived_fields());

        let input = UpdateOperationInput {
            deposit: Some(Some(dec!(5000))),
            ..Default::default()
        };
        assert!(input.touches_derived_fields());
    }
}
