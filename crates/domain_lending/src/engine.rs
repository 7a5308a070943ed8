//! Cash-flow projection orchestration
//!
//! [`CashflowEngine`] ties the pieces together: it builds the existing
//! receivables map (from the ledger or from manual entries), then either
//! combines it with one hypothetical loan or runs the rolling simulator,
//! and attaches the matching statistics. It performs no I/O and never fails.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::frequency::ScheduleConventions;
use crate::loan::LoanTerms;
use crate::ports::ScheduledPayment;
use crate::projection::{combine, effective_horizon, ProjectionRow};
use crate::receivables::{aggregate, expand_recurring, MonthlyReceivables};
use crate::request::ValidatedRequest;
use crate::rolling::simulate;
use crate::schedule::{generate_installments, Installment};
use crate::statistics::{ProjectionStatistics, RollingStatistics, SingleLoanStatistics};

/// Where the existing receivables came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivablesSource {
    /// User-declared one-off and recurring entries
    Manual,
    /// Unpaid ledger payments
    Scheduled,
}

impl fmt::Display for ReceivablesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceivablesSource::Manual => f.write_str("manual"),
            ReceivablesSource::Scheduled => f.write_str("scheduled"),
        }
    }
}

/// Full result of one projection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashflowProjection {
    pub existing_receivables: MonthlyReceivables,
    /// The hypothetical loan's installments, or every simulated loan's in rolling mode
    pub potential_installments: Vec<Installment>,
    pub rows: Vec<ProjectionRow>,
    pub terms: LoanTerms,
    pub rolling: bool,
    pub horizon_months: u32,
    pub use_manual: bool,
    pub source: ReceivablesSource,
    pub statistics: ProjectionStatistics,
}

/// Pure projection engine
#[derive(Debug, Clone, Copy, Default)]
pub struct CashflowEngine {
    conventions: ScheduleConventions,
}

impl CashflowEngine {
    pub fn new(conventions: ScheduleConventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> ScheduleConventions {
        self.conventions
    }

    /// Builds the existing receivables map for a request
    ///
    /// In manual mode the ledger payments are ignored; recurring rules are
    /// expanded over the effective horizon. Otherwise only unpaid payments
    /// due on or after `today` count.
    pub fn existing_receivables(
        &self,
        request: &ValidatedRequest,
        ledger_payments: &[ScheduledPayment],
        today: NaiveDate,
    ) -> (MonthlyReceivables, ReceivablesSource) {
        let currency = request.currency();

        if request.use_manual {
            let horizon = effective_horizon(request.horizon_months);
            let mut map = aggregate(currency, &request.manual_receivables);
            map.extend(&expand_recurring(&request.recurring_receivables, horizon));
            (map, ReceivablesSource::Manual)
        } else {
            let map = aggregate(
                currency,
                ledger_payments
                    .iter()
                    .filter(|p| !p.is_paid && p.due_date >= today),
            );
            (map, ReceivablesSource::Scheduled)
        }
    }

    /// Runs a projection anchored at `today`
    pub fn project(
        &self,
        request: &ValidatedRequest,
        ledger_payments: &[ScheduledPayment],
        today: NaiveDate,
    ) -> CashflowProjection {
        let horizon = effective_horizon(request.horizon_months);
        let (existing, source) = self.existing_receivables(request, ledger_payments, today);

        let (potential_installments, rows, statistics) = if request.rolling {
            let result = simulate(&existing, request.terms, self.conventions, horizon, today);
            let stats = RollingStatistics::compute(&request.terms, &result, horizon);
            info!(
                horizon,
                loans_issued = stats.total_new_loans,
                final_capital = %stats.final_capital.amount(),
                source = %source,
                "Rolling projection complete"
            );
            (
                result.all_issued_installments,
                result.projection,
                ProjectionStatistics::Rolling(stats),
            )
        } else {
            let installments = generate_installments(&request.terms, today, &self.conventions);
            let rows = combine(&existing, &installments, horizon, today);
            let stats = SingleLoanStatistics::compute(&request.terms, &installments, horizon);
            info!(
                horizon,
                installments = installments.len(),
                total_interest = %stats.total_interest.amount(),
                source = %source,
                "Single-loan projection complete"
            );
            (installments, rows, ProjectionStatistics::SingleLoan(stats))
        };

        CashflowProjection {
            existing_receivables: existing,
            potential_installments,
            rows,
            terms: request.terms,
            rolling: request.rolling,
            horizon_months: horizon,
            use_manual: request.use_manual,
            source,
            statistics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receivables::ManualReceivable;
    use crate::request::CashflowRequest;
    use core_kernel::{Currency, LoanId, Money, PaymentId};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(due: NaiveDate, amount: Money, paid: bool) -> ScheduledPayment {
        ScheduledPayment {
            payment_id: PaymentId::new(),
            loan_id: LoanId::new(),
            due_date: due,
            amount,
            is_paid: paid,
        }
    }

    #[test]
    fn test_scheduled_source_filters_paid_and_past() {
        let engine = CashflowEngine::default();
        let request = CashflowRequest::new().normalize(Currency::USD);
        let usd = |a| Money::new(a, Currency::USD);
        let payments = vec![
            payment(date(2025, 2, 28), usd(dec!(1000)), false),
            payment(date(2025, 2, 28), usd(dec!(500)), true),
            payment(date(2024, 12, 31), usd(dec!(700)), false),
        ];

        let (map, source) = engine.existing_receivables(&request, &payments, date(2025, 1, 10));
        assert_eq!(source, ReceivablesSource::Scheduled);
        assert_eq!(map.len(), 1);
        assert_eq!(map.total().amount(), dec!(1000));
    }

    #[test]
    fn test_manual_source_ignores_ledger() {
        let engine = CashflowEngine::default();
        let mut request = CashflowRequest::new().normalize(Currency::USD);
        request.use_manual = true;
        request.manual_receivables = vec![ManualReceivable {
            month_key: "2025-03".parse().unwrap(),
            amount: Money::new(dec!(250), Currency::USD),
            description: None,
        }];
        let payments = vec![payment(
            date(2025, 2, 28),
            Money::new(dec!(1000), Currency::USD),
            false,
        )];

        let (map, source) = engine.existing_receivables(&request, &payments, date(2025, 1, 10));
        assert_eq!(source, ReceivablesSource::Manual);
        assert_eq!(map.total().amount(), dec!(250));
    }

    #[test]
    fn test_single_loan_projection_echoes_parameters() {
        let engine = CashflowEngine::default();
        let request = CashflowRequest::new().normalize(Currency::USD);
        let result = engine.project(&request, &[], date(2025, 1, 10));

        assert!(!result.rolling);
        assert_eq!(result.horizon_months, 24);
        assert_eq!(result.rows.len(), 24);
        assert_eq!(result.potential_installments.len(), 12);
        assert!(matches!(result.statistics, ProjectionStatistics::SingleLoan(_)));
    }

    #[test]
    fn test_rolling_projection_uses_rolling_statistics() {
        let engine = CashflowEngine::default();
        let request = CashflowRequest::new().rolling().normalize(Currency::USD);
        let result = engine.project(&request, &[], date(2025, 1, 10));

        assert!(result.rolling);
        assert_eq!(result.rows.len(), 12);
        assert!(result.potential_installments.is_empty());
        assert!(matches!(result.statistics, ProjectionStatistics::Rolling(_)));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let engine = CashflowEngine::default();
        let request = CashflowRequest::new().rolling().normalize(Currency::USD);
        let payments = vec![payment(
            date(2025, 3, 31),
            Money::new(dec!(120000), Currency::USD),
            false,
        )];
        let a = engine.project(&request, &payments, date(2025, 1, 10));
        let b = engine.project(&request, &payments, date(2025, 1, 10));
        assert_eq!(a, b);
    }
}
