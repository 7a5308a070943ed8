//! Rolling-loan capital recycling simulation
//!
//! Each simulated month adds that month's receivables (existing plus the
//! installments of loans issued in earlier months) to a capital pool, then
//! issues as many whole loans as the pool covers. The remainder carries
//! forward. New loans start on the last day of the month, so their first
//! installment lands in a later month and feeds future iterations.
//!
//! The simulation is a fold of [`RollingLoanSimulator::step`] over the
//! horizon; all state lives in [`SimulationState`].
//!
//! A single run originates at most [`MAX_ISSUED_LOANS`] loans. Once that cap
//! is reached, further capital stays in the pool and `running_capital` may
//! exceed one principal.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, MoneyError, MonthKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::frequency::ScheduleConventions;
use crate::loan::LoanTerms;
use crate::projection::{horizon_month_keys, ProjectionRow};
use crate::receivables::MonthlyReceivables;
use crate::schedule::{generate_installments, Installment};

/// Upper bound on loans originated by one simulation run
pub const MAX_ISSUED_LOANS: usize = 10_000;

/// A loan originated by the simulator; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedLoan {
    pub start_date: NaiveDate,
    pub principal: Money,
    pub installments: Vec<Installment>,
}

impl SimulatedLoan {
    pub fn total_repayment(&self) -> Money {
        Money::sum_in(
            self.principal.currency(),
            self.installments.iter().map(|i| &i.amount),
        )
    }

    /// Repayment above principal
    pub fn interest(&self) -> Money {
        self.total_repayment() - self.principal
    }
}

/// Everything carried from one simulated month to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationState {
    pub available_capital: Money,
    /// Sum of every month's counted inflow so far
    pub total_inflow: Money,
    pub issued_loans: Vec<SimulatedLoan>,
    pub all_issued_installments: Vec<Installment>,
    pub rows: Vec<ProjectionRow>,
    issued_by_month: MonthlyReceivables,
}

impl SimulationState {
    pub fn new(currency: Currency) -> Self {
        Self {
            available_capital: Money::zero(currency),
            total_inflow: Money::zero(currency),
            issued_loans: Vec::new(),
            all_issued_installments: Vec::new(),
            rows: Vec::new(),
            issued_by_month: MonthlyReceivables::new(currency),
        }
    }

    /// Installments from already-issued loans falling in `month`
    pub fn issued_due_in(&self, month: &MonthKey) -> Money {
        self.issued_by_month.get(month)
    }
}

/// Output of a rolling simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingProjection {
    pub projection: Vec<ProjectionRow>,
    pub issued_loans: Vec<SimulatedLoan>,
    pub all_issued_installments: Vec<Installment>,
    pub total_inflow: Money,
}

impl RollingProjection {
    pub fn final_capital(&self) -> Money {
        self.projection
            .last()
            .and_then(|row| row.running_capital)
            .unwrap_or_else(|| Money::zero(self.total_inflow.currency()))
    }
}

impl From<SimulationState> for RollingProjection {
    fn from(state: SimulationState) -> Self {
        Self {
            projection: state.rows,
            issued_loans: state.issued_loans,
            all_issued_installments: state.all_issued_installments,
            total_inflow: state.total_inflow,
        }
    }
}

/// Drives the month-by-month reducer
///
/// The lending threshold equals the principal of one loan: a loan is issued
/// for every whole principal the pool holds.
#[derive(Debug, Clone)]
pub struct RollingLoanSimulator<'a> {
    existing: &'a MonthlyReceivables,
    terms: LoanTerms,
    conventions: ScheduleConventions,
}

impl<'a> RollingLoanSimulator<'a> {
    pub fn new(
        existing: &'a MonthlyReceivables,
        terms: LoanTerms,
        conventions: ScheduleConventions,
    ) -> Self {
        if existing.currency() != terms.currency() {
            warn!(
                receivables = %existing.currency(),
                loans = %terms.currency(),
                "Existing receivables currency differs from loan currency; they will be ignored"
            );
        }
        Self {
            existing,
            terms,
            conventions,
        }
    }

    /// Capital needed to originate one loan
    pub fn threshold(&self) -> Money {
        self.terms.principal()
    }

    fn existing_in(&self, month: &MonthKey) -> Money {
        if self.existing.currency() == self.terms.currency() {
            self.existing.get(month)
        } else {
            Money::zero(self.terms.currency())
        }
    }

    /// Advances the simulation by one calendar month
    ///
    /// Inflow is added before issuance, and loans issued here never count
    /// toward this month's own total.
    pub fn step(&self, mut state: SimulationState, month: MonthKey) -> SimulationState {
        let existing = self.existing_in(&month);
        let from_issued = state.issued_due_in(&month);
        let inflow = existing + from_issued;

        state.available_capital += inflow;
        state.total_inflow += inflow;

        let principal = self.threshold();
        let affordable = match state.available_capital.whole_units_of(&principal) {
            Ok(count) => count,
            Err(MoneyError::Overflow) => u32::MAX,
            Err(err) => {
                error!(month = %month, error = %err, "Cannot size rolling issuance");
                0
            }
        };
        let remaining = MAX_ISSUED_LOANS.saturating_sub(state.issued_loans.len());
        let loans_to_issue = (affordable as usize).min(remaining) as u32;
        if loans_to_issue < affordable {
            warn!(
                month = %month,
                affordable,
                issued = loans_to_issue,
                cap = MAX_ISSUED_LOANS,
                "Rolling issuance capped; surplus capital stays in the pool"
            );
        }
        state.available_capital -= principal.multiply(Decimal::from(loans_to_issue));

        if loans_to_issue > 0 {
            let start_date = month.last_day();
            let installments = generate_installments(&self.terms, start_date, &self.conventions);
            for _ in 0..loans_to_issue {
                state.issued_by_month.extend(&installments);
                state
                    .all_issued_installments
                    .extend(installments.iter().copied());
                state.issued_loans.push(SimulatedLoan {
                    start_date,
                    principal,
                    installments: installments.clone(),
                });
            }
            info!(
                month = %month,
                loans = loans_to_issue,
                remaining_capital = %state.available_capital.amount(),
                "Issued rolling loans"
            );
        }

        debug!(
            month = %month,
            anchor = %month.mid_month(),
            existing = %existing.amount(),
            from_issued = %from_issued.amount(),
            capital = %state.available_capital.amount(),
            "Simulated month"
        );

        state.rows.push(ProjectionRow {
            month_key: month,
            month_label: month.label(),
            existing_receivables: existing,
            potential_payment: from_issued,
            total_receivables: inflow,
            new_loans_issued: Some(loans_to_issue),
            running_capital: Some(state.available_capital),
        });

        state
    }

    /// Runs exactly `horizon_months` steps (twelve if zero) from `today`'s month
    pub fn run(&self, horizon_months: u32, today: NaiveDate) -> RollingProjection {
        horizon_month_keys(today, horizon_months)
            .fold(SimulationState::new(self.terms.currency()), |state, month| {
                self.step(state, month)
            })
            .into()
    }
}

/// Convenience wrapper over [`RollingLoanSimulator::run`]
pub fn simulate(
    existing: &MonthlyReceivables,
    terms: LoanTerms,
    conventions: ScheduleConventions,
    horizon_months: u32,
    today: NaiveDate,
) -> RollingProjection {
    RollingLoanSimulator::new(existing, terms, conventions).run(horizon_months, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Rate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    fn terms() -> LoanTerms {
        LoanTerms::default_terms(Currency::USD)
    }

    #[test]
    fn test_no_receivables_issues_nothing() {
        let existing = MonthlyReceivables::new(Currency::USD);
        let result = simulate(&existing, terms(), ScheduleConventions::default(), 12, date(2025, 1, 10));

        assert_eq!(result.projection.len(), 12);
        assert!(result.issued_loans.is_empty());
        assert!(result.final_capital().is_zero());
        assert!(result
            .projection
            .iter()
            .all(|r| r.new_loans_issued == Some(0)));
    }

    #[test]
    fn test_capital_accumulates_across_months() {
        let mut existing = MonthlyReceivables::new(Currency::USD);
        existing.add("2025-01".parse().unwrap(), usd(dec!(30000)));
        existing.add("2025-02".parse().unwrap(), usd(dec!(30000)));

        let result = simulate(&existing, terms(), ScheduleConventions::default(), 4, date(2025, 1, 3));
        let rows = &result.projection;

        assert_eq!(rows[0].new_loans_issued, Some(0));
        assert_eq!(rows[0].running_capital, Some(usd(dec!(30000))));
        assert_eq!(rows[1].new_loans_issued, Some(1));
        assert_eq!(rows[1].running_capital, Some(usd(dec!(10000))));
        // First installment of the February loan lands in March
        assert_eq!(rows[2].potential_payment.amount(), dec!(4916.6667));
        assert_eq!(result.issued_loans[0].start_date, date(2025, 2, 28));
    }

    #[test]
    fn test_issues_multiple_loans_in_one_month() {
        let mut existing = MonthlyReceivables::new(Currency::USD);
        existing.add("2025-03".parse().unwrap(), usd(dec!(175000)));

        let result = simulate(&existing, terms(), ScheduleConventions::default(), 2, date(2025, 3, 1));
        assert_eq!(result.projection[0].new_loans_issued, Some(3));
        assert_eq!(result.projection[0].running_capital, Some(usd(dec!(25000))));
        assert_eq!(result.issued_loans.len(), 3);
        assert_eq!(result.all_issued_installments.len(), 36);
        assert_eq!(result.projection[1].potential_payment.amount(), dec!(14750.0001));
    }

    #[test]
    fn test_loan_interest() {
        let loan_terms = LoanTerms::new(
            usd(dec!(1200)),
            Rate::from_percentage(dec!(1)),
            12,
            crate::frequency::PaymentFrequency::Monthly,
        )
        .unwrap();
        let loan = SimulatedLoan {
            start_date: date(2025, 1, 31),
            principal: loan_terms.principal(),
            installments: generate_installments(
                &loan_terms,
                date(2025, 1, 31),
                &ScheduleConventions::default(),
            ),
        };
        assert_eq!(loan.total_repayment().amount(), dec!(1344));
        assert_eq!(loan.interest().amount(), dec!(144));
    }

    #[test]
    fn test_step_is_pure() {
        let mut existing = MonthlyReceivables::new(Currency::USD);
        existing.add("2025-05".parse().unwrap(), usd(dec!(120000)));
        let simulator = RollingLoanSimulator::new(&existing, terms(), ScheduleConventions::default());
        let month: MonthKey = "2025-05".parse().unwrap();

        let a = simulator.step(SimulationState::new(Currency::USD), month);
        let b = simulator.step(SimulationState::new(Currency::USD), month);
        assert_eq!(a, b);
        assert_eq!(a.issued_loans.len(), 2);
    }

    #[test]
    fn test_issuance_stops_at_loan_cap() {
        let tiny = LoanTerms::new(
            usd(dec!(1)),
            Rate::from_percentage(Decimal::ZERO),
            1,
            crate::frequency::PaymentFrequency::Monthly,
        )
        .unwrap();
        let mut existing = MonthlyReceivables::new(Currency::USD);
        // Quotient exceeds u32::MAX
        existing.add("2025-03".parse().unwrap(), usd(dec!(1000000000000000)));

        let result = simulate(&existing, tiny, ScheduleConventions::default(), 3, date(2025, 3, 1));
        let rows = &result.projection;

        assert_eq!(result.issued_loans.len(), MAX_ISSUED_LOANS);
        assert_eq!(rows[0].new_loans_issued, Some(MAX_ISSUED_LOANS as u32));
        assert_eq!(
            rows[0].running_capital,
            Some(usd(dec!(1000000000000000) - Decimal::from(MAX_ISSUED_LOANS as u32)))
        );
        // Repayments keep flowing in, but nothing more is issued
        assert_eq!(rows[1].potential_payment.amount(), Decimal::from(MAX_ISSUED_LOANS as u32));
        assert_eq!(rows[1].new_loans_issued, Some(0));
        assert_eq!(result.final_capital().amount(), dec!(1000000000000000));
    }
}
