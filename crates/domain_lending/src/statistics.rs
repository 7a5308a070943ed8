//! Post-projection summary statistics

use core_kernel::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::loan::LoanTerms;
use crate::rolling::RollingProjection;
use crate::schedule::Installment;

/// Ratios and averages are kept at four decimal places
const RATIO_DP: u32 = 4;

/// Summary of a single hypothetical loan
///
/// Totals are summed from the rounded installments, so `total_interest` can
/// differ from `principal × rate × term` by the per-installment 4dp rounding
/// (50,000 at 1.5% over 12 months yields 9000.0004).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleLoanStatistics {
    pub loan_principal: Money,
    pub total_interest: Money,
    pub total_payments: Money,
    /// Interest as a percentage of principal
    pub interest_to_loan_ratio: Decimal,
    pub projection_period_months: u32,
    /// Number of installments the loan produces
    pub months_with_payments: u32,
}

impl SingleLoanStatistics {
    pub fn compute(terms: &LoanTerms, installments: &[Installment], horizon_months: u32) -> Self {
        let principal = terms.principal();
        let total_payments = Money::sum_in(principal.currency(), installments.iter().map(|i| &i.amount));
        let total_interest = total_payments - principal;

        Self {
            loan_principal: principal,
            total_interest,
            total_payments,
            interest_to_loan_ratio: total_interest.percent_of(&principal).round_dp(RATIO_DP),
            projection_period_months: horizon_months,
            months_with_payments: installments.len() as u32,
        }
    }
}

/// Summary of a rolling-loan simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingStatistics {
    pub total_new_loans: u32,
    pub total_principal: Money,
    pub total_interest: Money,
    /// Sum of every installment of every issued loan, including those beyond the horizon
    pub total_payments: Money,
    pub final_capital: Money,
    pub interest_to_loan_ratio: Decimal,
    pub projection_period_months: u32,
    pub average_monthly_loan_issue: Decimal,
    pub average_monthly_return: Money,
}

impl RollingStatistics {
    pub fn compute(terms: &LoanTerms, result: &RollingProjection, horizon_months: u32) -> Self {
        let currency = terms.currency();
        let total_new_loans = result.issued_loans.len() as u32;
        let total_principal = terms.principal().multiply(Decimal::from(total_new_loans));
        let total_interest = result
            .issued_loans
            .iter()
            .fold(Money::zero(currency), |acc, loan| acc + loan.interest());
        let total_payments = Money::sum_in(
            currency,
            result.all_issued_installments.iter().map(|i| &i.amount),
        );

        let months = Decimal::from(horizon_months);
        let (average_monthly_loan_issue, average_monthly_return) = if horizon_months > 0 {
            (
                (Decimal::from(total_new_loans) / months).round_dp(RATIO_DP),
                Money::new(total_payments.amount() / months, currency),
            )
        } else {
            (Decimal::ZERO, Money::zero(currency))
        };

        Self {
            total_new_loans,
            total_principal,
            total_interest,
            total_payments,
            final_capital: result.final_capital(),
            interest_to_loan_ratio: total_interest.percent_of(&total_principal).round_dp(RATIO_DP),
            projection_period_months: horizon_months,
            average_monthly_loan_issue,
            average_monthly_return,
        }
    }
}

/// Statistics for whichever projection mode ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectionStatistics {
    SingleLoan(SingleLoanStatistics),
    Rolling(RollingStatistics),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::ScheduleConventions;
    use crate::receivables::MonthlyReceivables;
    use crate::rolling::simulate;
    use crate::schedule::generate_installments;
    use chrono::NaiveDate;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn test_single_loan_statistics() {
        let terms = LoanTerms::default_terms(Currency::USD);
        let installments = generate_installments(&terms, today(), &ScheduleConventions::default());
        let stats = SingleLoanStatistics::compute(&terms, &installments, 24);

        assert_eq!(stats.loan_principal.amount(), dec!(50000));
        assert_eq!(stats.total_payments.amount(), dec!(59000.0004));
        assert_eq!(stats.total_interest.amount(), dec!(9000.0004));
        assert_eq!(stats.interest_to_loan_ratio, dec!(18.0000));
        assert_eq!(stats.months_with_payments, 12);
    }

    #[test]
    fn test_rolling_statistics_without_loans() {
        let terms = LoanTerms::default_terms(Currency::USD);
        let existing = MonthlyReceivables::new(Currency::USD);
        let result = simulate(&existing, terms, ScheduleConventions::default(), 12, today());
        let stats = RollingStatistics::compute(&terms, &result, 12);

        assert_eq!(stats.total_new_loans, 0);
        assert!(stats.total_principal.is_zero());
        assert_eq!(stats.interest_to_loan_ratio, Decimal::ZERO);
        assert_eq!(stats.average_monthly_loan_issue, Decimal::ZERO);
    }

    #[test]
    fn test_rolling_statistics_with_one_loan() {
        let terms = LoanTerms::default_terms(Currency::USD);
        let mut existing = MonthlyReceivables::new(Currency::USD);
        existing.add("2025-01".parse().unwrap(), Money::new(dec!(60000), Currency::USD));

        let result = simulate(&existing, terms, ScheduleConventions::default(), 6, today());
        let stats = RollingStatistics::compute(&terms, &result, 6);

        assert_eq!(stats.total_new_loans, 1);
        assert_eq!(stats.total_principal.amount(), dec!(50000));
        assert_eq!(stats.total_interest.amount(), dec!(9000.0004));
        assert_eq!(stats.total_payments.amount(), dec!(59000.0004));
        // January remainder plus five installments, February through June
        assert_eq!(stats.final_capital.amount(), dec!(34583.3335));
        assert_eq!(stats.average_monthly_loan_issue, dec!(0.1667));
    }
}
