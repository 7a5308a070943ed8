//! Portfolio dashboard summary over the persisted loan book

use chrono::{Days, NaiveDate};
use core_kernel::{ClientId, Currency, LoanId, Money};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::frequency::PaymentFrequency;
use crate::ports::LoanRecord;

/// Payments due within this many days from today count as upcoming
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

/// Number of loans listed in [`PortfolioSummary::recent_loans`]
pub const RECENT_LOANS: usize = 5;

/// Loan count per payment scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeCount {
    pub scheme: PaymentFrequency,
    pub count: u32,
}

/// Compact view of a recently started loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentLoan {
    pub loan_id: LoanId,
    pub client_name: String,
    pub amount: Money,
    pub service_charge: Money,
    pub start_date: NaiveDate,
    pub payment_scheme: PaymentFrequency,
}

/// Dashboard statistics for the whole loan book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_clients: u32,
    pub total_loans: u32,
    pub total_loan_amount: Money,
    pub total_service_charges: Money,
    /// Loans with at least one unpaid payment due today or later
    pub active_loans: u32,
    pub total_paid_payments: u32,
    pub total_paid_amount: Money,
    /// Unpaid installments plus service charges of loans still being repaid
    pub projected_earnings: Money,
    /// Unpaid installments minus principal, per loan still being repaid
    pub projected_interest_earnings: Money,
    pub upcoming_payments: u32,
    pub overdue_payments: u32,
    pub payment_schemes: Vec<SchemeCount>,
    pub recent_loans: Vec<RecentLoan>,
}

impl PortfolioSummary {
    /// Summarizes `loans` as of `today`
    ///
    /// Amounts in a currency other than `currency` are left out of the totals.
    pub fn compute(loans: &[LoanRecord], today: NaiveDate, currency: Currency) -> Self {
        let zero = Money::zero(currency);
        let same_currency = |m: &Money| m.currency() == currency;
        let upcoming_until = today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);

        let clients: HashSet<ClientId> = loans.iter().map(|l| l.client_id).collect();

        let mut summary = Self {
            total_clients: clients.len() as u32,
            total_loans: loans.len() as u32,
            total_loan_amount: zero,
            total_service_charges: zero,
            active_loans: 0,
            total_paid_payments: 0,
            total_paid_amount: zero,
            projected_earnings: zero,
            projected_interest_earnings: zero,
            upcoming_payments: 0,
            overdue_payments: 0,
            payment_schemes: Vec::new(),
            recent_loans: Vec::new(),
        };

        let mut schemes: BTreeMap<PaymentFrequency, u32> = BTreeMap::new();

        for loan in loans {
            let principal = loan.terms.principal();
            if same_currency(&principal) {
                summary.total_loan_amount += principal;
            }
            if same_currency(&loan.service_charge) {
                summary.total_service_charges += loan.service_charge;
            }
            *schemes.entry(loan.terms.frequency()).or_insert(0) += 1;

            for paid in loan.paid_payments() {
                summary.total_paid_payments += 1;
                if same_currency(&paid.amount) {
                    summary.total_paid_amount += paid.amount;
                }
            }

            let unpaid: Vec<_> = loan.unpaid_payments().collect();
            if unpaid.is_empty() {
                continue;
            }

            if unpaid.iter().any(|p| p.due_date >= today) {
                summary.active_loans += 1;
            }
            summary.upcoming_payments += unpaid
                .iter()
                .filter(|p| p.due_date >= today && p.due_date <= upcoming_until)
                .count() as u32;
            summary.overdue_payments += unpaid.iter().filter(|p| p.due_date < today).count() as u32;

            let outstanding = Money::sum_in(
                currency,
                unpaid.iter().map(|p| &p.amount).filter(|m| same_currency(m)),
            );
            if same_currency(&principal) {
                summary.projected_interest_earnings += outstanding - principal;
            }
            summary.projected_earnings += outstanding;
            if same_currency(&loan.service_charge) {
                summary.projected_earnings += loan.service_charge;
            }
        }

        summary.payment_schemes = schemes
            .into_iter()
            .map(|(scheme, count)| SchemeCount { scheme, count })
            .collect();

        let mut recent: Vec<&LoanRecord> = loans.iter().collect();
        recent.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        summary.recent_loans = recent
            .into_iter()
            .take(RECENT_LOANS)
            .map(|l| RecentLoan {
                loan_id: l.loan_id,
                client_name: l.client_name.clone(),
                amount: l.terms.principal(),
                service_charge: l.service_charge,
                start_date: l.start_date,
                payment_scheme: l.terms.frequency(),
            })
            .collect();

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanTerms;
    use crate::ports::{LoanStatus, ScheduledPayment};
    use core_kernel::PaymentId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    fn loan(start: NaiveDate, payments: &[(NaiveDate, bool)]) -> LoanRecord {
        let loan_id = LoanId::new();
        LoanRecord {
            loan_id,
            client_id: ClientId::new(),
            client_name: "Maria Santos".to_string(),
            terms: LoanTerms::new(
                usd(dec!(3000)),
                core_kernel::Rate::from_percentage(dec!(2)),
                3,
                PaymentFrequency::Monthly,
            )
            .unwrap(),
            service_charge: usd(dec!(100)),
            start_date: start,
            status: LoanStatus::Active,
            payments: payments
                .iter()
                .map(|(due, paid)| ScheduledPayment {
                    payment_id: PaymentId::new(),
                    loan_id,
                    due_date: *due,
                    amount: usd(dec!(1060)),
                    is_paid: *paid,
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_book() {
        let summary = PortfolioSummary::compute(&[], date(2025, 1, 10), Currency::USD);
        assert_eq!(summary.total_loans, 0);
        assert!(summary.projected_earnings.is_zero());
        assert!(summary.payment_schemes.is_empty());
        assert!(summary.recent_loans.is_empty());
    }

    #[test]
    fn test_counts_and_earnings() {
        let today = date(2025, 2, 10);
        let loans = vec![
            loan(
                date(2024, 12, 5),
                &[
                    (date(2024, 12, 31), true),
                    (date(2025, 1, 31), false),
                    (date(2025, 2, 14), false),
                ],
            ),
            loan(date(2024, 6, 1), &[(date(2024, 6, 30), true)]),
        ];

        let summary = PortfolioSummary::compute(&loans, today, Currency::USD);
        assert_eq!(summary.total_clients, 2);
        assert_eq!(summary.total_loans, 2);
        assert_eq!(summary.total_loan_amount.amount(), dec!(6000));
        assert_eq!(summary.total_service_charges.amount(), dec!(200));
        assert_eq!(summary.active_loans, 1);
        assert_eq!(summary.total_paid_payments, 2);
        assert_eq!(summary.total_paid_amount.amount(), dec!(2120));
        assert_eq!(summary.upcoming_payments, 1);
        assert_eq!(summary.overdue_payments, 1);
        // Two unpaid installments plus the first loan's service charge
        assert_eq!(summary.projected_earnings.amount(), dec!(2220));
        assert_eq!(summary.projected_interest_earnings.amount(), dec!(-880));
        assert_eq!(
            summary.payment_schemes,
            vec![SchemeCount {
                scheme: PaymentFrequency::Monthly,
                count: 2
            }]
        );
    }

    #[test]
    fn test_recent_loans_newest_first_and_capped() {
        let loans: Vec<_> = (1..=7)
            .map(|m| loan(date(2024, m, 1), &[]))
            .collect();
        let summary = PortfolioSummary::compute(&loans, date(2025, 1, 1), Currency::USD);

        assert_eq!(summary.recent_loans.len(), RECENT_LOANS);
        assert_eq!(summary.recent_loans[0].start_date, date(2024, 7, 1));
        assert_eq!(summary.recent_loans[4].start_date, date(2024, 3, 1));
    }

    #[test]
    fn test_upcoming_window_is_inclusive() {
        let today = date(2025, 3, 1);
        let loans = vec![loan(
            date(2025, 2, 1),
            &[(date(2025, 3, 8), false), (date(2025, 3, 9), false)],
        )];
        let summary = PortfolioSummary::compute(&loans, today, Currency::USD);
        assert_eq!(summary.upcoming_payments, 1);
    }
}
