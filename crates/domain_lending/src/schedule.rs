//! Installment schedule generation
//!
//! Schedules are never stored by the engine; they are regenerated from
//! [`LoanTerms`] and a start date whenever needed.

use chrono::{Datelike, Days, NaiveDate};
use core_kernel::temporal::{add_months_overflowing, last_day_of_month};
use core_kernel::{LoanId, Money, MonthKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator;
use crate::frequency::{BiWeeklyConvention, MonthlyConvention, PaymentFrequency, ScheduleConventions};
use crate::loan::LoanTerms;

/// One scheduled payment of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub due_date: NaiveDate,
    pub amount: Money,
    pub month_key: MonthKey,
}

impl Installment {
    pub fn new(due_date: NaiveDate, amount: Money) -> Self {
        Self {
            due_date,
            amount,
            month_key: MonthKey::from_date(due_date),
        }
    }
}

/// Generates the full installment list for a loan starting on `start_date`
///
/// # Arguments
///
/// * `terms` - Validated loan terms
/// * `start_date` - Disbursement date; no installment falls on it
/// * `conventions` - Calendar policy for bi-weekly and monthly cadences
///
/// # Returns
///
/// Installments in due-date order, each carrying the flat periodic payment
pub fn generate_installments(
    terms: &LoanTerms,
    start_date: NaiveDate,
    conventions: &ScheduleConventions,
) -> Vec<Installment> {
    let amount = calculator::periodic_payment(terms);
    let dates = due_dates(terms.frequency(), terms.term_months(), start_date, conventions);

    debug!(
        start = %start_date,
        frequency = %terms.frequency(),
        installments = dates.len(),
        amount = %amount.amount(),
        "Generated installment schedule"
    );

    dates
        .into_iter()
        .map(|date| Installment::new(date, amount))
        .collect()
}

/// Due dates only, in order
pub fn due_dates(
    frequency: PaymentFrequency,
    term_months: u32,
    start_date: NaiveDate,
    conventions: &ScheduleConventions,
) -> Vec<NaiveDate> {
    let count = frequency.installment_count(term_months) as usize;

    match frequency {
        PaymentFrequency::Monthly => match conventions.monthly {
            MonthlyConvention::MonthEnd => month_end_dates(start_date, count),
            MonthlyConvention::CalendarOverflow => overflowing_month_dates(start_date, count),
        },
        PaymentFrequency::BiWeekly
            if conventions.bi_weekly == BiWeeklyConvention::CalendarPinned =>
        {
            pinned_semi_monthly_dates(start_date, count)
        }
        other => {
            let days = other.interval_days().unwrap_or(30);
            fixed_interval_dates(start_date, days, count)
        }
    }
}

fn fixed_interval_dates(start: NaiveDate, days: u64, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut current = start;
    for _ in 0..count {
        let Some(next) = current.checked_add_days(Days::new(days)) else {
            break;
        };
        dates.push(next);
        current = next;
    }
    dates
}

/// Month-ends, starting with the first month-end strictly after `start`
fn month_end_dates(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let start_month = MonthKey::from_date(start);
    let first = if start < start_month.last_day() {
        start_month
    } else {
        start_month.next()
    };

    (0..count as i32)
        .map(|k| first.offset(k).last_day())
        .collect()
}

/// Last day of the start month, then chained one-month steps with day overflow
fn overflowing_month_dates(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut current = last_day_of_month(start);
    for _ in 0..count {
        dates.push(current);
        match add_months_overflowing(current, 1) {
            Ok(next) => current = next,
            Err(_) => break,
        }
    }
    dates
}

/// Alternating 15th and 1st, beginning with the first pinned day after `start`
fn pinned_semi_monthly_dates(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut current = start;
    for _ in 0..count {
        let month = MonthKey::from_date(current);
        let next = if current.day() < 15 {
            month.mid_month()
        } else {
            month.next().first_day()
        };
        dates.push(next);
        current = next;
    }
    dates
}

/// A persisted loan's regenerated schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub loan_id: LoanId,
    pub terms: LoanTerms,
    pub start_date: NaiveDate,
    pub periodic_payment: Money,
    pub installments: Vec<Installment>,
}

impl LoanSchedule {
    pub fn generate(
        loan_id: LoanId,
        terms: LoanTerms,
        start_date: NaiveDate,
        conventions: &ScheduleConventions,
    ) -> Self {
        Self {
            loan_id,
            terms,
            start_date,
            periodic_payment: calculator::periodic_payment(&terms),
            installments: generate_installments(&terms, start_date, conventions),
        }
    }

    /// Sum of all installment amounts
    pub fn total_amount(&self) -> Money {
        Money::sum_in(
            self.terms.currency(),
            self.installments.iter().map(|i| &i.amount),
        )
    }

    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|i| i.due_date)
    }
}
