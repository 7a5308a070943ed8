//! Month-by-month projection rows and the single-loan combiner

use chrono::NaiveDate;
use core_kernel::{Money, MonthKey};
use serde::{Deserialize, Serialize};

use crate::loan::defaults;
use crate::receivables::{aggregate, MonthlyReceivables};
use crate::schedule::Installment;

/// One calendar month of a cash-flow projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub month_key: MonthKey,
    pub month_label: String,
    pub existing_receivables: Money,
    pub potential_payment: Money,
    pub total_receivables: Money,
    /// Rolling mode only
    pub new_loans_issued: Option<u32>,
    /// Rolling mode only; capital left after this month's issuance
    pub running_capital: Option<Money>,
}

impl ProjectionRow {
    pub fn new(month_key: MonthKey, existing: Money, potential: Money) -> Self {
        Self {
            month_key,
            month_label: month_key.label(),
            existing_receivables: existing,
            potential_payment: potential,
            total_receivables: existing + potential,
            new_loans_issued: None,
            running_capital: None,
        }
    }
}

/// Zero horizons fall back to twelve months
pub fn effective_horizon(horizon_months: u32) -> u32 {
    if horizon_months == 0 {
        defaults::HORIZON_FALLBACK
    } else {
        horizon_months
    }
}

/// The consecutive months of a horizon starting at `today`'s month
pub fn horizon_month_keys(today: NaiveDate, horizon_months: u32) -> impl Iterator<Item = MonthKey> {
    let start = MonthKey::from_date(today);
    (0..effective_horizon(horizon_months)).map(move |i| start.offset(i as i32))
}

/// Merges existing receivables with one hypothetical loan's installments
///
/// # Arguments
///
/// * `existing` - Month-keyed receivables already expected
/// * `potential` - Installments of the candidate loan
/// * `horizon_months` - Rows to emit; zero means twelve
/// * `today` - Anchor; the first row is this date's month
///
/// # Returns
///
/// Exactly one row per month, chronological, including months with nothing due
pub fn combine(
    existing: &MonthlyReceivables,
    potential: &[Installment],
    horizon_months: u32,
    today: NaiveDate,
) -> Vec<ProjectionRow> {
    let potential_by_month = aggregate(existing.currency(), potential);

    horizon_month_keys(today, horizon_months)
        .map(|month| ProjectionRow::new(month, existing.get(&month), potential_by_month.get(&month)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_combine_emits_every_month() {
        let existing = MonthlyReceivables::new(Currency::USD);
        let rows = combine(&existing, &[], 24, date(2025, 11, 20));

        assert_eq!(rows.len(), 24);
        assert_eq!(rows[0].month_key.to_string(), "2025-11");
        assert_eq!(rows[0].month_label, "November 2025");
        assert_eq!(rows[23].month_key.to_string(), "2027-10");
        assert!(rows.iter().all(|r| r.total_receivables.is_zero()));
    }

    #[test]
    fn test_combine_sums_both_sources() {
        let mut existing = MonthlyReceivables::new(Currency::USD);
        existing.add("2025-02".parse().unwrap(), Money::new(dec!(300), Currency::USD));
        let potential = vec![
            Installment::new(date(2025, 2, 28), Money::new(dec!(100), Currency::USD)),
            Installment::new(date(2025, 3, 31), Money::new(dec!(100), Currency::USD)),
        ];

        let rows = combine(&existing, &potential, 3, date(2025, 1, 10));
        assert_eq!(rows[0].total_receivables.amount(), dec!(0));
        assert_eq!(rows[1].existing_receivables.amount(), dec!(300));
        assert_eq!(rows[1].potential_payment.amount(), dec!(100));
        assert_eq!(rows[1].total_receivables.amount(), dec!(400));
        assert_eq!(rows[2].total_receivables.amount(), dec!(100));
        assert!(rows.iter().all(|r| r.new_loans_issued.is_none()));
    }

    #[test]
    fn test_zero_horizon_defaults_to_twelve() {
        let existing = MonthlyReceivables::new(Currency::USD);
        assert_eq!(combine(&existing, &[], 0, date(2025, 1, 1)).len(), 12);
    }

    #[test]
    fn test_installments_outside_horizon_are_ignored() {
        let existing = MonthlyReceivables::new(Currency::USD);
        let potential = vec![Installment::new(
            date(2030, 1, 31),
            Money::new(dec!(100), Currency::USD),
        )];
        let rows = combine(&existing, &potential, 6, date(2025, 1, 1));
        assert!(rows.iter().all(|r| r.potential_payment.is_zero()));
    }
}
