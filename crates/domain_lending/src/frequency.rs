//! Payment frequencies and the calendar conventions that place installments
//!
//! A loan's nominal term is always expressed in months. The frequency decides
//! how many installments that term expands into and how each installment is
//! scaled relative to the monthly-equivalent payment.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LendingError;

/// Installment cadence for a loan
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentFrequency {
    Weekly,
    #[serde(alias = "biweekly")]
    BiWeekly,
    #[default]
    Monthly,
    Quarterly,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 4] = [
        PaymentFrequency::Weekly,
        PaymentFrequency::BiWeekly,
        PaymentFrequency::Monthly,
        PaymentFrequency::Quarterly,
    ];

    /// Lenient name lookup; unknown names yield `None`
    ///
    /// Accepts `weekly`, `bi-weekly`/`biweekly`/`bi_weekly`, `monthly` and
    /// `quarterly` in any case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "weekly" => Some(PaymentFrequency::Weekly),
            "bi-weekly" | "biweekly" | "bi_weekly" => Some(PaymentFrequency::BiWeekly),
            "monthly" => Some(PaymentFrequency::Monthly),
            "quarterly" => Some(PaymentFrequency::Quarterly),
            _ => None,
        }
    }

    /// Wire name, as stored in the ledger and echoed in projections
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::BiWeekly => "bi-weekly",
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
        }
    }

    /// Number of installments a nominal term of `term_months` expands into
    ///
    /// # Arguments
    ///
    /// * `term_months` - Loan term in nominal months
    ///
    /// # Returns
    ///
    /// `term×4` weekly, `term×2` bi-weekly, `term` monthly, `ceil(term/3)` quarterly
    pub fn installment_count(&self, term_months: u32) -> u32 {
        match self {
            PaymentFrequency::Weekly => term_months * 4,
            PaymentFrequency::BiWeekly => term_months * 2,
            PaymentFrequency::Monthly => term_months,
            PaymentFrequency::Quarterly => term_months.div_ceil(3),
        }
    }

    /// Multiplier applied to the monthly-equivalent payment
    pub fn payment_factor(&self) -> Decimal {
        match self {
            PaymentFrequency::Weekly => dec!(0.25),
            PaymentFrequency::BiWeekly => dec!(0.5),
            PaymentFrequency::Monthly => Decimal::ONE,
            PaymentFrequency::Quarterly => dec!(3),
        }
    }

    /// Fixed day spacing between installments; monthly schedules follow the calendar instead
    pub fn interval_days(&self) -> Option<u64> {
        match self {
            PaymentFrequency::Weekly => Some(7),
            PaymentFrequency::BiWeekly => Some(14),
            PaymentFrequency::Monthly => None,
            PaymentFrequency::Quarterly => Some(90),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LendingError::UnknownFrequency(s.to_string()))
    }
}

/// How bi-weekly due dates are placed on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiWeeklyConvention {
    /// Every 14 days from the start date
    #[default]
    FixedInterval,
    /// Alternating 1st and 15th of each month, starting after the start date
    CalendarPinned,
}

/// How monthly due dates are placed on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyConvention {
    /// Last day of each month; the first is the first month-end after the start date
    #[default]
    MonthEnd,
    /// Last day of the start month, then repeated one-month steps where a
    /// day past the target month's end spills into the following month
    CalendarOverflow,
}

/// Calendar policy used by the schedule generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleConventions {
    pub bi_weekly: BiWeeklyConvention,
    pub monthly: MonthlyConvention,
}

impl ScheduleConventions {
    pub fn new(bi_weekly: BiWeeklyConvention, monthly: MonthlyConvention) -> Self {
        Self { bi_weekly, monthly }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installment_counts() {
        assert_eq!(PaymentFrequency::Weekly.installment_count(12), 48);
        assert_eq!(PaymentFrequency::BiWeekly.installment_count(12), 24);
        assert_eq!(PaymentFrequency::Monthly.installment_count(12), 12);
        assert_eq!(PaymentFrequency::Quarterly.installment_count(12), 4);
        assert_eq!(PaymentFrequency::Quarterly.installment_count(10), 4);
        assert_eq!(PaymentFrequency::Quarterly.installment_count(1), 1);
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_hyphen() {
        assert_eq!(PaymentFrequency::parse("Bi-Weekly"), Some(PaymentFrequency::BiWeekly));
        assert_eq!(PaymentFrequency::parse("biweekly"), Some(PaymentFrequency::BiWeekly));
        assert_eq!(PaymentFrequency::parse(" MONTHLY "), Some(PaymentFrequency::Monthly));
        assert_eq!(PaymentFrequency::parse("fortnightly"), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PaymentFrequency::BiWeekly).unwrap();
        assert_eq!(json, "\"bi-weekly\"");
        let parsed: PaymentFrequency = serde_json::from_str("\"quarterly\"").unwrap();
        assert_eq!(parsed, PaymentFrequency::Quarterly);
    }

    #[test]
    fn test_default_conventions() {
        let conventions = ScheduleConventions::default();
        assert_eq!(conventions.bi_weekly, BiWeeklyConvention::FixedInterval);
        assert_eq!(conventions.monthly, MonthlyConvention::MonthEnd);
    }
}
