//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the lending domain. Every date is
//! fixed so projections anchored at "today" are reproducible.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, MonthKey, Rate};
use domain_lending::{
    CashflowRequest, ManualReceivable, PaymentFrequency, RecurrenceFrequency, RecurringReceivable,
};
use domain_lending::LoanTerms;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The default loan principal
    pub fn usd_principal() -> Money {
        Money::new(dec!(50000), Currency::USD)
    }

    /// Monthly installment of the default loan
    pub fn usd_monthly_installment() -> Money {
        Money::new(dec!(4916.6667), Currency::USD)
    }

    pub fn usd(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// A EUR amount for currency mismatch tests
    pub fn eur_1000() -> Money {
        Money::new(dec!(1000), Currency::EUR)
    }
}

/// Fixture for calendar anchors
pub struct DateFixtures;

impl DateFixtures {
    /// Standard "today" for projections (Jan 10, 2025)
    pub fn today() -> NaiveDate {
        Self::date(2025, 1, 10)
    }

    /// A month end used as a loan start date
    pub fn month_end_start() -> NaiveDate {
        Self::date(2025, 1, 31)
    }

    /// Leap-year February end
    pub fn leap_february_end() -> NaiveDate {
        Self::date(2024, 2, 29)
    }

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }

    pub fn month(key: &str) -> MonthKey {
        key.parse().expect("valid fixture month key")
    }
}

/// Fixture for loan terms
pub struct LoanFixtures;

impl LoanFixtures {
    /// 50,000 at 1.5% per month over 12 months, paid monthly
    pub fn default_terms() -> LoanTerms {
        LoanTerms::default_terms(Currency::USD)
    }

    /// Small loan with round numbers: 1,200 at 1% over 12 months
    pub fn small_terms(frequency: PaymentFrequency) -> LoanTerms {
        LoanTerms::new(
            Money::new(dec!(1200), Currency::USD),
            Rate::from_percentage(dec!(1)),
            12,
            frequency,
        )
        .expect("valid fixture terms")
    }

    /// Default request in single-loan mode
    pub fn single_loan_request() -> CashflowRequest {
        CashflowRequest::new()
            .with_amount(dec!(50000))
            .with_interest(dec!(1.5))
            .with_terms(12)
            .with_scheme("monthly")
            .with_period(24)
    }

    /// Default request in rolling mode
    pub fn rolling_request() -> CashflowRequest {
        Self::single_loan_request().with_period(12).rolling()
    }
}

/// Fixture for manual receivables
pub struct ReceivableFixtures;

impl ReceivableFixtures {
    pub fn june_2025_thousand() -> ManualReceivable {
        ManualReceivable {
            month_key: DateFixtures::month("2025-06"),
            amount: MoneyFixtures::usd(dec!(1000)),
            description: Some("Equipment sale".to_string()),
        }
    }

    pub fn quarterly_rent() -> RecurringReceivable {
        RecurringReceivable {
            start_month_key: DateFixtures::month("2025-01"),
            amount: MoneyFixtures::usd(dec!(2500)),
            frequency: RecurrenceFrequency::Quarterly,
            description: Some("Office sublease".to_string()),
        }
    }

    /// Wire JSON for [`Self::june_2025_thousand`]
    pub fn june_2025_json() -> String {
        serde_json::json!([
            { "monthKey": "2025-06", "amount": 1000, "description": "Equipment sale" }
        ])
        .to_string()
    }
}
