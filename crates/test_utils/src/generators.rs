//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random lending data
//! that maintains domain invariants.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, MonthKey, Rate};
use domain_lending::{
    BiWeeklyConvention, Installment, LoanTerms, MonthlyConvention, PaymentFrequency,
    ScheduleConventions,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating payment frequencies
pub fn frequency_strategy() -> impl Strategy<Value = PaymentFrequency> {
    prop_oneof![
        Just(PaymentFrequency::Weekly),
        Just(PaymentFrequency::BiWeekly),
        Just(PaymentFrequency::Monthly),
        Just(PaymentFrequency::Quarterly),
    ]
}

/// Strategy for generating calendar conventions
pub fn conventions_strategy() -> impl Strategy<Value = ScheduleConventions> {
    (
        prop_oneof![
            Just(BiWeeklyConvention::FixedInterval),
            Just(BiWeeklyConvention::CalendarPinned)
        ],
        prop_oneof![
            Just(MonthlyConvention::MonthEnd),
            Just(MonthlyConvention::CalendarOverflow)
        ],
    )
        .prop_map(|(bi_weekly, monthly)| ScheduleConventions::new(bi_weekly, monthly))
}

/// Strategy for principals between 1,000.00 and 1,000,000.00 USD
pub fn principal_strategy() -> impl Strategy<Value = Money> {
    (100_000i64..100_000_000i64).prop_map(|minor| Money::from_minor(minor, Currency::USD))
}

/// Strategy for monthly rates from 0% to 5% in basis points
pub fn rate_strategy() -> impl Strategy<Value = Rate> {
    (0i64..=500i64).prop_map(|bp| Rate::from_percentage(Decimal::new(bp, 2)))
}

/// Strategy for valid loan terms
pub fn loan_terms_strategy() -> impl Strategy<Value = LoanTerms> {
    (principal_strategy(), rate_strategy(), 1u32..=60u32, frequency_strategy()).prop_map(
        |(principal, rate, term, frequency)| {
            LoanTerms::new(principal, rate, term, frequency).expect("generated terms are valid")
        },
    )
}

/// Strategy for dates between 2000 and 2049
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2050i32, 1u32..=12u32, 1u32..=31u32).prop_map(|(y, m, d)| {
        let last = core_kernel::temporal::days_in_month(y, m);
        NaiveDate::from_ymd_opt(y, m, d.min(last)).expect("day clamped to month length")
    })
}

/// Strategy for month keys between 2020-01 and 2029-12
pub fn month_key_strategy() -> impl Strategy<Value = MonthKey> {
    (2020i32..2030i32, 1u32..=12u32)
        .prop_map(|(y, m)| MonthKey::new(y, m).expect("month in range"))
}

/// Strategy for USD installments
pub fn installment_strategy() -> impl Strategy<Value = Installment> {
    (date_strategy(), 1i64..10_000_000i64)
        .prop_map(|(date, minor)| Installment::new(date, Money::from_minor(minor, Currency::USD)))
}

/// Strategy for monthly existing receivables offsets (month index, amount)
pub fn receivable_entries_strategy(
    horizon: u32,
) -> impl Strategy<Value = Vec<(u32, Money)>> {
    proptest::collection::vec(
        (0..horizon, 0i64..20_000_000i64)
            .prop_map(|(i, minor)| (i, Money::from_minor(minor, Currency::USD))),
        0..20,
    )
}
