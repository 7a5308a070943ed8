//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_lending::ProjectionRow;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Arguments
///
/// * `actual` - The actual Money value
/// * `expected` - The expected Money value
/// * `tolerance` - The allowed difference in the amount
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that rows are strictly chronological, one per consecutive month
pub fn assert_rows_chronological(rows: &[ProjectionRow]) {
    for pair in rows.windows(2) {
        assert_eq!(
            pair[0].month_key.next(),
            pair[1].month_key,
            "Rows not consecutive: {} followed by {}",
            pair[0].month_key,
            pair[1].month_key
        );
    }
}

/// Asserts that every row's total is the sum of its two sources
pub fn assert_row_totals_consistent(rows: &[ProjectionRow]) {
    for row in rows {
        assert_eq!(
            row.total_receivables,
            row.existing_receivables + row.potential_payment,
            "Inconsistent total in {}",
            row.month_key
        );
    }
}
