//! Flat-interest payment calculator
//!
//! Interest is `principal × rate × term` and is spread evenly across the
//! term; there is no declining-balance amortization. Every installment of a
//! loan therefore has the same amount.

use core_kernel::{Money, Rate};
use rust_decimal::Decimal;

use crate::frequency::PaymentFrequency;
use crate::loan::LoanTerms;

/// Total flat interest over the whole term
pub fn total_interest(terms: &LoanTerms) -> Money {
    terms
        .periodic_rate()
        .apply(&terms.principal())
        .multiply(Decimal::from(terms.term_months()))
}

/// Principal plus flat interest
pub fn total_repayment(terms: &LoanTerms) -> Money {
    terms.principal() + total_interest(terms)
}

/// Amount of a single installment under the loan's frequency
pub fn periodic_payment(terms: &LoanTerms) -> Money {
    compute_periodic_payment(
        terms.principal(),
        terms.periodic_rate(),
        terms.term_months(),
        terms.frequency(),
    )
}

/// Raw calculator over unvalidated parameters
///
/// # Arguments
///
/// * `principal` - Amount lent
/// * `periodic_rate` - Flat rate per nominal month
/// * `term_months` - Nominal term; callers are expected to sanitize it first
/// * `frequency` - Scales the monthly-equivalent payment (÷4, ÷2, ×1, ×3)
///
/// # Returns
///
/// The per-installment amount. A zero term is treated as one month rather
/// than dividing by zero.
pub fn compute_periodic_payment(
    principal: Money,
    periodic_rate: Rate,
    term_months: u32,
    frequency: PaymentFrequency,
) -> Money {
    let term = Decimal::from(term_months.max(1));
    let interest = periodic_rate.apply(&principal).multiply(term);
    let base_monthly = Money::new((principal + interest).amount() / term, principal.currency());
    base_monthly.multiply(frequency.payment_factor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn terms(frequency: PaymentFrequency) -> LoanTerms {
        LoanTerms::new(
            Money::new(dec!(50000), Currency::USD),
            Rate::from_percentage(dec!(1.5)),
            12,
            frequency,
        )
        .unwrap()
    }

    #[test]
    fn test_total_interest_is_flat() {
        let t = terms(PaymentFrequency::Monthly);
        assert_eq!(total_interest(&t).amount(), dec!(9000));
        assert_eq!(total_repayment(&t).amount(), dec!(59000));
    }

    #[test]
    fn test_monthly_payment() {
        let payment = periodic_payment(&terms(PaymentFrequency::Monthly));
        assert_eq!(payment.amount(), dec!(4916.6667));
    }

    #[test]
    fn test_frequency_scaling() {
        assert_eq!(
            periodic_payment(&terms(PaymentFrequency::Weekly)).amount(),
            dec!(1229.1667)
        );
        assert_eq!(
            periodic_payment(&terms(PaymentFrequency::BiWeekly)).amount(),
            dec!(2458.3334)
        );
        assert_eq!(
            periodic_payment(&terms(PaymentFrequency::Quarterly)).amount(),
            dec!(14750.0001)
        );
    }

    #[test]
    fn test_zero_term_does_not_divide_by_zero() {
        let payment = compute_periodic_payment(
            Money::new(dec!(1000), Currency::USD),
            Rate::from_percentage(dec!(2)),
            0,
            PaymentFrequency::Monthly,
        );
        assert_eq!(payment.amount(), dec!(1020));
    }

    #[test]
    fn test_zero_interest_splits_principal() {
        let payment = compute_periodic_payment(
            Money::new(dec!(1200), Currency::USD),
            Rate::from_percentage(Decimal::ZERO),
            12,
            PaymentFrequency::Monthly,
        );
        assert_eq!(payment.amount(), dec!(100));
    }
}
