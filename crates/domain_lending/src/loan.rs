//! Loan terms value object

use core_kernel::{Currency, Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;
use crate::frequency::PaymentFrequency;

/// Defaults substituted for missing or invalid loan parameters
pub mod defaults {
    use super::*;

    pub const PRINCIPAL: Decimal = dec!(50000);
    /// Percent per nominal month
    pub const INTEREST_RATE: Decimal = dec!(1.5);
    pub const TERM_MONTHS: u32 = 12;
    pub const FREQUENCY: PaymentFrequency = PaymentFrequency::Monthly;
    pub const HORIZON_SINGLE_LOAN: u32 = 24;
    pub const HORIZON_ROLLING: u32 = 12;
    /// Used when a caller hands the combiner or simulator a zero horizon
    pub const HORIZON_FALLBACK: u32 = 12;
}

/// Accepted ranges for loan parameters
///
/// Keeps `principal × (1 + rate × MAX_TERM_MONTHS)` and the rolling pool
/// far below `Decimal::MAX`.
pub mod limits {
    use super::*;

    pub const MIN_PRINCIPAL: Decimal = dec!(1);
    pub const MAX_PRINCIPAL: Decimal = dec!(1000000000000000);
    /// Percent per nominal month
    pub const MAX_INTEREST_PERCENT: Decimal = dec!(100);
    pub const MAX_TERM_MONTHS: u32 = 600;
}

/// Immutable parameters of one loan
///
/// Construction enforces the ranges in [`limits`], so the calculator and
/// schedule generator can treat the terms as sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    principal: Money,
    periodic_rate: Rate,
    term_months: u32,
    frequency: PaymentFrequency,
}

impl LoanTerms {
    /// Creates validated loan terms
    ///
    /// # Arguments
    ///
    /// * `principal` - Amount lent, between `MIN_PRINCIPAL` and `MAX_PRINCIPAL`
    /// * `periodic_rate` - Flat interest per nominal month, at most `MAX_INTEREST_PERCENT`
    /// * `term_months` - Nominal term in months, 1 to `MAX_TERM_MONTHS`
    /// * `frequency` - Installment cadence
    pub fn new(
        principal: Money,
        periodic_rate: Rate,
        term_months: u32,
        frequency: PaymentFrequency,
    ) -> Result<Self, LendingError> {
        let amount = principal.amount();
        if amount < limits::MIN_PRINCIPAL || amount > limits::MAX_PRINCIPAL {
            return Err(LendingError::invalid_terms(format!(
                "principal must be between {} and {}, got {}",
                limits::MIN_PRINCIPAL,
                limits::MAX_PRINCIPAL,
                amount
            )));
        }
        let percent = periodic_rate.as_percentage();
        if percent < Decimal::ZERO || percent > limits::MAX_INTEREST_PERCENT {
            return Err(LendingError::invalid_terms(format!(
                "interest rate must be between 0% and {}%, got {}",
                limits::MAX_INTEREST_PERCENT,
                periodic_rate
            )));
        }
        if term_months == 0 || term_months > limits::MAX_TERM_MONTHS {
            return Err(LendingError::invalid_terms(format!(
                "term must be between 1 and {} months, got {}",
                limits::MAX_TERM_MONTHS,
                term_months
            )));
        }

        Ok(Self {
            principal,
            periodic_rate,
            term_months,
            frequency,
        })
    }

    /// 50,000 at 1.5% per month over 12 monthly installments
    pub fn default_terms(currency: Currency) -> Self {
        Self {
            principal: Money::new(defaults::PRINCIPAL, currency),
            periodic_rate: Rate::from_percentage(defaults::INTEREST_RATE),
            term_months: defaults::TERM_MONTHS,
            frequency: defaults::FREQUENCY,
        }
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn periodic_rate(&self) -> Rate {
        self.periodic_rate
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn frequency(&self) -> PaymentFrequency {
        self.frequency
    }

    pub fn currency(&self) -> Currency {
        self.principal.currency()
    }

    /// Number of installments these terms produce
    pub fn installment_count(&self) -> u32 {
        self.frequency.installment_count(self.term_months)
    }

    /// Same loan with a different cadence
    pub fn with_frequency(self, frequency: PaymentFrequency) -> Self {
        Self { frequency, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_terms() {
        let terms = LoanTerms::default_terms(Currency::USD);
        assert_eq!(terms.principal().amount(), dec!(50000));
        assert_eq!(terms.periodic_rate().as_percentage(), dec!(1.5));
        assert_eq!(terms.term_months(), 12);
        assert_eq!(terms.frequency(), PaymentFrequency::Monthly);
        assert_eq!(terms.installment_count(), 12);
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let result = LoanTerms::new(
            Money::zero(Currency::USD),
            Rate::from_percentage(dec!(1.5)),
            12,
            PaymentFrequency::Monthly,
        );
        assert!(matches!(result, Err(LendingError::InvalidTerms(_))));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let result = LoanTerms::new(
            Money::new(dec!(1000), Currency::USD),
            Rate::from_percentage(dec!(-0.5)),
            12,
            PaymentFrequency::Monthly,
        );
        assert!(matches!(result, Err(LendingError::InvalidTerms(_))));
    }

    #[test]
    fn test_rejects_zero_term() {
        let result = LoanTerms::new(
            Money::new(dec!(1000), Currency::USD),
            Rate::from_percentage(dec!(1.5)),
            0,
            PaymentFrequency::Weekly,
        );
        assert!(matches!(result, Err(LendingError::InvalidTerms(_))));
    }

    #[test]
    fn test_zero_rate_is_allowed() {
        let terms = LoanTerms::new(
            Money::new(dec!(1200), Currency::USD),
            Rate::from_percentage(Decimal::ZERO),
            12,
            PaymentFrequency::Monthly,
        )
        .unwrap();
        assert!(terms.periodic_rate().as_decimal().is_zero());
    }

    #[test]
    fn test_rejects_principal_outside_limits() {
        for amount in [dec!(0.5), limits::MAX_PRINCIPAL + dec!(1)] {
            let result = LoanTerms::new(
                Money::new(amount, Currency::USD),
                Rate::from_percentage(dec!(1.5)),
                12,
                PaymentFrequency::Monthly,
            );
            assert!(matches!(result, Err(LendingError::InvalidTerms(_))), "{}", amount);
        }

        let largest = LoanTerms::new(
            Money::new(limits::MAX_PRINCIPAL, Currency::USD),
            Rate::from_percentage(limits::MAX_INTEREST_PERCENT),
            limits::MAX_TERM_MONTHS,
            PaymentFrequency::Weekly,
        );
        assert!(largest.is_ok());
    }

    #[test]
    fn test_rejects_rate_and_term_above_limits() {
        let steep = LoanTerms::new(
            Money::new(dec!(1000), Currency::USD),
            Rate::from_percentage(dec!(100.01)),
            12,
            PaymentFrequency::Monthly,
        );
        assert!(matches!(steep, Err(LendingError::InvalidTerms(_))));

        let long = LoanTerms::new(
            Money::new(dec!(1000), Currency::USD),
            Rate::from_percentage(dec!(1.5)),
            limits::MAX_TERM_MONTHS + 1,
            PaymentFrequency::Monthly,
        );
        assert!(matches!(long, Err(LendingError::InvalidTerms(_))));
    }
}
