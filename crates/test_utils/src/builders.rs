//! Test Data Builders
//!
//! Provides builder patterns for constructing ledger data with sensible
//! defaults. Tests specify only the relevant fields.

use chrono::NaiveDate;
use core_kernel::{ClientId, LoanId, Money, PaymentId};
use domain_lending::{
    generate_installments, LoanRecord, LoanStatus, LoanTerms, ScheduleConventions,
    ScheduledPayment,
};

use crate::fixtures::{DateFixtures, LoanFixtures, MoneyFixtures};

/// Builder for a single ledger payment
pub struct ScheduledPaymentBuilder {
    payment_id: PaymentId,
    loan_id: LoanId,
    due_date: NaiveDate,
    amount: Money,
    is_paid: bool,
}

impl Default for ScheduledPaymentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduledPaymentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            payment_id: PaymentId::new(),
            loan_id: LoanId::new(),
            due_date: DateFixtures::month_end_start(),
            amount: MoneyFixtures::usd_monthly_installment(),
            is_paid: false,
        }
    }

    pub fn with_loan_id(mut self, id: LoanId) -> Self {
        self.loan_id = id;
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = date;
        self
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Marks the payment as collected
    pub fn paid(mut self) -> Self {
        self.is_paid = true;
        self
    }

    pub fn build(self) -> ScheduledPayment {
        ScheduledPayment {
            payment_id: self.payment_id,
            loan_id: self.loan_id,
            due_date: self.due_date,
            amount: self.amount,
            is_paid: self.is_paid,
        }
    }
}

/// Builder for a persisted loan with its payments
pub struct LoanRecordBuilder {
    loan_id: LoanId,
    client_id: ClientId,
    client_name: String,
    terms: LoanTerms,
    service_charge: Money,
    start_date: NaiveDate,
    status: LoanStatus,
    payments: Option<Vec<ScheduledPayment>>,
    paid_count: usize,
}

impl Default for LoanRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanRecordBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            loan_id: LoanId::new(),
            client_id: ClientId::new(),
            client_name: "Test Client".to_string(),
            terms: LoanFixtures::default_terms(),
            service_charge: MoneyFixtures::usd(rust_decimal_macros::dec!(500)),
            start_date: DateFixtures::today(),
            status: LoanStatus::Active,
            payments: None,
            paid_count: 0,
        }
    }

    pub fn with_loan_id(mut self, id: LoanId) -> Self {
        self.loan_id = id;
        self
    }

    pub fn with_client(mut self, id: ClientId, name: impl Into<String>) -> Self {
        self.client_id = id;
        self.client_name = name.into();
        self
    }

    pub fn with_terms(mut self, terms: LoanTerms) -> Self {
        self.terms = terms;
        self
    }

    pub fn with_service_charge(mut self, charge: Money) -> Self {
        self.service_charge = charge;
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    pub fn with_status(mut self, status: LoanStatus) -> Self {
        self.status = status;
        self
    }

    /// Uses explicit payments instead of the generated schedule
    pub fn with_payments(mut self, payments: Vec<ScheduledPayment>) -> Self {
        self.payments = Some(payments);
        self
    }

    /// Marks the first `count` generated installments as paid
    pub fn with_paid_installments(mut self, count: usize) -> Self {
        self.paid_count = count;
        self
    }

    /// Builds the loan; without explicit payments its schedule is generated
    /// from the terms and start date
    pub fn build(self) -> LoanRecord {
        let loan_id = self.loan_id;
        let paid_count = self.paid_count;
        let payments = match self.payments {
            Some(payments) => payments,
            None => generate_installments(
                &self.terms,
                self.start_date,
                &ScheduleConventions::default(),
            )
            .into_iter()
            .enumerate()
            .map(|(i, installment)| {
                let builder = ScheduledPaymentBuilder::new()
                    .with_loan_id(loan_id)
                    .with_due_date(installment.due_date)
                    .with_amount(installment.amount);
                if i < paid_count {
                    builder.paid().build()
                } else {
                    builder.build()
                }
            })
            .collect(),
        };

        LoanRecord {
            loan_id,
            client_id: self.client_id,
            client_name: self.client_name,
            terms: self.terms,
            service_charge: self.service_charge,
            start_date: self.start_date,
            status: self.status,
            payments,
        }
    }
}
