//! Lending Domain Ports
//!
//! The projection engine never touches storage. Everything it needs from the
//! persisted loan book comes through [`PaymentLedgerPort`]:
//!
//! - **PostgreSQL adapter**: `infra_db::PostgresPaymentLedger`
//! - **In-memory adapter**: [`memory::InMemoryPaymentLedger`], for tests and local runs
//!
//! ```rust,ignore
//! let ledger: Arc<dyn PaymentLedgerPort> = Arc::new(PostgresPaymentLedger::new(pool));
//! let service = CashflowService::new(ledger, ScheduleConventions::default());
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{
    ClientId, DomainPort, HealthCheckable, LoanId, Money, MonthKey, PaymentId, PortError,
};

use crate::loan::LoanTerms;
use crate::receivables::Receivable;

/// A persisted installment as recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_id: PaymentId,
    pub loan_id: LoanId,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub is_paid: bool,
}

impl Receivable for ScheduledPayment {
    fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.due_date)
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

/// Lifecycle of a persisted loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Active,
    Completed,
    Defaulted,
    Restructured,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Completed => "completed",
            LoanStatus::Defaulted => "defaulted",
            LoanStatus::Restructured => "restructured",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(LoanStatus::Active),
            "completed" => Ok(LoanStatus::Completed),
            "defaulted" => Ok(LoanStatus::Defaulted),
            "restructured" => Ok(LoanStatus::Restructured),
            other => Err(PortError::transformation(format!("unknown loan status: {}", other))),
        }
    }
}

/// A persisted loan with its recorded payments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: LoanId,
    pub client_id: ClientId,
    pub client_name: String,
    pub terms: LoanTerms,
    pub service_charge: Money,
    pub start_date: NaiveDate,
    pub status: LoanStatus,
    pub payments: Vec<ScheduledPayment>,
}

impl LoanRecord {
    pub fn unpaid_payments(&self) -> impl Iterator<Item = &ScheduledPayment> {
        self.payments.iter().filter(|p| !p.is_paid)
    }

    pub fn paid_payments(&self) -> impl Iterator<Item = &ScheduledPayment> {
        self.payments.iter().filter(|p| p.is_paid)
    }
}

/// Read access to the persisted loan book
#[async_trait]
pub trait PaymentLedgerPort: DomainPort + HealthCheckable {
    /// All unpaid payments with `due_date >= date`, ordered by due date
    async fn unpaid_payments_due_from(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ScheduledPayment>, PortError>;

    /// A loan's terms and start date
    ///
    /// Returns `PortError::NotFound` when the loan does not exist.
    async fn loan_terms(&self, loan_id: LoanId) -> Result<(LoanTerms, NaiveDate), PortError>;

    /// Every loan with its payments
    async fn loan_book(&self) -> Result<Vec<LoanRecord>, PortError>;
}

/// In-memory ledger adapter
pub mod memory {
    use super::*;
    use core_kernel::HealthCheckResult;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default, Clone)]
    pub struct InMemoryPaymentLedger {
        loans: Arc<RwLock<Vec<LoanRecord>>>,
    }

    impl InMemoryPaymentLedger {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_loans(loans: Vec<LoanRecord>) -> Self {
            Self {
                loans: Arc::new(RwLock::new(loans)),
            }
        }

        pub async fn insert(&self, loan: LoanRecord) {
            self.loans.write().await.push(loan);
        }

        /// Marks a payment as paid; returns false when the payment is unknown
        pub async fn mark_paid(&self, payment_id: PaymentId) -> bool {
            let mut loans = self.loans.write().await;
            for payment in loans.iter_mut().flat_map(|l| l.payments.iter_mut()) {
                if payment.payment_id == payment_id {
                    payment.is_paid = true;
                    return true;
                }
            }
            false
        }
    }

    impl DomainPort for InMemoryPaymentLedger {}

    #[async_trait]
    impl HealthCheckable for InMemoryPaymentLedger {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("in-memory-ledger", 0)
        }
    }

    #[async_trait]
    impl PaymentLedgerPort for InMemoryPaymentLedger {
        async fn unpaid_payments_due_from(
            &self,
            date: NaiveDate,
        ) -> Result<Vec<ScheduledPayment>, PortError> {
            let loans = self.loans.read().await;
            let mut payments: Vec<ScheduledPayment> = loans
                .iter()
                .flat_map(|l| l.payments.iter())
                .filter(|p| !p.is_paid && p.due_date >= date)
                .cloned()
                .collect();
            payments.sort_by_key(|p| p.due_date);
            Ok(payments)
        }

        async fn loan_terms(&self, loan_id: LoanId) -> Result<(LoanTerms, NaiveDate), PortError> {
            self.loans
                .read()
                .await
                .iter()
                .find(|l| l.loan_id == loan_id)
                .map(|l| (l.terms, l.start_date))
                .ok_or_else(|| PortError::not_found("Loan", loan_id))
        }

        async fn loan_book(&self) -> Result<Vec<LoanRecord>, PortError> {
            Ok(self.loans.read().await.clone())
        }
    }
}
