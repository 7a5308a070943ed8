//! PostgreSQL Payment Ledger Adapter
//!
//! Implements `PaymentLedgerPort` over the `loan_schedules` and `payments`
//! tables using [`LoanRepository`].
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - Connection and pool errors -> `PortError::Connection` / `ServiceUnavailable`
//! - Unmappable stored values -> `PortError::Transformation`
//! - Other errors -> `PortError::Internal`

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    ClientId, Currency, DomainPort, HealthCheckResult, HealthCheckable, LoanId, Money, PaymentId,
    PortError, Rate,
};
use domain_lending::{LoanRecord, LoanTerms, PaymentFrequency, PaymentLedgerPort, ScheduledPayment};

use crate::error::DatabaseError;
use crate::repositories::loans::{LoanRepository, LoanScheduleRow, PaymentRow};

const ADAPTER_ID: &str = "postgres-payment-ledger";

/// PostgreSQL-backed implementation of `PaymentLedgerPort`
#[derive(Debug, Clone)]
pub struct PostgresPaymentLedger {
    repository: LoanRepository,
    pool: PgPool,
}

impl PostgresPaymentLedger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LoanRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &LoanRepository {
        &self.repository
    }
}

impl DomainPort for PostgresPaymentLedger {}

#[async_trait]
impl HealthCheckable for PostgresPaymentLedger {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => {
                HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e))
            }
        }
    }
}

#[async_trait]
impl PaymentLedgerPort for PostgresPaymentLedger {
    #[instrument(skip(self), fields(from = %date))]
    async fn unpaid_payments_due_from(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ScheduledPayment>, PortError> {
        let rows = self.repository.unpaid_payments_from(date).await?;
        debug!(rows = rows.len(), "Fetched unpaid payments");

        rows.into_iter()
            .map(row_to_payment)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PortError::from)
    }

    #[instrument(skip(self), fields(loan_id = %loan_id))]
    async fn loan_terms(&self, loan_id: LoanId) -> Result<(LoanTerms, NaiveDate), PortError> {
        let row = self.repository.get_loan(*loan_id.as_uuid()).await?;
        let terms = row_to_terms(&row)?;
        Ok((terms, row.start_date))
    }

    #[instrument(skip(self))]
    async fn loan_book(&self) -> Result<Vec<LoanRecord>, PortError> {
        let loans = self.repository.list_loans().await?;
        let payments = self.repository.list_payments().await?;
        debug!(loans = loans.len(), payments = payments.len(), "Fetched loan book");

        let mut by_loan: HashMap<Uuid, Vec<ScheduledPayment>> = HashMap::new();
        for row in payments {
            let loan_id = row.loan_id;
            by_loan.entry(loan_id).or_default().push(row_to_payment(row)?);
        }

        loans
            .into_iter()
            .map(|row| {
                let payments = by_loan.remove(&row.loan_id).unwrap_or_default();
                row_to_loan(row, payments).map_err(PortError::from)
            })
            .collect()
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn parse_currency(code: &str) -> Result<Currency, DatabaseError> {
    code.trim()
        .parse()
        .map_err(|_| DatabaseError::invalid_data(format!("unknown currency '{}'", code)))
}

/// Converts a payment row to a domain payment
pub(crate) fn row_to_payment(row: PaymentRow) -> Result<ScheduledPayment, DatabaseError> {
    let currency = parse_currency(&row.currency)?;
    Ok(ScheduledPayment {
        payment_id: PaymentId::from_uuid(row.payment_id),
        loan_id: LoanId::from_uuid(row.loan_id),
        due_date: row.due_date,
        amount: Money::new(row.amount, currency),
        is_paid: row.is_paid,
    })
}

/// Converts a loan row's principal, rate, term and scheme to loan terms
pub(crate) fn row_to_terms(row: &LoanScheduleRow) -> Result<LoanTerms, DatabaseError> {
    let currency = parse_currency(&row.currency)?;
    let frequency = PaymentFrequency::parse(&row.payment_scheme).ok_or_else(|| {
        DatabaseError::invalid_data(format!("unknown payment scheme '{}'", row.payment_scheme))
    })?;
    let term_months = u32::try_from(row.loan_terms).map_err(|_| {
        DatabaseError::invalid_data(format!("negative loan term {}", row.loan_terms))
    })?;

    LoanTerms::new(
        Money::new(row.loan_amount, currency),
        Rate::from_percentage(row.interest_rate),
        term_months,
        frequency,
    )
    .map_err(|e| DatabaseError::invalid_data(format!("loan {}: {}", row.loan_id, e)))
}

/// Converts a loan row and its payments to a loan record
pub(crate) fn row_to_loan(
    row: LoanScheduleRow,
    payments: Vec<ScheduledPayment>,
) -> Result<LoanRecord, DatabaseError> {
    let terms = row_to_terms(&row)?;
    let status = row
        .status
        .parse()
        .map_err(|_| DatabaseError::invalid_data(format!("unknown loan status '{}'", row.status)))?;

    Ok(LoanRecord {
        loan_id: LoanId::from_uuid(row.loan_id),
        client_id: ClientId::from_uuid(row.client_id),
        client_name: row.client_name,
        service_charge: Money::new(row.service_charge, terms.currency()),
        terms,
        start_date: row.start_date,
        status,
        payments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_lending::LoanStatus;
    use rust_decimal_macros::dec;

    fn loan_row() -> LoanScheduleRow {
        LoanScheduleRow {
            loan_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            client_name: "Liza Soberano".to_string(),
            loan_amount: dec!(20000),
            interest_rate: dec!(2.5),
            loan_terms: 6,
            payment_scheme: "bi-weekly".to_string(),
            service_charge: dec!(300),
            currency: "PHP".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            status: "active".to_string(),
        }
    }

    #[test]
    fn test_row_to_terms() {
        let terms = row_to_terms(&loan_row()).unwrap();
        assert_eq!(terms.principal(), Money::new(dec!(20000), Currency::PHP));
        assert_eq!(terms.periodic_rate().as_decimal(), dec!(0.025));
        assert_eq!(terms.term_months(), 6);
        assert_eq!(terms.frequency(), PaymentFrequency::BiWeekly);
    }

    #[test]
    fn test_row_to_terms_rejects_bad_values() {
        let mut row = loan_row();
        row.payment_scheme = "daily".to_string();
        assert!(row_to_terms(&row).is_err());

        let mut row = loan_row();
        row.loan_terms = -1;
        assert!(row_to_terms(&row).is_err());

        let mut row = loan_row();
        row.currency = "XYZ".to_string();
        let err = row_to_terms(&row).unwrap_err();
        assert!(matches!(PortError::from(err), PortError::Transformation { .. }));
    }

    #[test]
    fn test_row_to_loan() {
        let row = loan_row();
        let loan = row_to_loan(row.clone(), Vec::new()).unwrap();
        assert_eq!(loan.loan_id.as_uuid(), &row.loan_id);
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.service_charge, Money::new(dec!(300), Currency::PHP));
        assert_eq!(loan.client_name, "Liza Soberano");
    }

    #[test]
    fn test_row_to_payment() {
        let row = PaymentRow {
            payment_id: Uuid::new_v4(),
            loan_id: Uuid::new_v4(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            amount: dec!(1833.3333),
            currency: "USD".to_string(),
            is_paid: false,
        };
        let payment = row_to_payment(row).unwrap();
        assert_eq!(payment.amount, Money::new(dec!(1833.3333), Currency::USD));
        assert!(!payment.is_paid);
    }
}
