//! Loan ledger repository
//!
//! Read access to loan schedules and their installment payments. Rows are
//! returned as-is; mapping into domain values happens in the adapter.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// One row of `payments`, with the owning loan's currency
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PaymentRow {
    pub payment_id: Uuid,
    pub loan_id: Uuid,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub is_paid: bool,
}

/// One row of `loan_schedules`, joined with the client's name
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LoanScheduleRow {
    pub loan_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub loan_amount: Decimal,
    /// Percent per month
    pub interest_rate: Decimal,
    pub loan_terms: i32,
    pub payment_scheme: String,
    pub service_charge: Decimal,
    pub currency: String,
    pub start_date: NaiveDate,
    pub status: String,
}

const LOAN_COLUMNS: &str = r#"
    ls.loan_id, ls.client_id,
    c.first_name || ' ' || c.last_name AS client_name,
    ls.loan_amount, ls.interest_rate, ls.loan_terms, ls.payment_scheme,
    ls.service_charge, ls.currency, ls.start_date, ls.status
"#;

/// Repository for loan schedules and payments
#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// Creates a new LoanRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Unpaid payments due on or after `from`, earliest first
    pub async fn unpaid_payments_from(
        &self,
        from: NaiveDate,
    ) -> Result<Vec<PaymentRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT p.payment_id, p.loan_id, p.due_date, p.amount, ls.currency, p.is_paid
            FROM payments p
            JOIN loan_schedules ls ON ls.loan_id = p.loan_id
            WHERE p.is_paid = FALSE AND p.due_date >= $1
            ORDER BY p.due_date, p.payment_id
            "#,
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves a loan schedule by identifier
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no such loan exists
    pub async fn get_loan(&self, loan_id: Uuid) -> Result<LoanScheduleRow, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loan_schedules ls
            JOIN clients c ON c.client_id = ls.client_id
            WHERE ls.loan_id = $1
            "#
        );

        sqlx::query_as::<_, LoanScheduleRow>(&sql)
            .bind(loan_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Loan", loan_id))
    }

    /// Every loan schedule, most recently created first
    pub async fn list_loans(&self) -> Result<Vec<LoanScheduleRow>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loan_schedules ls
            JOIN clients c ON c.client_id = ls.client_id
            ORDER BY ls.created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, LoanScheduleRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Every payment of every loan, ordered by loan then due date
    pub async fn list_payments(&self) -> Result<Vec<PaymentRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT p.payment_id, p.loan_id, p.due_date, p.amount, ls.currency, p.is_paid
            FROM payments p
            JOIN loan_schedules ls ON ls.loan_id = p.loan_id
            ORDER BY p.loan_id, p.due_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
