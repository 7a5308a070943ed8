//! Lending services
//!
//! [`CashflowService`] is the async entry point used by the HTTP layer. It
//! pulls whatever the engine needs from the [`PaymentLedgerPort`] and hands
//! it to the pure [`CashflowEngine`].

use chrono::NaiveDate;
use core_kernel::{Currency, LoanId, PortError};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::engine::{CashflowEngine, CashflowProjection};
use crate::error::LendingError;
use crate::frequency::ScheduleConventions;
use crate::portfolio::PortfolioSummary;
use crate::ports::PaymentLedgerPort;
use crate::request::ValidatedRequest;
use crate::schedule::LoanSchedule;

/// Service for cash-flow projections and loan book queries
#[derive(Clone)]
pub struct CashflowService {
    ledger: Arc<dyn PaymentLedgerPort>,
    engine: CashflowEngine,
}

impl CashflowService {
    pub fn new(ledger: Arc<dyn PaymentLedgerPort>, conventions: ScheduleConventions) -> Self {
        Self {
            ledger,
            engine: CashflowEngine::new(conventions),
        }
    }

    pub fn engine(&self) -> &CashflowEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &Arc<dyn PaymentLedgerPort> {
        &self.ledger
    }

    /// Runs a projection anchored at `today`
    ///
    /// The ledger is only consulted when the request does not use manual
    /// receivables.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::Ledger` if the ledger cannot be read
    #[instrument(skip(self, request), fields(rolling = request.rolling, manual = request.use_manual))]
    pub async fn project(
        &self,
        request: &ValidatedRequest,
        today: NaiveDate,
    ) -> Result<CashflowProjection, LendingError> {
        let payments = if request.use_manual {
            Vec::new()
        } else {
            self.ledger.unpaid_payments_due_from(today).await?
        };
        debug!(payments = payments.len(), "Loaded ledger receivables");

        Ok(self.engine.project(request, &payments, today))
    }

    /// Regenerates the installment schedule of a persisted loan
    ///
    /// # Errors
    ///
    /// Returns `LendingError::LoanNotFound` for an unknown loan
    #[instrument(skip(self), fields(loan_id = %loan_id))]
    pub async fn loan_schedule(&self, loan_id: LoanId) -> Result<LoanSchedule, LendingError> {
        let (terms, start_date) = self.ledger.loan_terms(loan_id).await.map_err(|err| {
            if err.is_not_found() {
                LendingError::LoanNotFound(loan_id.to_string())
            } else {
                LendingError::Ledger(err)
            }
        })?;

        Ok(LoanSchedule::generate(
            loan_id,
            terms,
            start_date,
            &self.engine.conventions(),
        ))
    }

    /// Dashboard summary of the whole loan book
    #[instrument(skip(self))]
    pub async fn portfolio(
        &self,
        today: NaiveDate,
        currency: Currency,
    ) -> Result<PortfolioSummary, LendingError> {
        let loans = self.ledger.loan_book().await?;
        Ok(PortfolioSummary::compute(&loans, today, currency))
    }

    /// Whether the ledger adapter reports healthy
    pub async fn ledger_ready(&self) -> Result<(), PortError> {
        let result = self.ledger.health_check().await;
        if result.is_healthy() {
            Ok(())
        } else {
            let service = match result.message {
                Some(message) => format!("{}: {}", result.adapter_id, message),
                None => result.adapter_id,
            };
            Err(PortError::ServiceUnavailable { service })
        }
    }
}
