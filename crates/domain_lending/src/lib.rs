//! Lending Domain - Payment Schedules and Cash-Flow Projection
//!
//! This crate computes flat-interest loan schedules, folds expected
//! receivables into calendar months, and projects cash flow either for one
//! hypothetical loan or for a rolling strategy that re-lends collected
//! installments as soon as they cover a new principal.
//!
//! # Flat-Interest Model
//!
//! - Total interest is `principal × periodic rate × term months`
//! - Every installment carries the same amount
//! - Installment count depends on the payment frequency (weekly, bi-weekly,
//!   monthly, quarterly)
//!
//! # Projection Modes
//!
//! - **Single loan**: existing receivables plus one candidate loan, month by month
//! - **Rolling**: capital accumulates from receivables and is lent out in
//!   whole principals; new loans feed later months
//!
//! Existing receivables come either from the payment ledger (unpaid
//! installments of persisted loans) or from manual and recurring entries.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_lending::{CashflowRequest, CashflowEngine};
//!
//! let request = CashflowRequest::new()
//!     .with_amount(dec!(50000))
//!     .with_terms(12)
//!     .rolling()
//!     .validate(Currency::USD)?;
//!
//! let projection = CashflowEngine::default().project(&request, &payments, today);
//! ```

pub mod calculator;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod loan;
pub mod portfolio;
pub mod ports;
pub mod projection;
pub mod receivables;
pub mod request;
pub mod rolling;
pub mod schedule;
pub mod service;
pub mod statistics;

pub use engine::{CashflowEngine, CashflowProjection, ReceivablesSource};
pub use error::LendingError;
pub use frequency::{BiWeeklyConvention, MonthlyConvention, PaymentFrequency, ScheduleConventions};
pub use loan::LoanTerms;
pub use portfolio::{PortfolioSummary, RecentLoan, SchemeCount};
pub use ports::memory::InMemoryPaymentLedger;
pub use ports::{LoanRecord, LoanStatus, PaymentLedgerPort, ScheduledPayment};
pub use projection::{combine, ProjectionRow};
pub use receivables::{
    aggregate, ManualReceivable, MonthlyReceivables, Receivable, RecurrenceFrequency,
    RecurringReceivable,
};
pub use request::{CashflowRequest, FieldError, ValidatedRequest, ValidationError, ValidationPolicy};
pub use rolling::{simulate, RollingLoanSimulator, RollingProjection, SimulatedLoan};
pub use schedule::{generate_installments, Installment, LoanSchedule};
pub use service::CashflowService;
pub use statistics::{ProjectionStatistics, RollingStatistics, SingleLoanStatistics};
