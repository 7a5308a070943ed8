//! Repository implementations for the loan ledger
//!
//! Repositories encapsulate SQL queries and return plain row types; the
//! adapters map rows into domain values.

pub mod loans;

pub use loans::{LoanRepository, LoanScheduleRow, PaymentRow};
