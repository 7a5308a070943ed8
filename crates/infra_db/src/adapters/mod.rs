//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresPaymentLedger;
//! use domain_lending::PaymentLedgerPort;
//!
//! let ledger = PostgresPaymentLedger::new(pool);
//! let due = ledger.unpaid_payments_due_from(today).await?;
//! ```

pub mod ledger;

pub use ledger::PostgresPaymentLedger;
