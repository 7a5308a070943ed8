//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL storage for the loan ledger using SQLx:
//! connection pooling, embedded migrations, a read repository over the
//! `loan_schedules` and `payments` tables, and the adapter that exposes them
//! to the lending domain through `PaymentLedgerPort`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresPaymentLedger};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/lending")).await?;
//! run_migrations(&pool).await?;
//! let ledger = PostgresPaymentLedger::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresPaymentLedger;
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::LoanRepository;
