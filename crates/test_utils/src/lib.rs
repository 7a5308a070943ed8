//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! lending test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed dates, amounts and loan terms
//! - `builders`: Builder patterns for ledger payments and loans
//! - `assertions`: Custom assertion helpers for money and projection rows
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
