//! Core Kernel - Foundational types shared by the lending crates
//!
//! This crate provides the building blocks used by the domain, storage and
//! API layers:
//! - Money and rate types with precise decimal arithmetic
//! - Calendar helpers and the `MonthKey` bucketing key
//! - Strongly-typed identifiers
//! - Port infrastructure for swapping storage adapters

pub mod error;
pub mod identifiers;
pub mod money;
pub mod ports;
pub mod temporal;

pub use error::CoreError;
pub use identifiers::{ClientId, LoanId, PaymentId};
pub use money::{Currency, CurrencyFormat, Money, MoneyError, Rate};
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
pub use temporal::{MonthKey, TemporalError, Timezone};
