//! Request and response bodies
//!
//! Wire names are camelCase; amounts are decimals serialized as strings.

pub mod cashflow;
pub mod loans;
pub mod portfolio;
