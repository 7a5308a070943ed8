//! Request handlers

pub mod cashflow;
pub mod health;
pub mod loans;
pub mod portfolio;
