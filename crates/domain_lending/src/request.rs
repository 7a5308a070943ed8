//! Cash-flow request boundary: raw input, validation and normalization
//!
//! Inputs arrive as loosely-typed strings (query parameters, form fields).
//! [`CashflowRequest::validate`] rejects anything unusable and lists every
//! offending field; [`CashflowRequest::normalize`] substitutes the documented
//! defaults instead and logs each substitution. [`ValidationPolicy`] picks
//! between them.

use core_kernel::{Currency, Money, Rate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{error, warn};

use crate::frequency::PaymentFrequency;
use crate::loan::{defaults, limits, LoanTerms};
use crate::receivables::{
    parse_manual_receivables, parse_recurring_receivables, ManualReceivable, RecurringReceivable,
};

/// Upper bound for both loan terms and projection horizons
pub const MAX_MONTHS: i64 = limits::MAX_TERM_MONTHS as i64;

/// Unvalidated projection request, one field per input parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowRequest {
    /// Principal of the hypothetical loan
    pub amount: Option<String>,
    /// Flat interest percent per month
    pub interest: Option<String>,
    /// Term in months
    pub terms: Option<String>,
    /// Payment scheme name
    pub scheme: Option<String>,
    #[serde(default)]
    pub rolling: bool,
    /// Projection horizon in months
    pub period: Option<String>,
    #[serde(default)]
    pub use_manual: bool,
    /// JSON array of manual receivables
    pub manual_receivables: Option<String>,
    /// JSON array of recurring receivable rules
    pub recurring_receivables: Option<String>,
}

impl CashflowRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount.to_string());
        self
    }

    pub fn with_interest(mut self, percent: Decimal) -> Self {
        self.interest = Some(percent.to_string());
        self
    }

    pub fn with_terms(mut self, months: i64) -> Self {
        self.terms = Some(months.to_string());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn with_period(mut self, months: i64) -> Self {
        self.period = Some(months.to_string());
        self
    }

    pub fn rolling(mut self) -> Self {
        self.rolling = true;
        self
    }

    /// Switches to manual receivables with the given JSON batches
    pub fn manual(mut self, manual_json: Option<String>, recurring_json: Option<String>) -> Self {
        self.use_manual = true;
        self.manual_receivables = manual_json;
        self.recurring_receivables = recurring_json;
        self
    }

    /// Strict validation; every invalid field is reported
    pub fn validate(&self, currency: Currency) -> Result<ValidatedRequest, ValidationError> {
        self.resolve(currency, ValidationPolicy::Strict)
    }

    /// Lenient normalization; invalid fields fall back to defaults
    pub fn normalize(&self, currency: Currency) -> ValidatedRequest {
        match self.resolve(currency, ValidationPolicy::Lenient) {
            Ok(request) => request,
            Err(err) => {
                error!(error = %err, "Lenient resolution reported field errors");
                ValidatedRequest::defaults(currency)
            }
        }
    }

    fn resolve(
        &self,
        currency: Currency,
        policy: ValidationPolicy,
    ) -> Result<ValidatedRequest, ValidationError> {
        let mut errors = Vec::new();

        let amount = settle(
            "amount",
            parse_decimal(self.amount.as_deref()).and_then(|v| match v {
                Some(a) if a < limits::MIN_PRINCIPAL || a > limits::MAX_PRINCIPAL => Err(format!(
                    "must be between {} and {}, got {}",
                    limits::MIN_PRINCIPAL,
                    limits::MAX_PRINCIPAL,
                    a
                )),
                other => Ok(other),
            }),
            defaults::PRINCIPAL,
            policy,
            &mut errors,
        );

        let interest = settle(
            "interest",
            parse_decimal(self.interest.as_deref()).and_then(|v| match v {
                Some(r) if r < Decimal::ZERO => Err(format!("must not be negative, got {}", r)),
                Some(r) if r > limits::MAX_INTEREST_PERCENT => Err(format!(
                    "must be at most {}, got {}",
                    limits::MAX_INTEREST_PERCENT,
                    r
                )),
                other => Ok(other),
            }),
            defaults::INTEREST_RATE,
            policy,
            &mut errors,
        );

        let term_months = settle(
            "terms",
            parse_months(self.terms.as_deref()),
            defaults::TERM_MONTHS,
            policy,
            &mut errors,
        );

        let frequency = settle(
            "scheme",
            parse_scheme(self.scheme.as_deref()),
            defaults::FREQUENCY,
            policy,
            &mut errors,
        );

        let default_horizon = if self.rolling {
            defaults::HORIZON_ROLLING
        } else {
            defaults::HORIZON_SINGLE_LOAN
        };
        let horizon_months = settle(
            "period",
            parse_months(self.period.as_deref()),
            default_horizon,
            policy,
            &mut errors,
        );

        let terms = match LoanTerms::new(
            Money::new(amount, currency),
            Rate::from_percentage(interest),
            term_months,
            frequency,
        ) {
            Ok(terms) => terms,
            Err(err) => {
                match policy {
                    ValidationPolicy::Strict => errors.push(FieldError::new("loan", err.to_string())),
                    ValidationPolicy::Lenient => warn!(
                        reason = %err,
                        "Substituting default loan terms for invalid combination"
                    ),
                }
                LoanTerms::default_terms(currency)
            }
        };

        if !errors.is_empty() {
            return Err(ValidationError { fields: errors });
        }

        let (manual_receivables, recurring_receivables) = if self.use_manual {
            (
                self.manual_receivables
                    .as_deref()
                    .map(|json| parse_manual_receivables(json, currency))
                    .unwrap_or_default(),
                self.recurring_receivables
                    .as_deref()
                    .map(|json| parse_recurring_receivables(json, currency))
                    .unwrap_or_default(),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(ValidatedRequest {
            terms,
            rolling: self.rolling,
            horizon_months,
            use_manual: self.use_manual,
            manual_receivables,
            recurring_receivables,
        })
    }
}

/// Resolves one field: parsed value, default when absent, or default plus a
/// recorded error (strict) / warning (lenient) when invalid
fn settle<T: fmt::Display>(
    field: &'static str,
    outcome: Result<Option<T>, String>,
    default: T,
    policy: ValidationPolicy,
    errors: &mut Vec<FieldError>,
) -> T {
    match outcome {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(message) => {
            match policy {
                ValidationPolicy::Strict => errors.push(FieldError::new(field, message)),
                ValidationPolicy::Lenient => warn!(
                    field,
                    reason = %message,
                    default = %default,
                    "Substituting default for invalid input"
                ),
            }
            default
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_decimal(raw: Option<&str>) -> Result<Option<Decimal>, String> {
    match non_empty(raw) {
        None => Ok(None),
        Some(text) => Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map(Some)
            .map_err(|_| format!("not a number: '{}'", text)),
    }
}

fn parse_months(raw: Option<&str>) -> Result<Option<u32>, String> {
    match non_empty(raw) {
        None => Ok(None),
        Some(text) => {
            let months: i64 = text
                .parse()
                .map_err(|_| format!("not a whole number: '{}'", text))?;
            if months <= 0 {
                Err(format!("must be at least 1, got {}", months))
            } else if months > MAX_MONTHS {
                Err(format!("must be at most {}, got {}", MAX_MONTHS, months))
            } else {
                Ok(Some(months as u32))
            }
        }
    }
}

fn parse_scheme(raw: Option<&str>) -> Result<Option<PaymentFrequency>, String> {
    match non_empty(raw) {
        None => Ok(None),
        Some(text) => PaymentFrequency::parse(text)
            .map(Some)
            .ok_or_else(|| format!("unknown payment scheme '{}'", text)),
    }
}

/// A projection request ready for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub terms: LoanTerms,
    pub rolling: bool,
    pub horizon_months: u32,
    pub use_manual: bool,
    pub manual_receivables: Vec<ManualReceivable>,
    pub recurring_receivables: Vec<RecurringReceivable>,
}

impl ValidatedRequest {
    /// Default single-loan request against scheduled receivables
    pub fn defaults(currency: Currency) -> Self {
        Self {
            terms: LoanTerms::default_terms(currency),
            rolling: false,
            horizon_months: defaults::HORIZON_SINGLE_LOAN,
            use_manual: false,
            manual_receivables: Vec::new(),
            recurring_receivables: Vec::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.terms.currency()
    }
}

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Strict validation failure listing every offending field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Invalid request fields: {}", field_names(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

fn field_names(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which boundary behavior applies to invalid input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Substitute defaults and log
    #[default]
    Lenient,
    /// Reject with a field list
    Strict,
}

impl ValidationPolicy {
    pub fn apply(
        &self,
        request: &CashflowRequest,
        currency: Currency,
    ) -> Result<ValidatedRequest, ValidationError> {
        match self {
            ValidationPolicy::Lenient => Ok(request.normalize(currency)),
            ValidationPolicy::Strict => request.validate(currency),
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(ValidationPolicy::Lenient),
            "strict" => Ok(ValidationPolicy::Strict),
            other => Err(format!("unknown validation policy: {}", other)),
        }
    }
}
