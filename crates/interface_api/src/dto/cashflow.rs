//! Cash-flow projection DTOs

use chrono::NaiveDate;
use domain_lending::{
    CashflowProjection, CashflowRequest, Installment, PaymentFrequency, ProjectionRow,
    ProjectionStatistics, ReceivablesSource, RollingStatistics, SingleLoanStatistics,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query string of `GET /api/v1/cashflow`
///
/// Everything is taken as text so that unparseable values reach the
/// validation policy instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowQuery {
    pub amount: Option<String>,
    pub interest: Option<String>,
    pub terms: Option<String>,
    pub scheme: Option<String>,
    pub rolling: Option<String>,
    pub period: Option<String>,
    pub use_manual: Option<String>,
    pub manual_receivables: Option<String>,
    pub recurring_receivables: Option<String>,
}

fn is_true(flag: Option<&str>) -> bool {
    flag.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

impl From<CashflowQuery> for CashflowRequest {
    fn from(query: CashflowQuery) -> Self {
        CashflowRequest {
            rolling: is_true(query.rolling.as_deref()),
            use_manual: is_true(query.use_manual.as_deref()),
            amount: query.amount,
            interest: query.interest,
            terms: query.terms,
            scheme: query.scheme,
            period: query.period,
            manual_receivables: query.manual_receivables,
            recurring_receivables: query.recurring_receivables,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentDto {
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub month_key: String,
}

impl From<&Installment> for InstallmentDto {
    fn from(installment: &Installment) -> Self {
        Self {
            due_date: installment.due_date,
            amount: installment.amount.amount(),
            month_key: installment.month_key.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRowDto {
    pub month_key: String,
    pub month_label: String,
    pub existing_receivables: Decimal,
    pub potential_payment: Decimal,
    pub total_receivables: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_loans_issued: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_capital: Option<Decimal>,
}

impl From<&ProjectionRow> for ProjectionRowDto {
    fn from(row: &ProjectionRow) -> Self {
        Self {
            month_key: row.month_key.to_string(),
            month_label: row.month_label.clone(),
            existing_receivables: row.existing_receivables.amount(),
            potential_payment: row.potential_payment.amount(),
            total_receivables: row.total_receivables.amount(),
            new_loans_issued: row.new_loans_issued,
            running_capital: row.running_capital.map(|m| m.amount()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleLoanStatisticsDto {
    pub loan_principal: Decimal,
    pub total_interest: Decimal,
    pub total_payments: Decimal,
    pub interest_to_loan_ratio: Decimal,
    pub projection_period_months: u32,
    pub months_with_payments: u32,
}

impl From<&SingleLoanStatistics> for SingleLoanStatisticsDto {
    fn from(stats: &SingleLoanStatistics) -> Self {
        Self {
            loan_principal: stats.loan_principal.amount(),
            total_interest: stats.total_interest.amount(),
            total_payments: stats.total_payments.amount(),
            interest_to_loan_ratio: stats.interest_to_loan_ratio,
            projection_period_months: stats.projection_period_months,
            months_with_payments: stats.months_with_payments,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingStatisticsDto {
    pub total_new_loans: u32,
    pub total_principal: Decimal,
    pub total_interest: Decimal,
    pub total_payments: Decimal,
    pub final_capital: Decimal,
    pub interest_to_loan_ratio: Decimal,
    pub projection_period_months: u32,
    pub average_monthly_loan_issue: Decimal,
    pub average_monthly_return: Decimal,
}

impl From<&RollingStatistics> for RollingStatisticsDto {
    fn from(stats: &RollingStatistics) -> Self {
        Self {
            total_new_loans: stats.total_new_loans,
            total_principal: stats.total_principal.amount(),
            total_interest: stats.total_interest.amount(),
            total_payments: stats.total_payments.amount(),
            final_capital: stats.final_capital.amount(),
            interest_to_loan_ratio: stats.interest_to_loan_ratio,
            projection_period_months: stats.projection_period_months,
            average_monthly_loan_issue: stats.average_monthly_loan_issue,
            average_monthly_return: stats.average_monthly_return.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatisticsDto {
    SingleLoan(SingleLoanStatisticsDto),
    Rolling(RollingStatisticsDto),
}

impl From<&ProjectionStatistics> for StatisticsDto {
    fn from(stats: &ProjectionStatistics) -> Self {
        match stats {
            ProjectionStatistics::SingleLoan(s) => StatisticsDto::SingleLoan(s.into()),
            ProjectionStatistics::Rolling(s) => StatisticsDto::Rolling(s.into()),
        }
    }
}

/// Body of a cash-flow projection response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowResponse {
    /// Month key to amount, chronological
    pub existing_receivables: BTreeMap<String, Decimal>,
    pub potential_loan_payments: Vec<InstallmentDto>,
    pub cash_flow_projection: Vec<ProjectionRowDto>,
    pub loan_amount: Decimal,
    /// Percent per month
    pub interest_rate: Decimal,
    pub loan_terms: u32,
    pub payment_scheme: PaymentFrequency,
    pub rolling_loans: bool,
    pub projection_months: u32,
    pub use_manual_receivables: bool,
    pub receivables_source: ReceivablesSource,
    pub statistics: StatisticsDto,
}

impl From<&CashflowProjection> for CashflowResponse {
    fn from(projection: &CashflowProjection) -> Self {
        let terms = &projection.terms;
        Self {
            existing_receivables: projection
                .existing_receivables
                .iter()
                .map(|(month, amount)| (month.to_string(), amount.amount()))
                .collect(),
            potential_loan_payments: projection
                .potential_installments
                .iter()
                .map(InstallmentDto::from)
                .collect(),
            cash_flow_projection: projection.rows.iter().map(ProjectionRowDto::from).collect(),
            loan_amount: terms.principal().amount(),
            interest_rate: terms.periodic_rate().as_percentage(),
            loan_terms: terms.term_months(),
            payment_scheme: terms.frequency(),
            rolling_loans: projection.rolling,
            projection_months: projection.horizon_months,
            use_manual_receivables: projection.use_manual,
            receivables_source: projection.source,
            statistics: (&projection.statistics).into(),
        }
    }
}
