//! Portfolio summary DTOs

use chrono::NaiveDate;
use core_kernel::{CurrencyFormat, Money};
use domain_lending::{PaymentFrequency, PortfolioSummary, RecentLoan, SchemeCount};
use rust_decimal::Decimal;
use serde::Serialize;

/// An amount together with its display rendering
#[derive(Debug, Serialize)]
pub struct AmountDto {
    pub amount: Decimal,
    pub formatted: String,
}

impl AmountDto {
    fn new(money: &Money, format: &CurrencyFormat) -> Self {
        Self {
            amount: money.amount(),
            formatted: format.format(money),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeCountDto {
    pub scheme: PaymentFrequency,
    pub count: u32,
}

impl From<&SchemeCount> for SchemeCountDto {
    fn from(entry: &SchemeCount) -> Self {
        Self {
            scheme: entry.scheme,
            count: entry.count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLoanDto {
    pub loan_id: String,
    pub client_name: String,
    pub amount: AmountDto,
    pub service_charge: AmountDto,
    pub start_date: NaiveDate,
    pub payment_scheme: PaymentFrequency,
}

impl RecentLoanDto {
    fn new(loan: &RecentLoan, format: &CurrencyFormat) -> Self {
        Self {
            loan_id: loan.loan_id.to_string(),
            client_name: loan.client_name.clone(),
            amount: AmountDto::new(&loan.amount, format),
            service_charge: AmountDto::new(&loan.service_charge, format),
            start_date: loan.start_date,
            payment_scheme: loan.payment_scheme,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub total_clients: u32,
    pub total_loans: u32,
    pub total_loan_amount: AmountDto,
    pub total_service_charges: AmountDto,
    pub active_loans: u32,
    pub total_paid_payments: u32,
    pub total_paid_amount: AmountDto,
    pub projected_earnings: AmountDto,
    pub projected_interest_earnings: AmountDto,
    pub upcoming_payments: u32,
    pub overdue_payments: u32,
    pub payment_schemes: Vec<SchemeCountDto>,
    pub recent_loans: Vec<RecentLoanDto>,
}

impl PortfolioResponse {
    pub fn new(summary: &PortfolioSummary, format: &CurrencyFormat) -> Self {
        Self {
            total_clients: summary.total_clients,
            total_loans: summary.total_loans,
            total_loan_amount: AmountDto::new(&summary.total_loan_amount, format),
            total_service_charges: AmountDto::new(&summary.total_service_charges, format),
            active_loans: summary.active_loans,
            total_paid_payments: summary.total_paid_payments,
            total_paid_amount: AmountDto::new(&summary.total_paid_amount, format),
            projected_earnings: AmountDto::new(&summary.projected_earnings, format),
            projected_interest_earnings: AmountDto::new(
                &summary.projected_interest_earnings,
                format,
            ),
            upcoming_payments: summary.upcoming_payments,
            overdue_payments: summary.overdue_payments,
            payment_schemes: summary.payment_schemes.iter().map(SchemeCountDto::from).collect(),
            recent_loans: summary
                .recent_loans
                .iter()
                .map(|loan| RecentLoanDto::new(loan, format))
                .collect(),
        }
    }
}
