//! Loan schedule DTOs

use chrono::NaiveDate;
use domain_lending::{LoanSchedule, PaymentFrequency};
use rust_decimal::Decimal;
use serde::Serialize;

use super::cashflow::InstallmentDto;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanScheduleResponse {
    pub loan_id: String,
    pub loan_amount: Decimal,
    pub interest_rate: Decimal,
    pub loan_terms: u32,
    pub payment_scheme: PaymentFrequency,
    pub start_date: NaiveDate,
    pub periodic_payment: Decimal,
    pub total_amount: Decimal,
    pub final_due_date: Option<NaiveDate>,
    pub installments: Vec<InstallmentDto>,
}

impl From<&LoanSchedule> for LoanScheduleResponse {
    fn from(schedule: &LoanSchedule) -> Self {
        Self {
            loan_id: schedule.loan_id.to_string(),
            loan_amount: schedule.terms.principal().amount(),
            interest_rate: schedule.terms.periodic_rate().as_percentage(),
            loan_terms: schedule.terms.term_months(),
            payment_scheme: schedule.terms.frequency(),
            start_date: schedule.start_date,
            periodic_payment: schedule.periodic_payment.amount(),
            total_amount: schedule.total_amount().amount(),
            final_due_date: schedule.final_due_date(),
            installments: schedule.installments.iter().map(InstallmentDto::from).collect(),
        }
    }
}
