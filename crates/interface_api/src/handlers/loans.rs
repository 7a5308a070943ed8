//! Loan handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use core_kernel::LoanId;

use crate::auth::{permissions, require_role, Claims};
use crate::dto::loans::LoanScheduleResponse;
use crate::{error::ApiError, AppState};

/// Installment schedule of a persisted loan
pub async fn get_schedule(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<LoanScheduleResponse>, ApiError> {
    require_role(&claims, permissions::LOAN_READ)?;

    let loan_id: LoanId = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid loan id: {}", id)))?;
    let schedule = state.service.loan_schedule(loan_id).await?;

    Ok(Json(LoanScheduleResponse::from(&schedule)))
}
