//! Cash-flow projection handler

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use domain_lending::CashflowRequest;
use tracing::instrument;

use crate::auth::{permissions, require_role, Claims};
use crate::dto::cashflow::{CashflowQuery, CashflowResponse};
use crate::{error::ApiError, AppState};

/// Projects cash flow for the queried loan parameters
///
/// Invalid parameters are repaired or rejected according to the configured
/// validation policy. "Today" is taken in the configured business timezone.
#[instrument(skip_all)]
pub async fn get_cashflow(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<CashflowQuery>,
) -> Result<Json<CashflowResponse>, ApiError> {
    require_role(&claims, permissions::CASHFLOW_READ)?;

    let request = CashflowRequest::from(query);
    let validated = state
        .config
        .validation_policy
        .apply(&request, state.config.currency)?;

    let today = state.config.timezone.today();
    let projection = state.service.project(&validated, today).await?;

    Ok(Json(CashflowResponse::from(&projection)))
}
