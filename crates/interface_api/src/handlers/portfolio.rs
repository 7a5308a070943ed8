//! Portfolio handler

use axum::{extract::State, Extension, Json};

use crate::auth::{permissions, require_role, Claims};
use crate::dto::portfolio::PortfolioResponse;
use crate::{error::ApiError, AppState};

/// Dashboard summary of the loan book
pub async fn get_portfolio(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    require_role(&claims, permissions::PORTFOLIO_READ)?;

    let today = state.config.timezone.today();
    let summary = state.service.portfolio(today, state.config.currency).await?;

    Ok(Json(PortfolioResponse::new(
        &summary,
        &state.config.currency_format(),
    )))
}
