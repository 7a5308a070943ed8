//! HTTP API Layer
//!
//! This crate provides the REST API for cash-flow projections and the loan
//! book using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Cash-flow, loan schedule, portfolio and health endpoints
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: camelCase request/response bodies
//! - **Error Handling**: Consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let ledger = Arc::new(PostgresPaymentLedger::new(pool));
//! let app = create_router(ledger, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{middleware as axum_middleware, routing::get, Router};
use domain_lending::{CashflowService, PaymentLedgerPort};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{cashflow, health, loans, portfolio};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: CashflowService,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(ledger: Arc<dyn PaymentLedgerPort>, config: ApiConfig) -> Self {
        let service = CashflowService::new(ledger, config.schedule_conventions());
        Self { service, config }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `ledger` - Payment ledger adapter backing every query
/// * `config` - API configuration
pub fn create_router(ledger: Arc<dyn PaymentLedgerPort>, config: ApiConfig) -> Router {
    let state = AppState::new(ledger, config);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Protected API routes; auth runs before audit
    let api_routes = Router::new()
        .route("/cashflow", get(cashflow::get_cashflow))
        .route("/loans/:id/schedule", get(loans::get_schedule))
        .route("/portfolio", get(portfolio::get_portfolio))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
