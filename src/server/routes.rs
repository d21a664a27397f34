//! HTTP routes for session and transaction I/O

use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::amount::MinorUnits;
use crate::catalog::{self, AssetClass, CatalogError, InvestmentPool};
use crate::context::SessionContext;
use crate::error::WalletError;
use crate::gateway::{TransactionRequest, TransactionResult};
use crate::session::SessionState;

#[derive(Clone)]
pub struct AppState { pub ctx: Arc<SessionContext>, pub app_name: String }

impl AppState {
    pub fn new(ctx: Arc<SessionContext>, app_name: impl Into<String>) -> Self {
        Self { ctx, app_name: app_name.into() }
    }
}

/// Amount as typed by a user, e.g. `"1.5"`.
#[derive(Deserialize)]
pub struct AmountBody { amount: String }

type ApiError = (StatusCode, Json<Value>);

pub fn create_router(ctx: Arc<SessionContext>) -> Router { create_router_with_name(ctx, "fractional-wallet") }

pub fn create_router_with_name(ctx: Arc<SessionContext>, app_name: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(session_state))
        .route("/session/connect", post(session_connect))
        .route("/session/disconnect", post(session_disconnect))
        .route("/session/reset", post(session_reset))
        .route("/transactions", post(submit_transaction))
        .route("/assets", get(list_assets))
        .route("/assets/:id", get(read_asset))
        .route("/assets/:id/invest", post(invest_in_asset))
        .route("/pools", get(list_pools))
        .route("/pools/:id", get(read_pool))
        .route("/pools/:id/contribute", post(contribute_to_pool))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(ctx, app_name))
}

/// HTTP status for a wallet error.
pub fn error_status(err: &WalletError) -> StatusCode {
    match err {
        WalletError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        WalletError::NotConnected => StatusCode::UNAUTHORIZED,
        WalletError::ConnectionRejected(_) => StatusCode::FORBIDDEN,
        WalletError::ProviderNotFound => StatusCode::NOT_FOUND,
        WalletError::UnsupportedProvider { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WalletError::MalformedProviderResponse(_) | WalletError::Submission(_) => StatusCode::BAD_GATEWAY,
        WalletError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn wallet_error(err: WalletError) -> ApiError {
    (error_status(&err), Json(json!({"error": err.to_string(), "code": err.code()})))
}

fn bad_request(message: impl Into<String>, code: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({"error": message.into(), "code": code})))
}

fn catalog_error(err: CatalogError) -> ApiError { bad_request(err.to_string(), "rejected_by_catalog") }

fn not_found(kind: &str, id: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({"error": format!("{kind} not found: {id}"), "code": "not_found"})))
}

fn parse_amount(body: &AmountBody) -> Result<MinorUnits, ApiError> {
    MinorUnits::parse_decimal(&body.amount).map_err(|e| bad_request(e.to_string(), "invalid_amount"))
}

async fn health(State(s): State<AppState>) -> impl IntoResponse {
    Json(json!({"status": "ok", "service": s.app_name}))
}

async fn session_state(State(s): State<AppState>) -> Json<SessionState> { Json(s.ctx.state()) }

async fn session_connect(State(s): State<AppState>) -> Json<SessionState> { Json(s.ctx.connect().await) }

async fn session_disconnect(State(s): State<AppState>) -> Json<SessionState> { Json(s.ctx.disconnect().await) }

async fn session_reset(State(s): State<AppState>) -> Json<SessionState> { Json(s.ctx.reset()) }

async fn submit_transaction(State(s): State<AppState>, Json(body): Json<Value>) -> Result<Json<TransactionResult>, ApiError> {
    let request = TransactionRequest::from_json(body).map_err(wallet_error)?;
    s.ctx.submit(&request).await.map(Json).map_err(wallet_error)
}

async fn list_assets() -> Json<Vec<AssetClass>> { Json(catalog::asset_classes()) }

async fn read_asset(Path(id): Path<String>) -> Result<Json<AssetClass>, ApiError> {
    catalog::find_asset(&id).map(Json).ok_or_else(|| not_found("asset", &id))
}

async fn invest_in_asset(State(s): State<AppState>, Path(id): Path<String>, Json(body): Json<AmountBody>) -> Result<Json<TransactionResult>, ApiError> {
    let asset = catalog::find_asset(&id).ok_or_else(|| not_found("asset", &id))?;
    let request = asset.check_investment(parse_amount(&body)?).map_err(catalog_error)?;
    s.ctx.submit(&request).await.map(Json).map_err(wallet_error)
}

async fn list_pools() -> Json<Vec<InvestmentPool>> { Json(catalog::investment_pools()) }

async fn read_pool(Path(id): Path<String>) -> Result<Json<InvestmentPool>, ApiError> {
    catalog::find_pool(&id).map(Json).ok_or_else(|| not_found("pool", &id))
}

async fn contribute_to_pool(State(s): State<AppState>, Path(id): Path<String>, Json(body): Json<AmountBody>) -> Result<Json<TransactionResult>, ApiError> {
    let pool = catalog::find_pool(&id).ok_or_else(|| not_found("pool", &id))?;
    let request = pool.check_contribution(parse_amount(&body)?).map_err(catalog_error)?;
    s.ctx.submit(&request).await.map(Json).map_err(wallet_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Capability;

    #[test]
    fn error_statuses() {
        assert_eq!(error_status(&WalletError::InvalidRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(error_status(&WalletError::NotConnected), StatusCode::UNAUTHORIZED);
        assert_eq!(error_status(&WalletError::ProviderNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            error_status(&WalletError::UnsupportedProvider { binding: "sui".into(), capability: Capability::SignAndSubmit }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(error_status(&WalletError::Submission("Insufficient gas".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(error_status(&WalletError::MalformedProviderResponse("missing digest".into())), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn wallet_error_body_carries_code() {
        let (status, Json(body)) = wallet_error(WalletError::NotConnected);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "not_connected");
        assert_eq!(body["error"], "Wallet not connected");
    }
}
