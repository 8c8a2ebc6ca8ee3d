//! Request handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use bondbook_core::BondFilter;

use crate::dto::{BondPayload, BondResponse};
use crate::error::ApiResult;
use crate::identity::Identity;
use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    currencies: u64,
}

/// Health check handler. Not authenticated.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let currencies = state.service.currency_count().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        currencies,
    }))
}

/// List the caller's bonds.
///
/// Query keys `legal_name`, `currency`, `lei`, `isin`, `size` and
/// `maturity` filter by equality; other keys are ignored.
pub async fn list_bonds(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<BondResponse>>> {
    let filter = BondFilter::from_pairs(params);
    let bonds = state.service.list(&owner, &filter).await?;
    Ok(Json(bonds.into_iter().map(BondResponse::from).collect()))
}

/// Create a bond owned by the caller.
pub async fn create_bond(
    State(state): State<AppState>,
    Identity(owner): Identity,
    BondPayload(request): BondPayload,
) -> ApiResult<(StatusCode, Json<BondResponse>)> {
    let bond = state
        .service
        .create(&owner, &request.into_submission())
        .await?;
    Ok((StatusCode::CREATED, Json(bond.into())))
}
