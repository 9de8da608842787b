//! HTTP routes for quoting and administering pricing rules.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::auth::{AuthUser, Role};
use crate::error::Result;
use crate::AppState;

use super::requests::{PricingRuleRequest, QuoteRequest, VisitRequest};
use super::responses::{PricingRuleResponse, QuoteResponse};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/quote", post(quote))
        .route("/api/pricing-rules", get(list_rules).post(create_rule))
        .route("/api/pricing-rules/:id", put(update_rule).delete(delete_rule))
}

/// Quote a visit without booking it
async fn quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(req) = payload?;
    let visit = VisitRequest::try_from(req)?;
    let quote = services::quote(&state.db, &state.cache, &visit).await?;
    Ok(Json(quote.into()))
}

async fn list_rules(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PricingRuleResponse>>> {
    user.require(Role::Admin)?;
    let rules = services::load_rule_snapshot(&state.db, &state.cache).await?;
    Ok(Json(
        rules.iter().cloned().map(PricingRuleResponse::from).collect(),
    ))
}

async fn create_rule(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<PricingRuleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PricingRuleResponse>)> {
    user.require(Role::Admin)?;
    let Json(req) = payload?;
    let rule = services::create_rule(&state.db, &state.cache, req).await?;
    Ok((StatusCode::CREATED, Json(rule.into())))
}

async fn update_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    payload: std::result::Result<Json<PricingRuleRequest>, JsonRejection>,
) -> Result<Json<PricingRuleResponse>> {
    user.require(Role::Admin)?;
    let Json(req) = payload?;
    let rule = services::update_rule(&state.db, &state.cache, id, req).await?;
    Ok(Json(rule.into()))
}

async fn delete_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    user.require(Role::Admin)?;
    services::delete_rule(&state.db, &state.cache, id).await?;
    Ok(Json(serde_json::json!({ "msg": "deleted" })))
}
