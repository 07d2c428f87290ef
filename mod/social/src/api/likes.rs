use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use openhome_core::{Identity, ServiceError};

use crate::api::ServiceState;
use crate::model::LikeRequest;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/likes", post(like))
        .route("/likes/@cancel", post(unlike))
        .route("/likes/@status", get(like_status))
}

// ---------------------------------------------------------------------------
// POST /likes
// ---------------------------------------------------------------------------

async fn like(
    State(svc): State<ServiceState>,
    identity: Identity,
    Json(req): Json<LikeRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let liked = svc.like(actor, req.target_type, &req.target_id)?;
    Ok(Json(serde_json::json!({ "liked": liked })))
}

// ---------------------------------------------------------------------------
// POST /likes/@cancel
// ---------------------------------------------------------------------------

async fn unlike(
    State(svc): State<ServiceState>,
    identity: Identity,
    Json(req): Json<LikeRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let removed = svc.unlike(actor, req.target_type, &req.target_id)?;
    Ok(Json(serde_json::json!({ "liked": !removed })))
}

// ---------------------------------------------------------------------------
// GET /likes/@status — optional auth; anonymous means "not liked"
// ---------------------------------------------------------------------------

async fn like_status(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(req): Query<LikeRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let liked = svc.check_like_status(identity.user_id(), req.target_type, &req.target_id)?;
    Ok(Json(serde_json::json!({ "liked": liked })))
}
