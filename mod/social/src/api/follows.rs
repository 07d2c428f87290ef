use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use openhome_core::{Identity, PageParams, ServiceError};

use crate::api::ServiceState;
use crate::model::{FollowListQuery, FollowRequest};

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/follows", post(follow))
        .route("/follows/@cancel", post(unfollow))
        .route("/follows/@status", get(follow_status))
        .route("/follows/@following", get(list_following))
        .route("/follows/@followers", get(list_followers))
}

async fn follow(
    State(svc): State<ServiceState>,
    identity: Identity,
    Json(req): Json<FollowRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    svc.follow(actor, &req.user_id)?;
    Ok(Json(serde_json::json!({ "following": true })))
}

async fn unfollow(
    State(svc): State<ServiceState>,
    identity: Identity,
    Json(req): Json<FollowRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    svc.unfollow(actor, &req.user_id)?;
    Ok(Json(serde_json::json!({ "following": false })))
}

// Optional auth; anonymous means "not following".
async fn follow_status(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(req): Query<FollowRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let following = svc.check_follow_status(identity.user_id(), &req.user_id)?;
    Ok(Json(serde_json::json!({ "following": following })))
}

/// Resolve whose list is wanted: the named user, else the caller.
fn subject(identity: &Identity, query: &FollowListQuery) -> Result<String, ServiceError> {
    match &query.user_id {
        Some(id) if !id.is_empty() => Ok(id.clone()),
        _ => identity.require().map(str::to_string),
    }
}

async fn list_following(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(query): Query<FollowListQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user_id = subject(&identity, &query)?;
    let items = svc.list_following(&user_id, &page)?;
    Ok(Json(serde_json::json!({ "items": items })))
}

async fn list_followers(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(query): Query<FollowListQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user_id = subject(&identity, &query)?;
    let items = svc.list_followers(&user_id, &page)?;
    Ok(Json(serde_json::json!({ "items": items })))
}
