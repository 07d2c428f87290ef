use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use openhome_core::{Identity, PageParams, ServiceError};

use crate::api::ServiceState;
use crate::model::RecordView;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/recent-views", post(record_view))
        .route("/recent-views/posts", get(recent_posts))
        .route("/recent-views/users", get(recent_users))
}

async fn record_view(
    State(svc): State<ServiceState>,
    identity: Identity,
    Json(input): Json<RecordView>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    svc.record_view(actor, input.target_type, &input.target_id)?;
    Ok(Json(serde_json::json!({ "recorded": true })))
}

async fn recent_posts(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(page): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let items = svc.recent_posts(actor, &page)?;
    Ok(Json(serde_json::json!({ "items": items })))
}

async fn recent_users(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(page): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let items = svc.recent_users(actor, &page)?;
    Ok(Json(serde_json::json!({ "items": items })))
}
