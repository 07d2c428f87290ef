use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use openhome_core::{Identity, PageParams, ServiceError};

use crate::api::ServiceState;
use crate::model::{CreatePost, PostListQuery, RecentKind};

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/posts", post(create_post).get(list_posts))
        .route("/posts/{id}", get(get_post))
}

async fn create_post(
    State(svc): State<ServiceState>,
    identity: Identity,
    Json(input): Json<CreatePost>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let actor = identity.require()?;
    let post = svc.create_post(actor, input)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(post).map_err(|e| ServiceError::Internal(e.to_string()))?),
    ))
}

async fn list_posts(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(query): Query<PostListQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let items = svc.list_posts(identity.user_id(), query.user_id.as_deref(), &page)?;
    Ok(Json(serde_json::json!({ "items": items })))
}

async fn get_post(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let view = svc.get_post(identity.user_id(), &id)?;

    // Opening a post counts as a recent view.
    if let Some(viewer) = identity.user_id() {
        svc.record_view(viewer, RecentKind::Post, &id)?;
    }

    Ok(Json(
        serde_json::to_value(view).map_err(|e| ServiceError::Internal(e.to_string()))?,
    ))
}
