use axum::extract::{Path, Query, State};
use axum::routing::{post, put};
use axum::{Json, Router};

use openhome_core::{Identity, PageParams, ServiceError};

use crate::api::ServiceState;
use crate::model::{CommentListQuery, ContentStatus, CreateComment, UpdateContent};

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/comments", post(create_comment).get(list_comments))
        .route("/comments/{id}", put(update_comment).delete(delete_comment))
        .route("/comments/{id}/@archive", post(archive_comment))
        .route("/comments/{id}/@unarchive", post(unarchive_comment))
}

async fn create_comment(
    State(svc): State<ServiceState>,
    identity: Identity,
    Json(input): Json<CreateComment>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let actor = identity.require()?;
    let view = svc.create_comment(actor, &input.post_id, &input.content)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(view).map_err(|e| ServiceError::Internal(e.to_string()))?),
    ))
}

async fn list_comments(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(query): Query<CommentListQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let items = svc.list_comments(identity.user_id(), &query.post_id, &page)?;
    Ok(Json(serde_json::json!({ "items": items })))
}

async fn update_comment(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(input): Json<UpdateContent>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let view = svc.update_comment(actor, &id, &input.content)?;
    Ok(Json(
        serde_json::to_value(view).map_err(|e| ServiceError::Internal(e.to_string()))?,
    ))
}

async fn archive_comment(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let changed = svc.change_comment_status(actor, &id, ContentStatus::Archived)?;
    Ok(Json(serde_json::json!({ "changed": changed })))
}

async fn unarchive_comment(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let changed = svc.change_comment_status(actor, &id, ContentStatus::Ok)?;
    Ok(Json(serde_json::json!({ "changed": changed })))
}

async fn delete_comment(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let changed = svc.change_comment_status(actor, &id, ContentStatus::Deleted)?;
    Ok(Json(serde_json::json!({ "changed": changed })))
}
