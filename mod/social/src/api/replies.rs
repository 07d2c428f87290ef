use axum::extract::{Path, Query, State};
use axum::routing::{post, put};
use axum::{Json, Router};

use openhome_core::{Identity, PageParams, ServiceError};

use crate::api::ServiceState;
use crate::model::{ContentStatus, CreateReply, ReplyListQuery, UpdateContent};

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/replies", post(create_reply).get(list_replies))
        .route("/replies/{id}", put(update_reply).delete(delete_reply))
        .route("/replies/{id}/@archive", post(archive_reply))
        .route("/replies/{id}/@unarchive", post(unarchive_reply))
}

async fn create_reply(
    State(svc): State<ServiceState>,
    identity: Identity,
    Json(input): Json<CreateReply>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let actor = identity.require()?;
    let view = svc.create_reply(actor, &input.comment_id, input.reply_to, &input.content)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(view).map_err(|e| ServiceError::Internal(e.to_string()))?),
    ))
}

async fn list_replies(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(query): Query<ReplyListQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let items = svc.list_replies(identity.user_id(), &query.comment_id, &page)?;
    Ok(Json(serde_json::json!({ "items": items })))
}

async fn update_reply(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(input): Json<UpdateContent>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let view = svc.update_reply(actor, &id, &input.content)?;
    Ok(Json(
        serde_json::to_value(view).map_err(|e| ServiceError::Internal(e.to_string()))?,
    ))
}

async fn archive_reply(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let changed = svc.change_reply_status(actor, &id, ContentStatus::Archived)?;
    Ok(Json(serde_json::json!({ "changed": changed })))
}

async fn unarchive_reply(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let changed = svc.change_reply_status(actor, &id, ContentStatus::Ok)?;
    Ok(Json(serde_json::json!({ "changed": changed })))
}

async fn delete_reply(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = identity.require()?;
    let changed = svc.change_reply_status(actor, &id, ContentStatus::Deleted)?;
    Ok(Json(serde_json::json!({ "changed": changed })))
}
