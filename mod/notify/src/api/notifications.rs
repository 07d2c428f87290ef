use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use openhome_core::{Identity, PageParams, ServiceError};

use crate::model::{CategoryParam, CategoryQuery};
use crate::service::NotifyService;

type ServiceState = Arc<NotifyService>;

pub fn router(service: Arc<NotifyService>) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/@unread-count", get(unread_count))
        .route("/notifications/@read-all", post(read_all))
        .route("/notifications/{id}/@read", post(read_one))
        .with_state(service)
}

// ---------------------------------------------------------------------------
// GET /notifications
// ---------------------------------------------------------------------------

async fn list_notifications(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(query): Query<CategoryParam>,
    Query(page): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let recipient = identity.require()?;
    let items = svc.list(recipient, query.category, &page)?;
    Ok(Json(serde_json::json!({ "items": items })))
}

// ---------------------------------------------------------------------------
// GET /notifications/@unread-count
// ---------------------------------------------------------------------------

async fn unread_count(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let recipient = identity.require()?;
    let count = svc.count_unread(recipient, query.category)?;
    Ok(Json(serde_json::json!({ "count": count })))
}

// ---------------------------------------------------------------------------
// POST /notifications/@read-all
// ---------------------------------------------------------------------------

async fn read_all(
    State(svc): State<ServiceState>,
    identity: Identity,
    Query(query): Query<CategoryParam>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let recipient = identity.require()?;
    let updated = svc.mark_all_read(recipient, query.category)?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

// ---------------------------------------------------------------------------
// POST /notifications/:id/@read
// ---------------------------------------------------------------------------

async fn read_one(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let recipient = identity.require()?;
    svc.mark_read(recipient, &id)?;
    Ok(Json(serde_json::json!({ "read": true })))
}
