use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use openhome_core::{Identity, ServiceError};

use crate::api::ServiceState;
use crate::model::{CreateUser, RecentKind};

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
}

async fn create_user(
    State(svc): State<ServiceState>,
    Json(input): Json<CreateUser>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let user = svc.create_user(input)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(user).map_err(|e| ServiceError::Internal(e.to_string()))?),
    ))
}

async fn get_user(
    State(svc): State<ServiceState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.get_user(&id)?;

    // Looking at someone's profile counts as a recent view.
    if let Some(viewer) = identity.user_id() {
        svc.record_view(viewer, RecentKind::User, &id)?;
    }

    Ok(Json(
        serde_json::to_value(user).map_err(|e| ServiceError::Internal(e.to_string()))?,
    ))
}
