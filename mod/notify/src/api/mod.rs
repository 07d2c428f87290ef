mod notifications;

use std::sync::Arc;

use axum::Router;

use crate::service::NotifyService;

/// Build the complete notify module router.
///
/// Routes:
/// - `GET  /notifications`               — list one category, newest first
/// - `GET  /notifications/@unread-count` — unread count (category or all)
/// - `POST /notifications/@read-all`     — mark a category read
/// - `POST /notifications/{id}/@read`    — mark one notification read
pub fn router(service: Arc<NotifyService>) -> Router {
    notifications::router(service)
}
