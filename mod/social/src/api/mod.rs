mod comments;
mod follows;
mod likes;
mod posts;
mod recent;
mod replies;
mod users;

use std::sync::Arc;

use axum::Router;

use crate::service::SocialService;

pub(crate) type ServiceState = Arc<SocialService>;

/// Build the complete social module router.
///
/// Routes:
/// - `POST /users`, `GET /users/{id}`
/// - `POST /posts`, `GET /posts`, `GET /posts/{id}`
/// - `POST /likes`, `POST /likes/@cancel`, `GET /likes/@status`
/// - `POST /follows`, `POST /follows/@cancel`, `GET /follows/@status`,
///   `GET /follows/@following`, `GET /follows/@followers`
/// - `POST /comments`, `GET /comments`, `PUT /comments/{id}`,
///   `POST /comments/{id}/@archive`, `POST /comments/{id}/@unarchive`,
///   `DELETE /comments/{id}`
/// - `POST /replies`, `GET /replies`, `PUT /replies/{id}`,
///   `POST /replies/{id}/@archive`, `POST /replies/{id}/@unarchive`,
///   `DELETE /replies/{id}`
/// - `POST /recent-views`, `GET /recent-views/posts`, `GET /recent-views/users`
pub fn router(service: Arc<SocialService>) -> Router {
    Router::new()
        .merge(users::router())
        .merge(posts::router())
        .merge(likes::router())
        .merge(follows::router())
        .merge(comments::router())
        .merge(replies::router())
        .merge(recent::router())
        .with_state(service)
}
