//! Social module — the engagement core.
//!
//! # Components
//!
//! - **Like Ledger** — the set of active (user, target) likes; the
//!   composite primary key enforces at-most-one-like.
//! - **Follow Graph** — directed follower → followee edges; no
//!   self-edge, at-most-one-edge.
//! - **Counter Store** — per-entity counters (post/comment/reply
//!   like_count, post comment_count, comment reply_count, user
//!   follower/following/likes-received), written only inside the same
//!   transaction as the mutation they pay for.
//! - **Engagement facade** ([`service::SocialService`]) — one call per
//!   user action; check, atomic mutate, then best-effort fan-out to the
//!   notify module.
//!
//! # Usage
//!
//! ```ignore
//! use social::SocialModule;
//!
//! let content = Arc::new(social::store::ContentStore::new(sql.clone())?);
//! let notify = notify::NotifyModule::new(sql.clone(), content.clone(), config)?;
//! let module = SocialModule::new(sql, kv, content, notify.service().clone())?;
//! let router = module.routes(); // Mount under /social
//! ```

pub mod api;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;

use notify::service::NotifyService;
use openhome_core::Module;

use crate::service::SocialService;
use crate::store::ContentStore;

/// Social module implementing the Module trait.
pub struct SocialModule {
    service: Arc<SocialService>,
}

impl SocialModule {
    /// Create a new SocialModule.
    ///
    /// The [`ContentStore`] must be the same instance that was handed to
    /// the notify module as its target resolver.
    pub fn new(
        sql: Arc<dyn openhome_sql::SQLStore>,
        kv: Arc<dyn openhome_kv::KVStore>,
        content: Arc<ContentStore>,
        notify: Arc<NotifyService>,
    ) -> Result<Self, openhome_core::ServiceError> {
        let service = SocialService::new(sql, kv, content, notify)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying SocialService.
    pub fn service(&self) -> &Arc<SocialService> {
        &self.service
    }
}

impl Module for SocialModule {
    fn name(&self) -> &str {
        "social"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
