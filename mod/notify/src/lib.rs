//! Notify module — notification fan-out and read state.
//!
//! # Behavior
//!
//! - **LIKE / FOLLOW** notifications are created when the action lands
//!   and deleted again when it is reversed (idempotent reversal).
//! - **COMMENT / REPLY** notifications are never retracted; they only
//!   leave the unread count through the read-state operations.
//! - Acting on your own content is suppressed for likes and comments;
//!   for replies it is configuration-driven ([`service::NotifyConfig`]).
//! - Fan-out is best-effort by contract: the engagement facade applies
//!   it after its atomic unit commits and logs failures instead of
//!   propagating them.
//!
//! The module does not know the content tables. It resolves like/reply
//! targets through the injected [`resolver::TargetResolver`].

pub mod api;
pub mod model;
pub mod resolver;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;

use openhome_core::Module;
use openhome_sql::SQLStore;

use resolver::TargetResolver;
use service::{NotifyConfig, NotifyService};

/// Notify module implementing the Module trait.
pub struct NotifyModule {
    service: Arc<NotifyService>,
}

impl NotifyModule {
    /// Create the notify module, initialising its storage.
    pub fn new(
        db: Arc<dyn SQLStore>,
        resolver: Arc<dyn TargetResolver>,
        config: NotifyConfig,
    ) -> Result<Self, openhome_core::ServiceError> {
        let service = NotifyService::new(db, resolver, config)?;
        Ok(Self { service })
    }

    /// Get a reference to the NotifyService for fan-out wiring.
    pub fn service(&self) -> &Arc<NotifyService> {
        &self.service
    }
}

impl Module for NotifyModule {
    fn name(&self) -> &str {
        "notify"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
