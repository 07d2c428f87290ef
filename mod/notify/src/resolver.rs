//! Target resolution — how the fan-out looks up the entity an event
//! points at without depending on the content module.
//!
//! The notify module only knows this trait. The concrete implementation
//! (backed by the post/comment/reply tables) is injected at startup time.

use openhome_core::ServiceError;

use crate::model::TargetKind;

/// Owner and display snapshot of a like/reply target.
#[derive(Debug, Clone)]
pub struct TargetSnapshot {
    /// The user who authored the target.
    pub owner_id: String,

    /// What to show in the notification: the post title, or the
    /// comment/reply text.
    pub excerpt: String,

    /// The post at the root of the target (the post itself for POST
    /// targets, the owning post for COMMENT/REPLY targets).
    pub root_post_id: Option<String>,
}

/// Pluggable lookup from (kind, id) to the target's owner and snapshot.
///
/// Returns `NotFound` when the target does not exist.
pub trait TargetResolver: Send + Sync {
    fn resolve(&self, kind: TargetKind, target_id: &str) -> Result<TargetSnapshot, ServiceError>;
}
