use std::sync::Arc;

use openhome_core::{new_id, now_rfc3339, PageParams, ServiceError};
use openhome_sql::SQLStore;

use crate::model::{Category, Notification, NotificationKind, TargetKind};
use crate::resolver::TargetResolver;
use crate::store::NotificationStore;

/// Configuration for the notify service.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Whether replying to your own comment/reply suppresses the
    /// notification, like self-like and self-comment do. Defaults to
    /// false: historically self-replies DID notify, so the flag keeps
    /// that behavior until product decides otherwise.
    pub suppress_self_reply: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            suppress_self_reply: false,
        }
    }
}

/// The notification fan-out service.
///
/// Event hooks (`on_*`) derive notification records from engagement
/// actions; read-state operations are monotonic (a notification never
/// reverts to unread) and idempotent.
pub struct NotifyService {
    store: NotificationStore,
    resolver: Arc<dyn TargetResolver>,
    config: NotifyConfig,
}

impl NotifyService {
    pub fn new(
        db: Arc<dyn SQLStore>,
        resolver: Arc<dyn TargetResolver>,
        config: NotifyConfig,
    ) -> Result<Arc<Self>, ServiceError> {
        let store = NotificationStore::new(db)?;
        Ok(Arc::new(Self {
            store,
            resolver,
            config,
        }))
    }

    fn blank(recipient: &str, actor: &str, kind: NotificationKind) -> Notification {
        Notification {
            id: new_id(),
            user_id: recipient.to_string(),
            is_read: false,
            kind,
            created_at: now_rfc3339(),
            actor_id: actor.to_string(),
            target_id: None,
            target_type: None,
            target_excerpt: None,
            content: None,
            post_id: None,
        }
    }

    // -----------------------------------------------------------------------
    // Event hooks
    // -----------------------------------------------------------------------

    /// A like landed on a target. Returns false when suppressed
    /// (liking your own content does not notify you).
    pub fn on_like(
        &self,
        actor_id: &str,
        target_type: TargetKind,
        target_id: &str,
    ) -> Result<bool, ServiceError> {
        let target = self.resolver.resolve(target_type, target_id)?;
        if target.owner_id == actor_id {
            return Ok(false);
        }

        let mut n = Self::blank(&target.owner_id, actor_id, NotificationKind::Like);
        n.target_id = Some(target_id.to_string());
        n.target_type = Some(target_type);
        n.target_excerpt = Some(target.excerpt);
        n.post_id = target.root_post_id;
        self.store.insert(&n)?;
        Ok(true)
    }

    /// A like was withdrawn. Removes the matching LIKE notification;
    /// a missing match is fine (idempotent reversal).
    pub fn on_unlike(
        &self,
        actor_id: &str,
        target_type: TargetKind,
        target_id: &str,
    ) -> Result<(), ServiceError> {
        self.store.delete_like(actor_id, target_id, target_type)?;
        Ok(())
    }

    /// `follower` started following `followee`. Self-follow never
    /// reaches this hook — the follow graph rejects it upstream.
    pub fn on_follow(&self, followee_id: &str, follower_id: &str) -> Result<bool, ServiceError> {
        let n = Self::blank(followee_id, follower_id, NotificationKind::Follow);
        self.store.insert(&n)?;
        Ok(true)
    }

    /// `follower` unfollowed `followee`. Idempotent.
    pub fn on_unfollow(&self, followee_id: &str, follower_id: &str) -> Result<(), ServiceError> {
        self.store.delete_follow(follower_id, followee_id)?;
        Ok(())
    }

    /// A comment was posted on a post. Commenting on your own post does
    /// not notify you.
    pub fn on_comment(
        &self,
        actor_id: &str,
        post_id: &str,
        content: &str,
    ) -> Result<bool, ServiceError> {
        let post = self.resolver.resolve(TargetKind::Post, post_id)?;
        if post.owner_id == actor_id {
            return Ok(false);
        }

        let mut n = Self::blank(&post.owner_id, actor_id, NotificationKind::Comment);
        n.target_id = Some(post_id.to_string());
        n.target_type = Some(TargetKind::Post);
        n.target_excerpt = Some(post.excerpt);
        n.content = Some(content.to_string());
        n.post_id = post.root_post_id;
        self.store.insert(&n)?;
        Ok(true)
    }

    /// A reply was posted under a comment (or under another reply).
    /// The parent's author is notified. Self-reply suppression is
    /// configuration-driven, see [`NotifyConfig`].
    pub fn on_reply(
        &self,
        actor_id: &str,
        parent_type: TargetKind,
        parent_id: &str,
        content: &str,
    ) -> Result<bool, ServiceError> {
        if parent_type == TargetKind::Post {
            return Err(ServiceError::Validation(
                "reply parent must be a comment or reply".into(),
            ));
        }

        let parent = self.resolver.resolve(parent_type, parent_id)?;
        if self.config.suppress_self_reply && parent.owner_id == actor_id {
            return Ok(false);
        }

        let mut n = Self::blank(&parent.owner_id, actor_id, NotificationKind::Reply);
        n.target_id = Some(parent_id.to_string());
        n.target_type = Some(parent_type);
        n.target_excerpt = Some(parent.excerpt);
        n.content = Some(content.to_string());
        n.post_id = parent.root_post_id;
        self.store.insert(&n)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Read state
    // -----------------------------------------------------------------------

    /// Mark one of the recipient's notifications as read. Idempotent;
    /// `NotFound` if the id does not exist for this recipient.
    pub fn mark_read(&self, recipient: &str, id: &str) -> Result<(), ServiceError> {
        let affected = self.store.mark_read(recipient, id)?;
        if affected == 0 {
            return Err(ServiceError::NotFound(format!("notification {id}")));
        }
        Ok(())
    }

    /// Mark every unread notification in a category read. Returns how
    /// many flipped.
    pub fn mark_all_read(&self, recipient: &str, category: Category) -> Result<u64, ServiceError> {
        self.store.mark_all_read(recipient, category.kinds())
    }

    /// Count unread notifications, for one category or across all.
    pub fn count_unread(
        &self,
        recipient: &str,
        category: Option<Category>,
    ) -> Result<i64, ServiceError> {
        self.store
            .count_unread(recipient, category.map(|c| c.kinds()))
    }

    /// List a category's notifications, newest first. The comment
    /// category merges COMMENT and REPLY kinds into one ordering.
    pub fn list(
        &self,
        recipient: &str,
        category: Category,
        page: &PageParams,
    ) -> Result<Vec<Notification>, ServiceError> {
        self.store.list(recipient, category.kinds(), page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::TargetSnapshot;
    use openhome_sql::SqliteStore;
    use std::collections::HashMap;

    /// Resolver stub over a fixed (kind, id) → owner/excerpt map.
    struct StubResolver {
        targets: HashMap<(TargetKind, String), TargetSnapshot>,
    }

    impl StubResolver {
        fn new() -> Self {
            Self {
                targets: HashMap::new(),
            }
        }

        fn with(mut self, kind: TargetKind, id: &str, owner: &str, excerpt: &str) -> Self {
            self.targets.insert(
                (kind, id.to_string()),
                TargetSnapshot {
                    owner_id: owner.to_string(),
                    excerpt: excerpt.to_string(),
                    root_post_id: Some("p1".to_string()),
                },
            );
            self
        }
    }

    impl TargetResolver for StubResolver {
        fn resolve(&self, kind: TargetKind, id: &str) -> Result<TargetSnapshot, ServiceError> {
            self.targets
                .get(&(kind, id.to_string()))
                .cloned()
                .ok_or_else(|| ServiceError::NotFound(format!("{kind} {id}")))
        }
    }

    fn service_with(resolver: StubResolver, config: NotifyConfig) -> Arc<NotifyService> {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        NotifyService::new(db, Arc::new(resolver), config).unwrap()
    }

    #[test]
    fn like_notifies_owner_with_snapshot() {
        let svc = service_with(
            StubResolver::new().with(TargetKind::Post, "p1", "u2", "my post"),
            NotifyConfig::default(),
        );

        assert!(svc.on_like("u1", TargetKind::Post, "p1").unwrap());

        let items = svc.list("u2", Category::Like, &PageParams::default()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].actor_id, "u1");
        assert_eq!(items[0].target_excerpt.as_deref(), Some("my post"));
        assert_eq!(items[0].post_id.as_deref(), Some("p1"));
        assert!(!items[0].is_read);
    }

    #[test]
    fn self_like_is_suppressed() {
        let svc = service_with(
            StubResolver::new().with(TargetKind::Post, "p1", "u1", "mine"),
            NotifyConfig::default(),
        );

        assert!(!svc.on_like("u1", TargetKind::Post, "p1").unwrap());
        assert_eq!(svc.count_unread("u1", Some(Category::Like)).unwrap(), 0);
    }

    #[test]
    fn like_on_missing_target_is_not_found() {
        let svc = service_with(StubResolver::new(), NotifyConfig::default());
        assert!(matches!(
            svc.on_like("u1", TargetKind::Comment, "nope"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn unlike_removes_notification_idempotently() {
        let svc = service_with(
            StubResolver::new().with(TargetKind::Post, "p1", "u2", "my post"),
            NotifyConfig::default(),
        );

        svc.on_like("u1", TargetKind::Post, "p1").unwrap();
        assert_eq!(svc.count_unread("u2", None).unwrap(), 1);

        svc.on_unlike("u1", TargetKind::Post, "p1").unwrap();
        assert_eq!(svc.count_unread("u2", None).unwrap(), 0);

        // Reversing again is harmless.
        svc.on_unlike("u1", TargetKind::Post, "p1").unwrap();
    }

    #[test]
    fn follow_and_unfollow_roundtrip() {
        let svc = service_with(StubResolver::new(), NotifyConfig::default());

        svc.on_follow("u2", "u1").unwrap();
        let items = svc.list("u2", Category::Follow, &PageParams::default()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].actor_id, "u1");
        assert!(items[0].target_id.is_none());

        svc.on_unfollow("u2", "u1").unwrap();
        assert!(svc
            .list("u2", Category::Follow, &PageParams::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn self_comment_is_suppressed() {
        let svc = service_with(
            StubResolver::new().with(TargetKind::Post, "p1", "u1", "mine"),
            NotifyConfig::default(),
        );
        assert!(!svc.on_comment("u1", "p1", "nice").unwrap());
        assert_eq!(svc.count_unread("u1", None).unwrap(), 0);
    }

    #[test]
    fn self_reply_notifies_by_default() {
        // Deliberate asymmetry with like/comment, kept behind a flag.
        let svc = service_with(
            StubResolver::new().with(TargetKind::Comment, "c1", "u1", "my comment"),
            NotifyConfig::default(),
        );
        assert!(svc.on_reply("u1", TargetKind::Comment, "c1", "me again").unwrap());
        assert_eq!(svc.count_unread("u1", Some(Category::Comment)).unwrap(), 1);
    }

    #[test]
    fn self_reply_suppressed_when_configured() {
        let svc = service_with(
            StubResolver::new().with(TargetKind::Comment, "c1", "u1", "my comment"),
            NotifyConfig {
                suppress_self_reply: true,
            },
        );
        assert!(!svc.on_reply("u1", TargetKind::Comment, "c1", "me again").unwrap());
        assert_eq!(svc.count_unread("u1", None).unwrap(), 0);
    }

    #[test]
    fn reply_parent_cannot_be_post() {
        let svc = service_with(StubResolver::new(), NotifyConfig::default());
        assert!(matches!(
            svc.on_reply("u1", TargetKind::Post, "p1", "hi"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn mark_read_unknown_id_is_not_found() {
        let svc = service_with(StubResolver::new(), NotifyConfig::default());
        assert!(matches!(
            svc.mark_read("u1", "nope"),
            Err(ServiceError::NotFound(_))
        ));
    }
}
