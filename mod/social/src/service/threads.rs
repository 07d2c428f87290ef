use notify::model::TargetKind;
use openhome_core::{new_id, now_rfc3339, PageParams, ServiceError};
use openhome_sql::SQLError;
use tracing::warn;

use crate::model::{Comment, CommentView, ContentStatus, Reply, ReplyView};
use crate::service::SocialService;
use crate::store::counters;

impl SocialService {
    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    /// Comment on a post. The comment insert and the post's
    /// comment_count bump commit as one unit.
    pub fn create_comment(
        &self,
        actor: &str,
        post_id: &str,
        content: &str,
    ) -> Result<CommentView, ServiceError> {
        if content.trim().is_empty() {
            return Err(ServiceError::Validation("content is required".into()));
        }
        if !self.users.exists(actor)? {
            return Err(ServiceError::NotFound(format!("user {actor}")));
        }
        self.content.get_post(post_id)?;

        let now = now_rfc3339();
        let comment = Comment {
            id: new_id(),
            user_id: actor.to_string(),
            post_id: post_id.to_string(),
            content: content.to_string(),
            status: ContentStatus::Ok,
            like_count: 0,
            reply_count: 0,
            created_at: now.clone(),
            updated_at: now,
        };

        let stmts = [
            self.content.insert_comment_stmt(&comment),
            counters::comment_count_delta(post_id, 1).required(),
        ];
        match self.sql.exec_tx(&stmts) {
            Ok(_) => {}
            Err(SQLError::Aborted { .. }) => {
                return Err(ServiceError::NotFound(format!("post {post_id}")))
            }
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        }

        if let Err(e) = self.notify.on_comment(actor, post_id, content) {
            warn!(error = %e, "comment notification fan-out failed");
        }

        self.comment_view(Some(actor), comment)
    }

    /// A post's visible comments, most liked first.
    pub fn list_comments(
        &self,
        viewer: Option<&str>,
        post_id: &str,
        page: &PageParams,
    ) -> Result<Vec<CommentView>, ServiceError> {
        self.content.get_post(post_id)?;
        let comments = self.content.list_comments(post_id, page.limit(), page.offset())?;
        comments
            .into_iter()
            .map(|c| self.comment_view(viewer, c))
            .collect()
    }

    /// Replace the text of one's own comment.
    pub fn update_comment(
        &self,
        actor: &str,
        id: &str,
        content: &str,
    ) -> Result<CommentView, ServiceError> {
        if content.trim().is_empty() {
            return Err(ServiceError::Validation("content is required".into()));
        }
        let mut comment = self.content.get_comment(id)?;
        if comment.user_id != actor {
            return Err(ServiceError::PermissionDenied(
                "cannot edit someone else's comment".into(),
            ));
        }
        if comment.status.is_terminal() {
            return Err(ServiceError::InvalidState(format!("comment {id} is deleted")));
        }

        let now = now_rfc3339();
        self.content.update_comment_content(id, content, &now)?;
        comment.content = content.to_string();
        comment.updated_at = now;
        self.comment_view(Some(actor), comment)
    }

    /// Archive, unarchive, or delete one's own comment.
    ///
    /// Owner-gated; DELETED is terminal and admits no way back.
    pub fn change_comment_status(
        &self,
        actor: &str,
        id: &str,
        status: ContentStatus,
    ) -> Result<bool, ServiceError> {
        let comment = self.content.get_comment(id)?;
        if comment.user_id != actor {
            return Err(ServiceError::PermissionDenied(
                "cannot change status of others".into(),
            ));
        }
        if comment.status.is_terminal() {
            return Err(ServiceError::InvalidState(format!("comment {id} is deleted")));
        }

        Ok(self.content.set_comment_status(id, status)? > 0)
    }

    // -----------------------------------------------------------------------
    // Replies
    // -----------------------------------------------------------------------

    /// Reply under a comment, optionally answering a specific reply.
    /// The reply insert and the comment's reply_count bump commit as one
    /// unit; the parent's author is notified afterwards.
    pub fn create_reply(
        &self,
        actor: &str,
        comment_id: &str,
        reply_to: Option<String>,
        content: &str,
    ) -> Result<ReplyView, ServiceError> {
        if content.trim().is_empty() {
            return Err(ServiceError::Validation("content is required".into()));
        }
        if !self.users.exists(actor)? {
            return Err(ServiceError::NotFound(format!("user {actor}")));
        }

        let comment = self.content.get_comment(comment_id)?;
        if comment.status != ContentStatus::Ok {
            return Err(ServiceError::NotFound(format!("comment {comment_id}")));
        }

        // The notification goes to the author of whatever is being
        // answered: the named reply if given, the comment otherwise.
        let (parent_type, parent_id) = match &reply_to {
            Some(rid) => {
                self.content.get_reply(rid)?;
                (TargetKind::Reply, rid.clone())
            }
            None => (TargetKind::Comment, comment_id.to_string()),
        };

        let now = now_rfc3339();
        let reply = Reply {
            id: new_id(),
            user_id: actor.to_string(),
            comment_id: comment_id.to_string(),
            reply_to,
            content: content.to_string(),
            status: ContentStatus::Ok,
            like_count: 0,
            created_at: now.clone(),
            updated_at: now,
        };

        let stmts = [
            self.content.insert_reply_stmt(&reply),
            counters::reply_count_delta(comment_id, 1).required(),
        ];
        match self.sql.exec_tx(&stmts) {
            Ok(_) => {}
            Err(SQLError::Aborted { .. }) => {
                return Err(ServiceError::NotFound(format!("comment {comment_id}")))
            }
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        }

        if let Err(e) = self.notify.on_reply(actor, parent_type, &parent_id, content) {
            warn!(error = %e, "reply notification fan-out failed");
        }

        self.reply_view(Some(actor), reply)
    }

    /// A comment's visible replies, newest first.
    pub fn list_replies(
        &self,
        viewer: Option<&str>,
        comment_id: &str,
        page: &PageParams,
    ) -> Result<Vec<ReplyView>, ServiceError> {
        self.content.get_comment(comment_id)?;
        let replies = self.content.list_replies(comment_id, page.limit(), page.offset())?;
        replies
            .into_iter()
            .map(|r| self.reply_view(viewer, r))
            .collect()
    }

    /// Replace the text of one's own reply.
    pub fn update_reply(
        &self,
        actor: &str,
        id: &str,
        content: &str,
    ) -> Result<ReplyView, ServiceError> {
        if content.trim().is_empty() {
            return Err(ServiceError::Validation("content is required".into()));
        }
        let mut reply = self.content.get_reply(id)?;
        if reply.user_id != actor {
            return Err(ServiceError::PermissionDenied(
                "cannot edit someone else's reply".into(),
            ));
        }
        if reply.status.is_terminal() {
            return Err(ServiceError::InvalidState(format!("reply {id} is deleted")));
        }

        let now = now_rfc3339();
        self.content.update_reply_content(id, content, &now)?;
        reply.content = content.to_string();
        reply.updated_at = now;
        self.reply_view(Some(actor), reply)
    }

    /// Archive, unarchive, or delete one's own reply.
    pub fn change_reply_status(
        &self,
        actor: &str,
        id: &str,
        status: ContentStatus,
    ) -> Result<bool, ServiceError> {
        let reply = self.content.get_reply(id)?;
        if reply.user_id != actor {
            return Err(ServiceError::PermissionDenied(
                "cannot change status of others".into(),
            ));
        }
        if reply.status.is_terminal() {
            return Err(ServiceError::InvalidState(format!("reply {id} is deleted")));
        }

        Ok(self.content.set_reply_status(id, status)? > 0)
    }

    // -----------------------------------------------------------------------
    // View assembly
    // -----------------------------------------------------------------------

    pub(crate) fn comment_view(
        &self,
        viewer: Option<&str>,
        comment: Comment,
    ) -> Result<CommentView, ServiceError> {
        let is_liked =
            self.check_like_status(viewer, TargetKind::Comment, &comment.id)?;
        let is_creator = viewer == Some(comment.user_id.as_str());
        let author = self.users.summary(&comment.user_id)?;
        Ok(CommentView {
            comment,
            author,
            is_liked,
            is_creator,
        })
    }

    pub(crate) fn reply_view(
        &self,
        viewer: Option<&str>,
        reply: Reply,
    ) -> Result<ReplyView, ServiceError> {
        let is_liked = self.check_like_status(viewer, TargetKind::Reply, &reply.id)?;
        let is_creator = viewer == Some(reply.user_id.as_str());
        let author = self.users.summary(&reply.user_id)?;
        Ok(ReplyView {
            reply,
            author,
            is_liked,
            is_creator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{seed_post, seed_user, test_service};
    use notify::model::Category;

    #[test]
    fn comment_bumps_post_counter_and_notifies_owner() {
        let (_tmp, svc) = test_service();
        let alice = seed_user(&svc, "alice");
        let bob = seed_user(&svc, "bob");
        let post = seed_post(&svc, &bob.id, "bob's post");

        let view = svc.create_comment(&alice.id, &post.id, "nice one").unwrap();
        assert!(view.is_creator);
        assert_eq!(view.author.as_ref().unwrap().username, "alice");

        assert_eq!(svc.get_post(None, &post.id).unwrap().post.comment_count, 1);
        assert_eq!(
            svc.notify().count_unread(&bob.id, Some(Category::Comment)).unwrap(),
            1
        );
    }

    #[test]
    fn self_comment_is_counted_but_not_notified() {
        let (_tmp, svc) = test_service();
        let bob = seed_user(&svc, "bob");
        let post = seed_post(&svc, &bob.id, "bob's post");

        svc.create_comment(&bob.id, &post.id, "first!").unwrap();

        assert_eq!(svc.get_post(None, &post.id).unwrap().post.comment_count, 1);
        assert_eq!(svc.notify().count_unread(&bob.id, None).unwrap(), 0);
    }

    #[test]
    fn comment_on_missing_post_is_not_found() {
        let (_tmp, svc) = test_service();
        let alice = seed_user(&svc, "alice");
        assert!(matches!(
            svc.create_comment(&alice.id, "ghost", "hello"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn archive_gate_and_roundtrip() {
        let (_tmp, svc) = test_service();
        let alice = seed_user(&svc, "alice");
        let bob = seed_user(&svc, "bob");
        let post = seed_post(&svc, &bob.id, "p");
        let comment = svc.create_comment(&alice.id, &post.id, "mine").unwrap();
        let cid = comment.comment.id;

        // Someone else cannot touch it.
        assert!(matches!(
            svc.change_comment_status(&bob.id, &cid, ContentStatus::Archived),
            Err(ServiceError::PermissionDenied(_))
        ));

        // Owner archives: hidden from the OK-only listing.
        svc.change_comment_status(&alice.id, &cid, ContentStatus::Archived)
            .unwrap();
        assert!(svc
            .list_comments(None, &post.id, &PageParams::default())
            .unwrap()
            .is_empty());

        // Unarchive brings it back.
        svc.change_comment_status(&alice.id, &cid, ContentStatus::Ok)
            .unwrap();
        assert_eq!(
            svc.list_comments(None, &post.id, &PageParams::default())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn deleted_is_terminal() {
        let (_tmp, svc) = test_service();
        let alice = seed_user(&svc, "alice");
        let post = seed_post(&svc, &alice.id, "p");
        let comment = svc.create_comment(&alice.id, &post.id, "mine").unwrap();
        let cid = comment.comment.id;

        svc.change_comment_status(&alice.id, &cid, ContentStatus::Deleted)
            .unwrap();

        // No way back out of DELETED — not even to DELETED again.
        assert!(matches!(
            svc.change_comment_status(&alice.id, &cid, ContentStatus::Ok),
            Err(ServiceError::InvalidState(_))
        ));
        assert!(matches!(
            svc.update_comment(&alice.id, &cid, "rewrite"),
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[test]
    fn reply_bumps_comment_counter_and_notifies_comment_author() {
        let (_tmp, svc) = test_service();
        let alice = seed_user(&svc, "alice");
        let bob = seed_user(&svc, "bob");
        let post = seed_post(&svc, &bob.id, "p");
        let comment = svc.create_comment(&alice.id, &post.id, "c").unwrap();

        svc.create_reply(&bob.id, &comment.comment.id, None, "r").unwrap();

        let listed = svc
            .list_comments(None, &post.id, &PageParams::default())
            .unwrap();
        assert_eq!(listed[0].comment.reply_count, 1);
        assert_eq!(
            svc.notify().count_unread(&alice.id, Some(Category::Comment)).unwrap(),
            1
        );
    }

    #[test]
    fn reply_to_reply_notifies_that_replys_author() {
        let (_tmp, svc) = test_service();
        let alice = seed_user(&svc, "alice");
        let bob = seed_user(&svc, "bob");
        let carol = seed_user(&svc, "carol");
        let post = seed_post(&svc, &alice.id, "p");
        let comment = svc.create_comment(&alice.id, &post.id, "c").unwrap();
        let first = svc
            .create_reply(&bob.id, &comment.comment.id, None, "first")
            .unwrap();

        // Carol answers bob's reply: bob is notified, not alice.
        svc.create_reply(
            &carol.id,
            &comment.comment.id,
            Some(first.reply.id.clone()),
            "second",
        )
        .unwrap();

        assert_eq!(
            svc.notify().count_unread(&bob.id, Some(Category::Comment)).unwrap(),
            1
        );

        let listed = svc
            .list_comments(None, &post.id, &PageParams::default())
            .unwrap();
        assert_eq!(listed[0].comment.reply_count, 2);
    }

    #[test]
    fn reply_views_are_newest_first_and_ok_only() {
        let (_tmp, svc) = test_service();
        let alice = seed_user(&svc, "alice");
        let post = seed_post(&svc, &alice.id, "p");
        let comment = svc.create_comment(&alice.id, &post.id, "c").unwrap();
        let cid = comment.comment.id;

        let r1 = svc.create_reply(&alice.id, &cid, None, "one").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        svc.create_reply(&alice.id, &cid, None, "two").unwrap();

        svc.change_reply_status(&alice.id, &r1.reply.id, ContentStatus::Deleted)
            .unwrap();

        let listed = svc
            .list_replies(None, &cid, &PageParams::default())
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].reply.content, "two");
    }
}
