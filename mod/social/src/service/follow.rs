use openhome_core::{paginate, PageParams, ServiceError};
use openhome_sql::SQLError;
use tracing::warn;

use crate::model::UserSummary;
use crate::service::SocialService;
use crate::store::counters;

impl SocialService {
    /// Follow another user.
    ///
    /// The edge insert and both counter bumps (followee followers,
    /// follower following) commit as one unit; the composite edge key
    /// rejects duplicates inside it.
    pub fn follow(&self, actor: &str, followee_id: &str) -> Result<(), ServiceError> {
        if actor == followee_id {
            return Err(ServiceError::Conflict("cannot follow yourself".into()));
        }
        if !self.users.exists(followee_id)? {
            return Err(ServiceError::NotFound(format!("user {followee_id}")));
        }
        if !self.users.exists(actor)? {
            return Err(ServiceError::NotFound(format!("user {actor}")));
        }

        let stmts = [
            self.follows.insert_stmt(actor, followee_id),
            counters::follower_count_delta(followee_id, 1).required(),
            counters::following_count_delta(actor, 1).required(),
        ];
        match self.sql.exec_tx(&stmts) {
            Ok(_) => {}
            Err(SQLError::Constraint(_)) => {
                return Err(ServiceError::Conflict("already following".into()))
            }
            Err(SQLError::Aborted { .. }) => {
                return Err(ServiceError::NotFound("user vanished".into()))
            }
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        }

        if let Err(e) = self.notify.on_follow(followee_id, actor) {
            warn!(error = %e, "follow notification fan-out failed");
        }
        Ok(())
    }

    /// Stop following a user. Reversing a relation that does not exist
    /// is an invalid state.
    pub fn unfollow(&self, actor: &str, followee_id: &str) -> Result<(), ServiceError> {
        if !self.users.exists(followee_id)? {
            return Err(ServiceError::NotFound(format!("user {followee_id}")));
        }
        if !self.users.exists(actor)? {
            return Err(ServiceError::NotFound(format!("user {actor}")));
        }

        let stmts = [
            self.follows.delete_stmt(actor, followee_id),
            counters::follower_count_delta(followee_id, -1).required(),
            counters::following_count_delta(actor, -1).required(),
        ];
        match self.sql.exec_tx(&stmts) {
            Ok(_) => {}
            Err(SQLError::Aborted { index: 0 }) => {
                return Err(ServiceError::InvalidState("not following".into()))
            }
            Err(SQLError::Aborted { .. }) => {
                return Err(ServiceError::NotFound("user vanished".into()))
            }
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        }

        if let Err(e) = self.notify.on_unfollow(followee_id, actor) {
            warn!(error = %e, "unfollow notification fan-out failed");
        }
        Ok(())
    }

    /// Whether the viewer follows the given user. Anonymous viewers are
    /// "not following" — never an error.
    pub fn check_follow_status(
        &self,
        viewer: Option<&str>,
        followee_id: &str,
    ) -> Result<bool, ServiceError> {
        match viewer {
            None => Ok(false),
            Some(v) if v.is_empty() => Ok(false),
            Some(v) => self.follows.exists(v, followee_id),
        }
    }

    /// Who this user follows, newest edge first, paginated.
    pub fn list_following(
        &self,
        user_id: &str,
        page: &PageParams,
    ) -> Result<Vec<UserSummary>, ServiceError> {
        let ids = paginate(self.follows.list_following(user_id)?, page);
        self.users.summaries(&ids)
    }

    /// Who follows this user, newest edge first, paginated.
    pub fn list_followers(
        &self,
        user_id: &str,
        page: &PageParams,
    ) -> Result<Vec<UserSummary>, ServiceError> {
        let ids = paginate(self.follows.list_followers(user_id)?, page);
        self.users.summaries(&ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{seed_user, test_service};
    use notify::model::Category;

    #[test]
    fn follow_moves_both_counters_by_one() {
        let (_tmp, svc) = test_service();
        let a = seed_user(&svc, "a");
        let b = seed_user(&svc, "b");

        svc.follow(&a.id, &b.id).unwrap();

        let a = svc.get_user(&a.id).unwrap();
        let b = svc.get_user(&b.id).unwrap();
        assert_eq!(a.following_count, 1);
        assert_eq!(a.follower_count, 0);
        assert_eq!(b.follower_count, 1);
        assert_eq!(b.following_count, 0);
        assert!(svc.check_follow_status(Some(&a.id), &b.id).unwrap());
        assert!(!svc.check_follow_status(Some(&b.id), &a.id).unwrap());
    }

    #[test]
    fn double_follow_is_conflict_and_counters_hold() {
        let (_tmp, svc) = test_service();
        let a = seed_user(&svc, "a");
        let b = seed_user(&svc, "b");

        svc.follow(&a.id, &b.id).unwrap();
        assert!(matches!(
            svc.follow(&a.id, &b.id),
            Err(ServiceError::Conflict(_))
        ));

        assert_eq!(svc.get_user(&b.id).unwrap().follower_count, 1);
        assert_eq!(svc.get_user(&a.id).unwrap().following_count, 1);
    }

    #[test]
    fn self_follow_is_conflict() {
        let (_tmp, svc) = test_service();
        let a = seed_user(&svc, "a");
        assert!(matches!(
            svc.follow(&a.id, &a.id),
            Err(ServiceError::Conflict(_))
        ));
        assert_eq!(svc.get_user(&a.id).unwrap().follower_count, 0);
    }

    #[test]
    fn follow_unknown_user_is_not_found() {
        let (_tmp, svc) = test_service();
        let a = seed_user(&svc, "a");
        assert!(matches!(
            svc.follow(&a.id, "ghost"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn unfollow_restores_counters_and_deletes_notification() {
        let (_tmp, svc) = test_service();
        let a = seed_user(&svc, "a");
        let b = seed_user(&svc, "b");

        svc.follow(&a.id, &b.id).unwrap();
        assert_eq!(
            svc.notify().count_unread(&b.id, Some(Category::Follow)).unwrap(),
            1
        );

        svc.unfollow(&a.id, &b.id).unwrap();
        assert_eq!(svc.get_user(&b.id).unwrap().follower_count, 0);
        assert_eq!(svc.get_user(&a.id).unwrap().following_count, 0);
        assert_eq!(
            svc.notify().count_unread(&b.id, Some(Category::Follow)).unwrap(),
            0
        );
    }

    #[test]
    fn unfollow_without_edge_is_invalid_state() {
        let (_tmp, svc) = test_service();
        let a = seed_user(&svc, "a");
        let b = seed_user(&svc, "b");

        assert!(matches!(
            svc.unfollow(&a.id, &b.id),
            Err(ServiceError::InvalidState(_))
        ));
        assert_eq!(svc.get_user(&b.id).unwrap().follower_count, 0);
    }

    #[test]
    fn follow_lists_paginate_with_lenient_defaults() {
        let (_tmp, svc) = test_service();
        let a = seed_user(&svc, "a");
        let mut others = Vec::new();
        for i in 0..12 {
            let u = seed_user(&svc, &format!("user{i}"));
            svc.follow(&a.id, &u.id).unwrap();
            others.push(u);
        }

        // pageNum=0 / pageSize=-5 silently use defaults (1, 10).
        let page = PageParams::new(0, 10);
        let first = svc.list_following(&a.id, &page).unwrap();
        assert_eq!(first.len(), 10);

        let rest = svc.list_following(&a.id, &PageParams::new(2, 10)).unwrap();
        assert_eq!(rest.len(), 2);

        // Out-of-range page is empty, not an error.
        let beyond = svc.list_following(&a.id, &PageParams::new(9, 10)).unwrap();
        assert!(beyond.is_empty());

        // The other direction: each followed user has exactly one follower.
        let followers = svc
            .list_followers(&others[0].id, &PageParams::default())
            .unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, a.id);
    }

    #[test]
    fn anonymous_follow_status_degrades_to_false() {
        let (_tmp, svc) = test_service();
        let b = seed_user(&svc, "b");
        assert!(!svc.check_follow_status(None, &b.id).unwrap());
        assert!(!svc.check_follow_status(Some(""), &b.id).unwrap());
    }
}
