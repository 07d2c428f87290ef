use notify::model::TargetKind;
use openhome_core::{new_id, now_rfc3339, paginate, PageParams, ServiceError};

use crate::model::{CreatePost, CreateUser, Post, PostView, RecentKind, User, UserSummary};
use crate::service::SocialService;

impl SocialService {
    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Register a user. Identity (tokens, credentials) lives upstream;
    /// this only provisions the engagement-side record and counters.
    pub fn create_user(&self, input: CreateUser) -> Result<User, ServiceError> {
        if input.username.trim().is_empty() {
            return Err(ServiceError::Validation("username is required".into()));
        }

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            username: input.username,
            icon: input.icon,
            introduction: input.introduction,
            follower_count: 0,
            following_count: 0,
            like_count: 0,
            created_at: now.clone(),
            updated_at: now,
        };
        self.users.create(&user)?;
        Ok(user)
    }

    /// Get a user with their current counters.
    pub fn get_user(&self, id: &str) -> Result<User, ServiceError> {
        self.users.get(id)
    }

    // -----------------------------------------------------------------------
    // Posts
    // -----------------------------------------------------------------------

    /// Publish a post.
    pub fn create_post(&self, actor: &str, input: CreatePost) -> Result<Post, ServiceError> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::Validation("title is required".into()));
        }
        if !self.users.exists(actor)? {
            return Err(ServiceError::NotFound(format!("user {actor}")));
        }

        let now = now_rfc3339();
        let post = Post {
            id: new_id(),
            user_id: actor.to_string(),
            title: input.title,
            content: input.content,
            like_count: 0,
            comment_count: 0,
            created_at: now.clone(),
            updated_at: now,
        };
        self.content.create_post(&post)?;
        Ok(post)
    }

    /// Get one post as seen by the viewer.
    pub fn get_post(&self, viewer: Option<&str>, id: &str) -> Result<PostView, ServiceError> {
        let post = self.content.get_post(id)?;
        self.post_view(viewer, post)
    }

    /// List posts newest first, optionally restricted to one author.
    pub fn list_posts(
        &self,
        viewer: Option<&str>,
        author: Option<&str>,
        page: &PageParams,
    ) -> Result<Vec<PostView>, ServiceError> {
        let posts = self.content.list_posts(author, page.limit(), page.offset())?;
        posts.into_iter().map(|p| self.post_view(viewer, p)).collect()
    }

    pub(crate) fn post_view(
        &self,
        viewer: Option<&str>,
        post: Post,
    ) -> Result<PostView, ServiceError> {
        let is_liked = self.check_like_status(viewer, TargetKind::Post, &post.id)?;
        let is_creator = viewer == Some(post.user_id.as_str());
        Ok(PostView {
            post,
            is_liked,
            is_creator,
        })
    }

    // -----------------------------------------------------------------------
    // Recent views
    // -----------------------------------------------------------------------

    /// Record that the actor looked at a post or user profile. Viewing
    /// your own profile is not recorded; re-views just move the entry
    /// forward (upsert dedup).
    pub fn record_view(
        &self,
        actor: &str,
        kind: RecentKind,
        target_id: &str,
    ) -> Result<(), ServiceError> {
        if kind == RecentKind::User && actor == target_id {
            return Ok(());
        }
        self.recent.record(actor, kind, target_id)
    }

    /// Recently viewed posts, most recent first. Targets deleted since
    /// the view are skipped.
    pub fn recent_posts(
        &self,
        actor: &str,
        page: &PageParams,
    ) -> Result<Vec<PostView>, ServiceError> {
        let ids = paginate(self.recent.list(actor, RecentKind::Post)?, page);
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            match self.content.get_post(&id) {
                Ok(post) => out.push(self.post_view(Some(actor), post)?),
                Err(ServiceError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Recently viewed user profiles, most recent first.
    pub fn recent_users(
        &self,
        actor: &str,
        page: &PageParams,
    ) -> Result<Vec<UserSummary>, ServiceError> {
        let ids = paginate(self.recent.list(actor, RecentKind::User)?, page);
        self.users.summaries(&ids)
    }
}
