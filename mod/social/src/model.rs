use serde::{Deserialize, Serialize};

pub use notify::model::TargetKind;

// ---------------------------------------------------------------------------
// ContentStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a comment or reply.
///
/// ```text
/// OK ⇄ ARCHIVED
/// OK → DELETED
/// ARCHIVED → DELETED
/// ```
///
/// DELETED is terminal: no further transition is accepted. Listings only
/// ever return OK items; ARCHIVED hides an item reversibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentStatus {
    Ok,
    Archived,
    Deleted,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Archived => "ARCHIVED",
            Self::Deleted => "DELETED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OK" => Some(Self::Ok),
            "ARCHIVED" => Some(Self::Archived),
            "DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entities — map 1:1 to SQL columns
// ---------------------------------------------------------------------------

/// A registered user with denormalized engagement counters.
///
/// The counters move only inside the same transaction as the ledger or
/// graph mutation that justifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,

    /// How many users follow this user.
    #[serde(default)]
    pub follower_count: i64,

    /// How many users this user follows.
    #[serde(default)]
    pub following_count: i64,

    /// Likes received across all of this user's content.
    #[serde(default)]
    pub like_count: i64,

    pub created_at: String,
    pub updated_at: String,
}

/// A post. Posts have no status lifecycle — only comments and replies do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,

    #[serde(default)]
    pub like_count: i64,

    #[serde(default)]
    pub comment_count: i64,

    pub created_at: String,
    pub updated_at: String,
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub content: String,
    pub status: ContentStatus,

    #[serde(default)]
    pub like_count: i64,

    #[serde(default)]
    pub reply_count: i64,

    pub created_at: String,
    pub updated_at: String,
}

/// A reply under a comment, optionally pointed at another reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub user_id: String,
    pub comment_id: String,

    /// The reply being answered, when this is a reply-to-reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    pub content: String,
    pub status: ContentStatus,

    #[serde(default)]
    pub like_count: i64,

    pub created_at: String,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Views — entity + viewer-dependent flags
// ---------------------------------------------------------------------------

/// Compact user representation for lists and view embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A post as seen by one viewer. Anonymous viewers see `isLiked: false`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub is_liked: bool,
    pub is_creator: bool,
}

/// A comment as seen by one viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<UserSummary>,
    pub is_liked: bool,
    pub is_creator: bool,
}

/// A reply as seen by one viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    #[serde(flatten)]
    pub reply: Reply,
    pub author: Option<UserSummary>,
    pub is_liked: bool,
    pub is_creator: bool,
}

// ---------------------------------------------------------------------------
// Recent views
// ---------------------------------------------------------------------------

/// What a recent-view record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecentKind {
    Post,
    User,
}

impl RecentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::User => "USER",
        }
    }
}

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Body for `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub introduction: Option<String>,
}

/// Body for `POST /posts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub title: String,

    #[serde(default)]
    pub content: String,
}

/// Body for `POST /likes` and `POST /likes/@cancel`; also the
/// query shape of `GET /likes/@status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub target_type: TargetKind,
    pub target_id: String,
}

/// Body for `POST /follows` and `POST /follows/@cancel`; also the
/// query shape of `GET /follows/@status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: String,
}

/// Query for the follow list endpoints. `userId` defaults to the caller.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowListQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body for `POST /comments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub post_id: String,
    pub content: String,
}

/// Query for `GET /comments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    pub post_id: String,
}

/// Body for `POST /replies`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReply {
    pub comment_id: String,

    /// Optional id of the reply being answered.
    #[serde(default)]
    pub reply_to: Option<String>,

    pub content: String,
}

/// Query for `GET /replies`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyListQuery {
    pub comment_id: String,
}

/// Body for comment/reply content updates.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContent {
    pub content: String,
}

/// Body for `POST /recent-views`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub target_type: RecentKind,
    pub target_id: String,
}

/// Query for `GET /posts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    /// Restrict to one author's posts.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for s in &[ContentStatus::Ok, ContentStatus::Archived, ContentStatus::Deleted] {
            assert_eq!(ContentStatus::from_str(s.as_str()), Some(*s));
            let json = serde_json::to_string(s).unwrap();
            let back: ContentStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(*s, back);
        }
        assert_eq!(ContentStatus::from_str("GONE"), None);
    }

    #[test]
    fn status_terminality() {
        assert!(!ContentStatus::Ok.is_terminal());
        assert!(!ContentStatus::Archived.is_terminal());
        assert!(ContentStatus::Deleted.is_terminal());
    }

    #[test]
    fn like_request_deserialize() {
        let req: LikeRequest =
            serde_json::from_str(r#"{"targetType":"COMMENT","targetId":"c1"}"#).unwrap();
        assert_eq!(req.target_type, TargetKind::Comment);
        assert_eq!(req.target_id, "c1");
    }

    #[test]
    fn post_view_flattens() {
        let view = PostView {
            post: Post {
                id: "p1".into(),
                user_id: "u1".into(),
                title: "t".into(),
                content: "c".into(),
                like_count: 3,
                comment_count: 0,
                created_at: "2026-01-01T00:00:00Z".into(),
                updated_at: "2026-01-01T00:00:00Z".into(),
            },
            is_liked: true,
            is_creator: false,
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"id\":\"p1\""));
        assert!(json.contains("\"isLiked\":true"));
        assert!(json.contains("\"likeCount\":3"));
    }
}
