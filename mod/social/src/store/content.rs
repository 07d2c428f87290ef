use std::sync::Arc;

use notify::model::TargetKind;
use notify::resolver::{TargetResolver, TargetSnapshot};
use openhome_core::ServiceError;
use openhome_sql::{Row, SQLStore, TxStmt, Value};

use crate::model::{Comment, ContentStatus, Post, Reply};

/// SQL schema for posts, comments, and replies.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS posts (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    title         TEXT NOT NULL,
    content       TEXT NOT NULL,
    like_count    INTEGER NOT NULL DEFAULT 0,
    comment_count INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(user_id, created_at);
CREATE TABLE IF NOT EXISTS comments (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    post_id     TEXT NOT NULL,
    content     TEXT NOT NULL,
    status      TEXT NOT NULL,
    like_count  INTEGER NOT NULL DEFAULT 0,
    reply_count INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id, status);
CREATE TABLE IF NOT EXISTS replies (
    id         TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    comment_id TEXT NOT NULL,
    reply_to   TEXT,
    content    TEXT NOT NULL,
    status     TEXT NOT NULL,
    like_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_replies_comment ON replies(comment_id, status)
";

/// Owner, lifecycle status, and display snapshot of a like target.
#[derive(Debug, Clone)]
pub struct TargetMeta {
    pub owner_id: String,
    pub status: ContentStatus,
    pub excerpt: String,
    pub root_post_id: String,
}

/// Persistent storage for posts, comments, and replies.
///
/// Doubles as the [`TargetResolver`] the notify module uses to turn a
/// (kind, id) pair into an owner and content snapshot.
pub struct ContentStore {
    db: Arc<dyn SQLStore>,
}

impl ContentStore {
    /// Create a new ContentStore and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            db.exec(stmt, &[])
                .map_err(|e| ServiceError::Storage(format!("content schema init: {e}")))?;
        }
        Ok(Self { db })
    }

    // -----------------------------------------------------------------------
    // Posts
    // -----------------------------------------------------------------------

    /// Insert a new post.
    pub fn create_post(&self, post: &Post) -> Result<(), ServiceError> {
        self.db
            .exec(
                "INSERT INTO posts \
                 (id, user_id, title, content, like_count, comment_count, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                &[
                    Value::Text(post.id.clone()),
                    Value::Text(post.user_id.clone()),
                    Value::Text(post.title.clone()),
                    Value::Text(post.content.clone()),
                    Value::Integer(post.like_count),
                    Value::Integer(post.comment_count),
                    Value::Text(post.created_at.clone()),
                    Value::Text(post.updated_at.clone()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Get a post by id.
    pub fn get_post(&self, id: &str) -> Result<Post, ServiceError> {
        let rows = self
            .db
            .query("SELECT * FROM posts WHERE id = ?1", &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("post {id}")))?;
        row_to_post(row)
    }

    /// List posts, newest first, optionally restricted to one author.
    pub fn list_posts(
        &self,
        author: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>, ServiceError> {
        let rows = match author {
            Some(author) => self
                .db
                .query(
                    "SELECT * FROM posts WHERE user_id = ?1 \
                     ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
                    &[
                        Value::Text(author.to_string()),
                        Value::Integer(limit as i64),
                        Value::Integer(offset as i64),
                    ],
                )
                .map_err(|e| ServiceError::Storage(e.to_string()))?,
            None => self
                .db
                .query(
                    "SELECT * FROM posts ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
                    &[Value::Integer(limit as i64), Value::Integer(offset as i64)],
                )
                .map_err(|e| ServiceError::Storage(e.to_string()))?,
        };
        rows.iter().map(row_to_post).collect()
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    /// Statement inserting a comment. Splice into the same `exec_tx` unit
    /// as the post comment_count bump.
    pub fn insert_comment_stmt(&self, comment: &Comment) -> TxStmt {
        TxStmt::new(
            "INSERT INTO comments \
             (id, user_id, post_id, content, status, like_count, reply_count, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            vec![
                Value::Text(comment.id.clone()),
                Value::Text(comment.user_id.clone()),
                Value::Text(comment.post_id.clone()),
                Value::Text(comment.content.clone()),
                Value::Text(comment.status.as_str().to_string()),
                Value::Integer(comment.like_count),
                Value::Integer(comment.reply_count),
                Value::Text(comment.created_at.clone()),
                Value::Text(comment.updated_at.clone()),
            ],
        )
    }

    /// Get a comment by id.
    pub fn get_comment(&self, id: &str) -> Result<Comment, ServiceError> {
        let rows = self
            .db
            .query("SELECT * FROM comments WHERE id = ?1", &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("comment {id}")))?;
        row_to_comment(row)
    }

    /// List a post's OK comments, most liked first.
    pub fn list_comments(
        &self,
        post_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Comment>, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT * FROM comments WHERE post_id = ?1 AND status = ?2 \
                 ORDER BY like_count DESC, created_at DESC LIMIT ?3 OFFSET ?4",
                &[
                    Value::Text(post_id.to_string()),
                    Value::Text(ContentStatus::Ok.as_str().to_string()),
                    Value::Integer(limit as i64),
                    Value::Integer(offset as i64),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter().map(row_to_comment).collect()
    }

    /// Set a comment's status. Returns affected rows.
    pub fn set_comment_status(&self, id: &str, status: ContentStatus) -> Result<u64, ServiceError> {
        self.db
            .exec(
                "UPDATE comments SET status = ?1 WHERE id = ?2",
                &[
                    Value::Text(status.as_str().to_string()),
                    Value::Text(id.to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Replace a comment's text.
    pub fn update_comment_content(
        &self,
        id: &str,
        content: &str,
        updated_at: &str,
    ) -> Result<u64, ServiceError> {
        self.db
            .exec(
                "UPDATE comments SET content = ?1, updated_at = ?2 WHERE id = ?3",
                &[
                    Value::Text(content.to_string()),
                    Value::Text(updated_at.to_string()),
                    Value::Text(id.to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Replies
    // -----------------------------------------------------------------------

    /// Statement inserting a reply, for the same unit as the comment
    /// reply_count bump.
    pub fn insert_reply_stmt(&self, reply: &Reply) -> TxStmt {
        TxStmt::new(
            "INSERT INTO replies \
             (id, user_id, comment_id, reply_to, content, status, like_count, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            vec![
                Value::Text(reply.id.clone()),
                Value::Text(reply.user_id.clone()),
                Value::Text(reply.comment_id.clone()),
                match &reply.reply_to {
                    Some(s) => Value::Text(s.clone()),
                    None => Value::Null,
                },
                Value::Text(reply.content.clone()),
                Value::Text(reply.status.as_str().to_string()),
                Value::Integer(reply.like_count),
                Value::Text(reply.created_at.clone()),
                Value::Text(reply.updated_at.clone()),
            ],
        )
    }

    /// Get a reply by id.
    pub fn get_reply(&self, id: &str) -> Result<Reply, ServiceError> {
        let rows = self
            .db
            .query("SELECT * FROM replies WHERE id = ?1", &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("reply {id}")))?;
        row_to_reply(row)
    }

    /// List a comment's OK replies, newest first.
    pub fn list_replies(
        &self,
        comment_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Reply>, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT * FROM replies WHERE comment_id = ?1 AND status = ?2 \
                 ORDER BY created_at DESC LIMIT ?3 OFFSET ?4",
                &[
                    Value::Text(comment_id.to_string()),
                    Value::Text(ContentStatus::Ok.as_str().to_string()),
                    Value::Integer(limit as i64),
                    Value::Integer(offset as i64),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter().map(row_to_reply).collect()
    }

    /// Set a reply's status. Returns affected rows.
    pub fn set_reply_status(&self, id: &str, status: ContentStatus) -> Result<u64, ServiceError> {
        self.db
            .exec(
                "UPDATE replies SET status = ?1 WHERE id = ?2",
                &[
                    Value::Text(status.as_str().to_string()),
                    Value::Text(id.to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Replace a reply's text.
    pub fn update_reply_content(
        &self,
        id: &str,
        content: &str,
        updated_at: &str,
    ) -> Result<u64, ServiceError> {
        self.db
            .exec(
                "UPDATE replies SET content = ?1, updated_at = ?2 WHERE id = ?3",
                &[
                    Value::Text(content.to_string()),
                    Value::Text(updated_at.to_string()),
                    Value::Text(id.to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Target dispatch
    // -----------------------------------------------------------------------

    /// Resolve any like target to its owner, status, and snapshot.
    ///
    /// One dispatch point serves all three target kinds: posts snapshot
    /// their title, comments and replies their text, and every kind
    /// reports the post at its root.
    pub fn target_meta(&self, kind: TargetKind, id: &str) -> Result<TargetMeta, ServiceError> {
        match kind {
            TargetKind::Post => {
                let post = self.get_post(id)?;
                Ok(TargetMeta {
                    owner_id: post.user_id,
                    status: ContentStatus::Ok,
                    excerpt: post.title,
                    root_post_id: post.id,
                })
            }
            TargetKind::Comment => {
                let comment = self.get_comment(id)?;
                Ok(TargetMeta {
                    owner_id: comment.user_id,
                    status: comment.status,
                    excerpt: comment.content,
                    root_post_id: comment.post_id,
                })
            }
            TargetKind::Reply => {
                let rows = self
                    .db
                    .query(
                        "SELECT r.user_id AS owner, r.status AS status, r.content AS excerpt, \
                                c.post_id AS root \
                         FROM replies r JOIN comments c ON r.comment_id = c.id \
                         WHERE r.id = ?1",
                        &[Value::Text(id.to_string())],
                    )
                    .map_err(|e| ServiceError::Storage(e.to_string()))?;
                let row = rows
                    .first()
                    .ok_or_else(|| ServiceError::NotFound(format!("reply {id}")))?;
                Ok(TargetMeta {
                    owner_id: required_str(row, "owner")?,
                    status: row
                        .get_str("status")
                        .and_then(ContentStatus::from_str)
                        .ok_or_else(|| ServiceError::Storage("bad reply status".into()))?,
                    excerpt: required_str(row, "excerpt")?,
                    root_post_id: required_str(row, "root")?,
                })
            }
        }
    }
}

impl TargetResolver for ContentStore {
    fn resolve(&self, kind: TargetKind, target_id: &str) -> Result<TargetSnapshot, ServiceError> {
        let meta = self.target_meta(kind, target_id)?;
        Ok(TargetSnapshot {
            owner_id: meta.owner_id,
            excerpt: meta.excerpt,
            root_post_id: Some(meta.root_post_id),
        })
    }
}

/// Map a posts row back to the model.
fn row_to_post(row: &Row) -> Result<Post, ServiceError> {
    Ok(Post {
        id: required_str(row, "id")?,
        user_id: required_str(row, "user_id")?,
        title: required_str(row, "title")?,
        content: required_str(row, "content")?,
        like_count: row.get_i64("like_count").unwrap_or(0),
        comment_count: row.get_i64("comment_count").unwrap_or(0),
        created_at: required_str(row, "created_at")?,
        updated_at: required_str(row, "updated_at")?,
    })
}

/// Map a comments row back to the model.
fn row_to_comment(row: &Row) -> Result<Comment, ServiceError> {
    Ok(Comment {
        id: required_str(row, "id")?,
        user_id: required_str(row, "user_id")?,
        post_id: required_str(row, "post_id")?,
        content: required_str(row, "content")?,
        status: row
            .get_str("status")
            .and_then(ContentStatus::from_str)
            .ok_or_else(|| ServiceError::Storage("bad comment status".into()))?,
        like_count: row.get_i64("like_count").unwrap_or(0),
        reply_count: row.get_i64("reply_count").unwrap_or(0),
        created_at: required_str(row, "created_at")?,
        updated_at: required_str(row, "updated_at")?,
    })
}

/// Map a replies row back to the model.
fn row_to_reply(row: &Row) -> Result<Reply, ServiceError> {
    Ok(Reply {
        id: required_str(row, "id")?,
        user_id: required_str(row, "user_id")?,
        comment_id: required_str(row, "comment_id")?,
        reply_to: row.get_str("reply_to").map(str::to_string),
        content: required_str(row, "content")?,
        status: row
            .get_str("status")
            .and_then(ContentStatus::from_str)
            .ok_or_else(|| ServiceError::Storage("bad reply status".into()))?,
        like_count: row.get_i64("like_count").unwrap_or(0),
        created_at: required_str(row, "created_at")?,
        updated_at: required_str(row, "updated_at")?,
    })
}

fn required_str(row: &Row, col: &str) -> Result<String, ServiceError> {
    row.get_str(col)
        .map(str::to_string)
        .ok_or_else(|| ServiceError::Storage(format!("missing {col} column")))
}
