use std::sync::Arc;

use openhome_core::{PageParams, ServiceError};
use openhome_sql::{Row, SQLStore, Value};

use crate::model::{Notification, NotificationKind, TargetKind};

/// SQL schema for the notifications table.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS notifications (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    is_read         INTEGER NOT NULL DEFAULT 0,
    kind            TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    actor_id        TEXT NOT NULL,
    target_id       TEXT,
    target_type     TEXT,
    target_excerpt  TEXT,
    content         TEXT,
    post_id         TEXT
);
CREATE INDEX IF NOT EXISTS idx_notif_recipient ON notifications(user_id, kind, created_at);
CREATE INDEX IF NOT EXISTS idx_notif_reversal ON notifications(actor_id, target_id, target_type, kind);
";

/// Persistent storage for notifications, backed by SQLStore (SQLite).
pub struct NotificationStore {
    db: Arc<dyn SQLStore>,
}

impl NotificationStore {
    /// Create a new NotificationStore and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            db.exec(stmt, &[])
                .map_err(|e| ServiceError::Storage(format!("notification schema init: {e}")))?;
        }
        Ok(Self { db })
    }

    /// Insert a notification record.
    pub fn insert(&self, n: &Notification) -> Result<(), ServiceError> {
        self.db
            .exec(
                "INSERT INTO notifications \
                 (id, user_id, is_read, kind, created_at, actor_id, target_id, target_type, target_excerpt, content, post_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                &[
                    Value::Text(n.id.clone()),
                    Value::Text(n.user_id.clone()),
                    Value::Integer(if n.is_read { 1 } else { 0 }),
                    Value::Text(n.kind.as_str().to_string()),
                    Value::Text(n.created_at.clone()),
                    Value::Text(n.actor_id.clone()),
                    opt_text(&n.target_id),
                    match n.target_type {
                        Some(t) => Value::Text(t.as_str().to_string()),
                        None => Value::Null,
                    },
                    opt_text(&n.target_excerpt),
                    opt_text(&n.content),
                    opt_text(&n.post_id),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Delete the LIKE notification produced by (actor, target). Returns
    /// the number of rows removed — zero is not an error (idempotent
    /// reversal).
    pub fn delete_like(
        &self,
        actor_id: &str,
        target_id: &str,
        target_type: TargetKind,
    ) -> Result<u64, ServiceError> {
        self.db
            .exec(
                "DELETE FROM notifications \
                 WHERE actor_id = ?1 AND target_id = ?2 AND target_type = ?3 AND kind = ?4",
                &[
                    Value::Text(actor_id.to_string()),
                    Value::Text(target_id.to_string()),
                    Value::Text(target_type.as_str().to_string()),
                    Value::Text(NotificationKind::Like.as_str().to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Delete the FOLLOW notification produced by follower → followee.
    /// Idempotent like [`delete_like`].
    pub fn delete_follow(&self, follower_id: &str, followee_id: &str) -> Result<u64, ServiceError> {
        self.db
            .exec(
                "DELETE FROM notifications \
                 WHERE actor_id = ?1 AND user_id = ?2 AND kind = ?3",
                &[
                    Value::Text(follower_id.to_string()),
                    Value::Text(followee_id.to_string()),
                    Value::Text(NotificationKind::Follow.as_str().to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Mark one notification read. Recipient-gated: the row must belong
    /// to `recipient`. Returns affected rows (1 even if already read —
    /// read state is monotonic and the call is idempotent).
    pub fn mark_read(&self, recipient: &str, id: &str) -> Result<u64, ServiceError> {
        self.db
            .exec(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
                &[Value::Text(id.to_string()), Value::Text(recipient.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Mark all of the recipient's notifications of the given kinds read.
    pub fn mark_all_read(
        &self,
        recipient: &str,
        kinds: &[NotificationKind],
    ) -> Result<u64, ServiceError> {
        let (clause, mut params) = kinds_clause(kinds, 2);
        params.insert(0, Value::Text(recipient.to_string()));
        self.db
            .exec(
                &format!(
                    "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0 AND {clause}"
                ),
                &params,
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Count unread notifications, optionally restricted to a kind set.
    pub fn count_unread(
        &self,
        recipient: &str,
        kinds: Option<&[NotificationKind]>,
    ) -> Result<i64, ServiceError> {
        let rows = match kinds {
            None => self
                .db
                .query(
                    "SELECT COUNT(*) AS cnt FROM notifications WHERE user_id = ?1 AND is_read = 0",
                    &[Value::Text(recipient.to_string())],
                )
                .map_err(|e| ServiceError::Storage(e.to_string()))?,
            Some(kinds) => {
                let (clause, mut params) = kinds_clause(kinds, 2);
                params.insert(0, Value::Text(recipient.to_string()));
                self.db
                    .query(
                        &format!(
                            "SELECT COUNT(*) AS cnt FROM notifications \
                             WHERE user_id = ?1 AND is_read = 0 AND {clause}"
                        ),
                        &params,
                    )
                    .map_err(|e| ServiceError::Storage(e.to_string()))?
            }
        };
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
    }

    /// List the recipient's notifications of the given kinds, newest
    /// first. A kind set spanning COMMENT and REPLY comes back merged in
    /// one created_at ordering.
    pub fn list(
        &self,
        recipient: &str,
        kinds: &[NotificationKind],
        page: &PageParams,
    ) -> Result<Vec<Notification>, ServiceError> {
        let (clause, mut params) = kinds_clause(kinds, 2);
        params.insert(0, Value::Text(recipient.to_string()));
        let limit_idx = params.len() + 1;
        let offset_idx = params.len() + 2;
        params.push(Value::Integer(page.limit() as i64));
        params.push(Value::Integer(page.offset() as i64));

        let rows = self
            .db
            .query(
                &format!(
                    "SELECT * FROM notifications WHERE user_id = ?1 AND {clause} \
                     ORDER BY created_at DESC LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
                ),
                &params,
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        rows.iter().map(row_to_notification).collect()
    }
}

fn opt_text(v: &Option<String>) -> Value {
    match v {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

/// Build a `kind IN (?n, ...)` clause with parameters starting at `first`.
fn kinds_clause(kinds: &[NotificationKind], first: usize) -> (String, Vec<Value>) {
    let placeholders: Vec<String> = (0..kinds.len()).map(|i| format!("?{}", first + i)).collect();
    let params = kinds
        .iter()
        .map(|k| Value::Text(k.as_str().to_string()))
        .collect();
    (format!("kind IN ({})", placeholders.join(", ")), params)
}

/// Map a notifications row back to the model.
fn row_to_notification(row: &Row) -> Result<Notification, ServiceError> {
    let kind = row
        .get_str("kind")
        .and_then(NotificationKind::from_str)
        .ok_or_else(|| ServiceError::Storage("bad notification kind".into()))?;

    Ok(Notification {
        id: required_str(row, "id")?,
        user_id: required_str(row, "user_id")?,
        is_read: row.get_i64("is_read").unwrap_or(0) != 0,
        kind,
        created_at: required_str(row, "created_at")?,
        actor_id: required_str(row, "actor_id")?,
        target_id: row.get_str("target_id").map(str::to_string),
        target_type: row.get_str("target_type").and_then(TargetKind::from_str),
        target_excerpt: row.get_str("target_excerpt").map(str::to_string),
        content: row.get_str("content").map(str::to_string),
        post_id: row.get_str("post_id").map(str::to_string),
    })
}

fn required_str(row: &Row, col: &str) -> Result<String, ServiceError> {
    row.get_str(col)
        .map(str::to_string)
        .ok_or_else(|| ServiceError::Storage(format!("missing {col} column")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use openhome_sql::SqliteStore;

    fn test_store() -> NotificationStore {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        NotificationStore::new(db).unwrap()
    }

    fn make(id: &str, recipient: &str, kind: NotificationKind, created_at: &str) -> Notification {
        Notification {
            id: id.into(),
            user_id: recipient.into(),
            is_read: false,
            kind,
            created_at: created_at.into(),
            actor_id: "actor".into(),
            target_id: Some("t1".into()),
            target_type: Some(TargetKind::Post),
            target_excerpt: Some("title".into()),
            content: None,
            post_id: Some("p1".into()),
        }
    }

    #[test]
    fn insert_and_list_newest_first() {
        let store = test_store();
        store
            .insert(&make("n1", "u1", NotificationKind::Like, "2026-01-01T00:00:01Z"))
            .unwrap();
        store
            .insert(&make("n2", "u1", NotificationKind::Like, "2026-01-01T00:00:03Z"))
            .unwrap();
        store
            .insert(&make("n3", "u1", NotificationKind::Like, "2026-01-01T00:00:02Z"))
            .unwrap();

        let items = store
            .list("u1", &[NotificationKind::Like], &PageParams::default())
            .unwrap();
        let ids: Vec<&str> = items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n2", "n3", "n1"]);
    }

    #[test]
    fn comment_and_reply_merge_sorted() {
        let store = test_store();
        store
            .insert(&make("c1", "u1", NotificationKind::Comment, "2026-01-01T00:00:01Z"))
            .unwrap();
        store
            .insert(&make("r1", "u1", NotificationKind::Reply, "2026-01-01T00:00:02Z"))
            .unwrap();
        store
            .insert(&make("c2", "u1", NotificationKind::Comment, "2026-01-01T00:00:03Z"))
            .unwrap();

        let items = store
            .list(
                "u1",
                &[NotificationKind::Comment, NotificationKind::Reply],
                &PageParams::default(),
            )
            .unwrap();
        let ids: Vec<&str> = items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "r1", "c1"]);
    }

    #[test]
    fn unread_counts_and_batch_read() {
        let store = test_store();
        store
            .insert(&make("n1", "u1", NotificationKind::Like, "2026-01-01T00:00:01Z"))
            .unwrap();
        store
            .insert(&make("n2", "u1", NotificationKind::Follow, "2026-01-01T00:00:02Z"))
            .unwrap();
        store
            .insert(&make("n3", "u2", NotificationKind::Like, "2026-01-01T00:00:03Z"))
            .unwrap();

        assert_eq!(store.count_unread("u1", None).unwrap(), 2);
        assert_eq!(
            store.count_unread("u1", Some(&[NotificationKind::Like])).unwrap(),
            1
        );

        let updated = store.mark_all_read("u1", &[NotificationKind::Like]).unwrap();
        assert_eq!(updated, 1);
        assert_eq!(store.count_unread("u1", None).unwrap(), 1);
        // Other recipients untouched.
        assert_eq!(store.count_unread("u2", None).unwrap(), 1);
    }

    #[test]
    fn mark_read_is_recipient_gated_and_idempotent() {
        let store = test_store();
        store
            .insert(&make("n1", "u1", NotificationKind::Like, "2026-01-01T00:00:01Z"))
            .unwrap();

        // Someone else cannot read-flag it.
        assert_eq!(store.mark_read("u2", "n1").unwrap(), 0);

        assert_eq!(store.mark_read("u1", "n1").unwrap(), 1);
        // Idempotent: marking again still matches the row.
        assert_eq!(store.mark_read("u1", "n1").unwrap(), 1);
        assert_eq!(store.count_unread("u1", None).unwrap(), 0);
    }

    #[test]
    fn delete_like_is_idempotent() {
        let store = test_store();
        store
            .insert(&make("n1", "u1", NotificationKind::Like, "2026-01-01T00:00:01Z"))
            .unwrap();

        assert_eq!(store.delete_like("actor", "t1", TargetKind::Post).unwrap(), 1);
        // Absent match is not an error.
        assert_eq!(store.delete_like("actor", "t1", TargetKind::Post).unwrap(), 0);
    }
}
