use std::sync::Arc;

use openhome_core::ServiceError;
use openhome_sql::{Row, SQLStore, Value};

use crate::model::{User, UserSummary};

/// SQL schema for the users table.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id              TEXT PRIMARY KEY,
    username        TEXT NOT NULL,
    icon            TEXT,
    introduction    TEXT,
    follower_count  INTEGER NOT NULL DEFAULT 0,
    following_count INTEGER NOT NULL DEFAULT 0,
    like_count      INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(username)
";

/// Persistent storage for users, backed by SQLStore (SQLite).
pub struct UserStore {
    db: Arc<dyn SQLStore>,
}

impl UserStore {
    /// Create a new UserStore and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            db.exec(stmt, &[])
                .map_err(|e| ServiceError::Storage(format!("user schema init: {e}")))?;
        }
        Ok(Self { db })
    }

    /// Insert a new user. A duplicate username is a conflict.
    pub fn create(&self, user: &User) -> Result<(), ServiceError> {
        self.db
            .exec(
                "INSERT INTO users \
                 (id, username, icon, introduction, follower_count, following_count, like_count, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                &[
                    Value::Text(user.id.clone()),
                    Value::Text(user.username.clone()),
                    opt_text(&user.icon),
                    opt_text(&user.introduction),
                    Value::Integer(user.follower_count),
                    Value::Integer(user.following_count),
                    Value::Integer(user.like_count),
                    Value::Text(user.created_at.clone()),
                    Value::Text(user.updated_at.clone()),
                ],
            )
            .map_err(|e| match e {
                openhome_sql::SQLError::Constraint(_) => {
                    ServiceError::Conflict(format!("username '{}' is taken", user.username))
                }
                other => ServiceError::Storage(other.to_string()),
            })?;
        Ok(())
    }

    /// Get a user by id.
    pub fn get(&self, id: &str) -> Result<User, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT * FROM users WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("user {id}")))?;

        row_to_user(row)
    }

    /// Whether a user row exists.
    pub fn exists(&self, id: &str) -> Result<bool, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT 1 AS one FROM users WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    /// Fetch compact summaries for a batch of ids, preserving the input
    /// order. Missing ids are skipped silently.
    pub fn summaries(&self, ids: &[String]) -> Result<Vec<UserSummary>, ServiceError> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let rows = self
                .db
                .query(
                    "SELECT id, username, icon FROM users WHERE id = ?1",
                    &[Value::Text(id.clone())],
                )
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
            if let Some(row) = rows.first() {
                out.push(UserSummary {
                    id: required_str(row, "id")?,
                    username: required_str(row, "username")?,
                    icon: row.get_str("icon").map(str::to_string),
                });
            }
        }
        Ok(out)
    }

    /// Fetch one compact summary.
    pub fn summary(&self, id: &str) -> Result<Option<UserSummary>, ServiceError> {
        Ok(self.summaries(&[id.to_string()])?.into_iter().next())
    }
}

fn opt_text(v: &Option<String>) -> Value {
    match v {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

/// Map a users row back to the model.
fn row_to_user(row: &Row) -> Result<User, ServiceError> {
    Ok(User {
        id: required_str(row, "id")?,
        username: required_str(row, "username")?,
        icon: row.get_str("icon").map(str::to_string),
        introduction: row.get_str("introduction").map(str::to_string),
        follower_count: row.get_i64("follower_count").unwrap_or(0),
        following_count: row.get_i64("following_count").unwrap_or(0),
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

#[cfg(test)]
mod tests {
    use super::*;
    use openhome_core::now_rfc3339;
    use openhome_sql::SqliteStore;

    fn test_store() -> UserStore {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        UserStore::new(db).unwrap()
    }

    fn make_user(id: &str, username: &str) -> User {
        let now = now_rfc3339();
        User {
            id: id.into(),
            username: username.into(),
            icon: None,
            introduction: None,
            follower_count: 0,
            following_count: 0,
            like_count: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn create_and_get() {
        let store = test_store();
        store.create(&make_user("u1", "alice")).unwrap();

        let got = store.get("u1").unwrap();
        assert_eq!(got.username, "alice");
        assert_eq!(got.follower_count, 0);
        assert!(store.exists("u1").unwrap());
        assert!(!store.exists("u2").unwrap());
    }

    #[test]
    fn duplicate_username_is_conflict() {
        let store = test_store();
        store.create(&make_user("u1", "alice")).unwrap();
        assert!(matches!(
            store.create(&make_user("u2", "alice")),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn summaries_preserve_order_and_skip_missing() {
        let store = test_store();
        store.create(&make_user("u1", "alice")).unwrap();
        store.create(&make_user("u2", "bob")).unwrap();

        let got = store
            .summaries(&["u2".to_string(), "ghost".to_string(), "u1".to_string()])
            .unwrap();
        let names: Vec<&str> = got.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
    }
}
