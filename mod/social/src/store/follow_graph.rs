use std::sync::Arc;

use openhome_core::{now_rfc3339, ServiceError};
use openhome_sql::{SQLStore, TxStmt, Value};

/// SQL schema for the follow graph.
///
/// The composite primary key enforces at-most-one-edge; no-self-follow
/// is enforced by the facade before the edge is attempted.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS follow_edges (
    follower_id TEXT NOT NULL,
    followee_id TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    PRIMARY KEY (follower_id, followee_id)
);
CREATE INDEX IF NOT EXISTS idx_follow_followee ON follow_edges(followee_id)
";

/// Directed follower → followee edges.
pub struct FollowGraph {
    db: Arc<dyn SQLStore>,
}

impl FollowGraph {
    /// Create a new FollowGraph and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            db.exec(stmt, &[])
                .map_err(|e| ServiceError::Storage(format!("follow graph schema init: {e}")))?;
        }
        Ok(Self { db })
    }

    /// Whether follower → followee currently holds.
    pub fn exists(&self, follower_id: &str, followee_id: &str) -> Result<bool, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT 1 AS one FROM follow_edges WHERE follower_id = ?1 AND followee_id = ?2",
                &[
                    Value::Text(follower_id.to_string()),
                    Value::Text(followee_id.to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    /// Ids this user follows, newest edge first.
    pub fn list_following(&self, user_id: &str) -> Result<Vec<String>, ServiceError> {
        self.id_column(
            "SELECT followee_id AS uid FROM follow_edges \
             WHERE follower_id = ?1 ORDER BY created_at DESC",
            user_id,
        )
    }

    /// Ids following this user, newest edge first.
    pub fn list_followers(&self, user_id: &str) -> Result<Vec<String>, ServiceError> {
        self.id_column(
            "SELECT follower_id AS uid FROM follow_edges \
             WHERE followee_id = ?1 ORDER BY created_at DESC",
            user_id,
        )
    }

    fn id_column(&self, sql: &str, user_id: &str) -> Result<Vec<String>, ServiceError> {
        let rows = self
            .db
            .query(sql, &[Value::Text(user_id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get_str("uid").map(str::to_string))
            .collect())
    }

    /// Statement inserting an edge. A duplicate edge dies on the
    /// composite key inside the transaction.
    pub fn insert_stmt(&self, follower_id: &str, followee_id: &str) -> TxStmt {
        TxStmt::new(
            "INSERT INTO follow_edges (follower_id, followee_id, created_at) VALUES (?1, ?2, ?3)",
            vec![
                Value::Text(follower_id.to_string()),
                Value::Text(followee_id.to_string()),
                Value::Text(now_rfc3339()),
            ],
        )
    }

    /// Statement removing an edge. Marked `required`: unfollowing a
    /// relation that does not exist aborts the whole unit.
    pub fn delete_stmt(&self, follower_id: &str, followee_id: &str) -> TxStmt {
        TxStmt::new(
            "DELETE FROM follow_edges WHERE follower_id = ?1 AND followee_id = ?2",
            vec![
                Value::Text(follower_id.to_string()),
                Value::Text(followee_id.to_string()),
            ],
        )
        .required()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openhome_sql::{SQLError, SqliteStore};

    fn test_graph() -> (Arc<dyn SQLStore>, FollowGraph) {
        let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let graph = FollowGraph::new(Arc::clone(&db)).unwrap();
        (db, graph)
    }

    #[test]
    fn edge_lifecycle() {
        let (db, graph) = test_graph();
        assert!(!graph.exists("a", "b").unwrap());

        db.exec_tx(&[graph.insert_stmt("a", "b")]).unwrap();
        assert!(graph.exists("a", "b").unwrap());
        // Directed: the reverse edge does not exist.
        assert!(!graph.exists("b", "a").unwrap());

        db.exec_tx(&[graph.delete_stmt("a", "b")]).unwrap();
        assert!(!graph.exists("a", "b").unwrap());
    }

    #[test]
    fn duplicate_edge_is_constraint() {
        let (db, graph) = test_graph();
        db.exec_tx(&[graph.insert_stmt("a", "b")]).unwrap();
        let result = db.exec_tx(&[graph.insert_stmt("a", "b")]);
        assert!(matches!(result, Err(SQLError::Constraint(_))));
    }

    #[test]
    fn delete_of_absent_edge_aborts() {
        let (db, graph) = test_graph();
        let result = db.exec_tx(&[graph.delete_stmt("a", "b")]);
        assert!(matches!(result, Err(SQLError::Aborted { index: 0 })));
    }

    #[test]
    fn lists_follow_direction() {
        let (db, graph) = test_graph();
        db.exec_tx(&[graph.insert_stmt("a", "b")]).unwrap();
        db.exec_tx(&[graph.insert_stmt("a", "c")]).unwrap();
        db.exec_tx(&[graph.insert_stmt("d", "a")]).unwrap();

        let following = graph.list_following("a").unwrap();
        assert_eq!(following.len(), 2);
        assert!(following.contains(&"b".to_string()));
        assert!(following.contains(&"c".to_string()));

        assert_eq!(graph.list_followers("a").unwrap(), vec!["d".to_string()]);
        assert_eq!(graph.list_followers("b").unwrap(), vec!["a".to_string()]);
    }
}
