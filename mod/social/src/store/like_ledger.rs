use std::sync::Arc;

use notify::model::TargetKind;
use openhome_core::{now_rfc3339, ServiceError};
use openhome_sql::{SQLStore, TxStmt, Value};

/// SQL schema for the like ledger.
///
/// The composite primary key IS the at-most-one-like-per-user-per-target
/// invariant: a duplicate like dies on the constraint inside the
/// transaction, never in application logic.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS like_records (
    user_id     TEXT NOT NULL,
    target_id   TEXT NOT NULL,
    target_type TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    PRIMARY KEY (user_id, target_id, target_type)
)
";

/// The set of currently-active like relationships.
pub struct LikeLedger {
    db: Arc<dyn SQLStore>,
}

impl LikeLedger {
    /// Create a new LikeLedger and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        db.exec(SCHEMA, &[])
            .map_err(|e| ServiceError::Storage(format!("like ledger schema init: {e}")))?;
        Ok(Self { db })
    }

    /// Whether (user, target) currently holds an active like.
    pub fn has_like(
        &self,
        user_id: &str,
        target_id: &str,
        target_type: TargetKind,
    ) -> Result<bool, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT 1 AS one FROM like_records \
                 WHERE user_id = ?1 AND target_id = ?2 AND target_type = ?3",
                &[
                    Value::Text(user_id.to_string()),
                    Value::Text(target_id.to_string()),
                    Value::Text(target_type.as_str().to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    /// Statement inserting a like record. Splice into an `exec_tx` unit;
    /// a duplicate key surfaces as a constraint error there.
    pub fn insert_stmt(&self, user_id: &str, target_id: &str, target_type: TargetKind) -> TxStmt {
        TxStmt::new(
            "INSERT INTO like_records (user_id, target_id, target_type, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
            vec![
                Value::Text(user_id.to_string()),
                Value::Text(target_id.to_string()),
                Value::Text(target_type.as_str().to_string()),
                Value::Text(now_rfc3339()),
            ],
        )
    }

    /// Statement removing a like record. Marked `required`, so reversing
    /// a like that does not exist aborts the whole unit.
    pub fn delete_stmt(&self, user_id: &str, target_id: &str, target_type: TargetKind) -> TxStmt {
        TxStmt::new(
            "DELETE FROM like_records \
             WHERE user_id = ?1 AND target_id = ?2 AND target_type = ?3",
            vec![
                Value::Text(user_id.to_string()),
                Value::Text(target_id.to_string()),
                Value::Text(target_type.as_str().to_string()),
            ],
        )
        .required()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openhome_sql::{SQLError, SqliteStore};

    fn test_ledger() -> (Arc<dyn SQLStore>, LikeLedger) {
        let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let ledger = LikeLedger::new(Arc::clone(&db)).unwrap();
        (db, ledger)
    }

    #[test]
    fn insert_then_has_like() {
        let (db, ledger) = test_ledger();
        assert!(!ledger.has_like("u1", "p1", TargetKind::Post).unwrap());

        db.exec_tx(&[ledger.insert_stmt("u1", "p1", TargetKind::Post)]).unwrap();
        assert!(ledger.has_like("u1", "p1", TargetKind::Post).unwrap());

        // Same id under a different kind is a different key.
        assert!(!ledger.has_like("u1", "p1", TargetKind::Comment).unwrap());
    }

    #[test]
    fn duplicate_insert_is_constraint() {
        let (db, ledger) = test_ledger();
        db.exec_tx(&[ledger.insert_stmt("u1", "p1", TargetKind::Post)]).unwrap();

        let result = db.exec_tx(&[ledger.insert_stmt("u1", "p1", TargetKind::Post)]);
        assert!(matches!(result, Err(SQLError::Constraint(_))));
    }

    #[test]
    fn delete_of_absent_like_aborts() {
        let (db, ledger) = test_ledger();
        let result = db.exec_tx(&[ledger.delete_stmt("u1", "p1", TargetKind::Post)]);
        assert!(matches!(result, Err(SQLError::Aborted { index: 0 })));
    }
}
