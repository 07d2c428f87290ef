//! Counter Store — the only place denormalized counters are written.
//!
//! Every function builds a single-row UPDATE as a [`TxStmt`] so the
//! caller can splice it into the same `exec_tx` unit as the ledger or
//! graph mutation it pays for. Decrements clamp at zero.

use notify::model::TargetKind;
use openhome_sql::{TxStmt, Value};

fn delta_stmt(table: &str, column: &str, id: &str, delta: i64) -> TxStmt {
    TxStmt::new(
        format!("UPDATE {table} SET {column} = MAX({column} + ?1, 0) WHERE id = ?2"),
        vec![Value::Integer(delta), Value::Text(id.to_string())],
    )
}

/// Adjust a like target's like_count.
pub fn like_count_delta(kind: TargetKind, target_id: &str, delta: i64) -> TxStmt {
    let table = match kind {
        TargetKind::Post => "posts",
        TargetKind::Comment => "comments",
        TargetKind::Reply => "replies",
    };
    delta_stmt(table, "like_count", target_id, delta)
}

/// Adjust a post's comment_count.
pub fn comment_count_delta(post_id: &str, delta: i64) -> TxStmt {
    delta_stmt("posts", "comment_count", post_id, delta)
}

/// Adjust a comment's reply_count.
pub fn reply_count_delta(comment_id: &str, delta: i64) -> TxStmt {
    delta_stmt("comments", "reply_count", comment_id, delta)
}

/// Adjust a user's follower_count.
pub fn follower_count_delta(user_id: &str, delta: i64) -> TxStmt {
    delta_stmt("users", "follower_count", user_id, delta)
}

/// Adjust a user's following_count.
pub fn following_count_delta(user_id: &str, delta: i64) -> TxStmt {
    delta_stmt("users", "following_count", user_id, delta)
}

/// Adjust a user's received-likes counter.
pub fn likes_received_delta(user_id: &str, delta: i64) -> TxStmt {
    delta_stmt("users", "like_count", user_id, delta)
}
