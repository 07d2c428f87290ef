use std::sync::Arc;

use openhome_core::{now_rfc3339, ServiceError};
use openhome_kv::KVStore;

use crate::model::RecentKind;

/// Recently-viewed tracking over the KV store.
///
/// Key layout: `recent:{viewer}:{POST|USER}:{target}` → RFC 3339 view
/// time. Writing is an upsert, so re-viewing the same target just moves
/// it to the front — dedup falls out of the key shape.
pub struct RecentViews {
    kv: Arc<dyn KVStore>,
}

impl RecentViews {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn key(viewer: &str, kind: RecentKind, target_id: &str) -> String {
        format!("recent:{viewer}:{}:{target_id}", kind.as_str())
    }

    /// Record (or refresh) a view.
    pub fn record(&self, viewer: &str, kind: RecentKind, target_id: &str) -> Result<(), ServiceError> {
        self.kv
            .set(&Self::key(viewer, kind, target_id), now_rfc3339().as_bytes())
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Target ids the viewer looked at, most recent first.
    pub fn list(&self, viewer: &str, kind: RecentKind) -> Result<Vec<String>, ServiceError> {
        let prefix = format!("recent:{viewer}:{}:", kind.as_str());
        let entries = self
            .kv
            .scan(&prefix)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut hits: Vec<(String, String)> = entries
            .into_iter()
            .map(|(key, value)| {
                let target = key[prefix.len()..].to_string();
                let seen_at = String::from_utf8_lossy(&value).into_owned();
                (seen_at, target)
            })
            .collect();

        hits.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(hits.into_iter().map(|(_, target)| target).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openhome_kv::RedbStore;

    fn test_views() -> (tempfile::TempDir, RecentViews) {
        let tmp = tempfile::TempDir::new().unwrap();
        let kv = Arc::new(RedbStore::open(&tmp.path().join("test.redb")).unwrap());
        (tmp, RecentViews::new(kv))
    }

    #[test]
    fn records_and_lists_most_recent_first() {
        let (_tmp, views) = test_views();
        views.record("u1", RecentKind::Post, "p1").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        views.record("u1", RecentKind::Post, "p2").unwrap();

        assert_eq!(views.list("u1", RecentKind::Post).unwrap(), vec!["p2", "p1"]);
    }

    #[test]
    fn re_viewing_dedups_and_reorders() {
        let (_tmp, views) = test_views();
        views.record("u1", RecentKind::Post, "p1").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        views.record("u1", RecentKind::Post, "p2").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        views.record("u1", RecentKind::Post, "p1").unwrap();

        assert_eq!(views.list("u1", RecentKind::Post).unwrap(), vec!["p1", "p2"]);
    }

    #[test]
    fn kinds_and_viewers_are_isolated() {
        let (_tmp, views) = test_views();
        views.record("u1", RecentKind::Post, "p1").unwrap();
        views.record("u1", RecentKind::User, "u9").unwrap();
        views.record("u2", RecentKind::Post, "p2").unwrap();

        assert_eq!(views.list("u1", RecentKind::Post).unwrap(), vec!["p1"]);
        assert_eq!(views.list("u1", RecentKind::User).unwrap(), vec!["u9"]);
        assert_eq!(views.list("u2", RecentKind::Post).unwrap(), vec!["p2"]);
    }
}
