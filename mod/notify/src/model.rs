use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TargetKind
// ---------------------------------------------------------------------------

/// The kind of entity a like (or reply) points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    Post,
    Comment,
    Reply,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Comment => "COMMENT",
            Self::Reply => "REPLY",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "POST" => Some(Self::Post),
            "COMMENT" => Some(Self::Comment),
            "REPLY" => Some(Self::Reply),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

/// What engagement event produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Like,
    Follow,
    Comment,
    Reply,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Follow => "FOLLOW",
            Self::Comment => "COMMENT",
            Self::Reply => "REPLY",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LIKE" => Some(Self::Like),
            "FOLLOW" => Some(Self::Follow),
            "COMMENT" => Some(Self::Comment),
            "REPLY" => Some(Self::Reply),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Category — the client-facing grouping
// ---------------------------------------------------------------------------

/// Notification category as presented to clients.
///
/// COMMENT and REPLY notifications are one category: they are merged and
/// sorted together by creation time when listed or counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Like,
    Follow,
    Comment,
}

impl Category {
    /// The notification kinds this category spans.
    pub fn kinds(&self) -> &'static [NotificationKind] {
        match self {
            Self::Like => &[NotificationKind::Like],
            Self::Follow => &[NotificationKind::Follow],
            Self::Comment => &[NotificationKind::Comment, NotificationKind::Reply],
        }
    }
}

// ---------------------------------------------------------------------------
// Notification — maps 1:1 to SQL columns
// ---------------------------------------------------------------------------

/// A single notification record.
///
/// Created by the fan-out hooks as a side effect of an engagement action;
/// LIKE and FOLLOW records are deleted again when the action is reversed.
/// Target content is snapshotted at creation time so the notification
/// stays renderable after the target changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,

    /// Recipient.
    pub user_id: String,

    #[serde(rename = "read")]
    pub is_read: bool,

    pub kind: NotificationKind,

    pub created_at: String,

    /// Who performed the action.
    pub actor_id: String,

    /// Liked/replied-to entity. Absent for FOLLOW.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetKind>,

    /// Snapshot of the target at event time (post title, or
    /// comment/reply text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_excerpt: Option<String>,

    /// The authored comment/reply text, for COMMENT and REPLY kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// The post at the root of the target, for deep-linking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
}

// ---------------------------------------------------------------------------
// API query types
// ---------------------------------------------------------------------------

/// Query parameter carrying a mandatory category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryParam {
    pub category: Category,
}

/// Query parameter for unread counting — absent means "all categories".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: Option<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrip() {
        for k in &[
            NotificationKind::Like,
            NotificationKind::Follow,
            NotificationKind::Comment,
            NotificationKind::Reply,
        ] {
            assert_eq!(NotificationKind::from_str(k.as_str()), Some(*k));
        }
        assert_eq!(NotificationKind::from_str("NOPE"), None);
    }

    #[test]
    fn target_kind_roundtrip() {
        for k in &[TargetKind::Post, TargetKind::Comment, TargetKind::Reply] {
            assert_eq!(TargetKind::from_str(k.as_str()), Some(*k));
            let json = serde_json::to_string(k).unwrap();
            let back: TargetKind = serde_json::from_str(&json).unwrap();
            assert_eq!(*k, back);
        }
    }

    #[test]
    fn comment_category_spans_replies() {
        assert_eq!(
            Category::Comment.kinds(),
            &[NotificationKind::Comment, NotificationKind::Reply]
        );
        assert_eq!(Category::Like.kinds(), &[NotificationKind::Like]);
    }

    #[test]
    fn notification_json_shape() {
        let n = Notification {
            id: "n1".into(),
            user_id: "u2".into(),
            is_read: false,
            kind: NotificationKind::Like,
            created_at: "2026-01-01T00:00:00Z".into(),
            actor_id: "u1".into(),
            target_id: Some("p1".into()),
            target_type: Some(TargetKind::Post),
            target_excerpt: Some("hello".into()),
            content: None,
            post_id: Some("p1".into()),
        };
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"read\":false"));
        assert!(json.contains("\"kind\":\"LIKE\""));
        assert!(json.contains("\"targetType\":\"POST\""));
        // Absent optionals are omitted.
        assert!(!json.contains("\"content\""));
    }
}
