use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub(crate) const VERB_LIKED_POST: &str = "liked your post";
pub(crate) const VERB_COMMENTED_POST: &str = "commented on your post";
pub(crate) const VERB_FOLLOWED: &str = "started following you";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TargetKind {
    Post,
    Comment,
    User,
}

impl TargetKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
            TargetKind::User => "user",
        }
    }

    pub(crate) fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "post" => Ok(TargetKind::Post),
            "comment" => Ok(TargetKind::Comment),
            "user" => Ok(TargetKind::User),
            other => Err(DomainError::Unexpected(format!(
                "unknown notification target kind: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NotificationTarget {
    pub(crate) kind: TargetKind,
    pub(crate) id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Notification {
    pub(crate) id: i64,
    pub(crate) recipient_id: i64,
    pub(crate) actor_id: i64,
    pub(crate) actor_username: String,
    pub(crate) verb: String,
    pub(crate) target: Option<NotificationTarget>,
    pub(crate) read: bool,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewNotification {
    pub(crate) recipient_id: i64,
    pub(crate) actor_id: i64,
    pub(crate) verb: &'static str,
    pub(crate) target: Option<NotificationTarget>,
}

/// A notification whose target is only known once the triggering row is
/// written. Repositories store the row and the notification together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotificationDraft {
    pub(crate) recipient_id: i64,
    pub(crate) actor_id: i64,
    pub(crate) verb: &'static str,
}

impl NotificationDraft {
    /// `None` when the actor would be notifying themself.
    pub(crate) fn for_action(recipient_id: i64, actor_id: i64, verb: &'static str) -> Option<Self> {
        if recipient_id == actor_id {
            return None;
        }
        Some(Self {
            recipient_id,
            actor_id,
            verb,
        })
    }

    pub(crate) fn about(self, kind: TargetKind, id: i64) -> NewNotification {
        NewNotification {
            recipient_id: self.recipient_id,
            actor_id: self.actor_id,
            verb: self.verb,
            target: Some(NotificationTarget { kind, id }),
        }
    }
}

/// Rebuilds the optional target from its two nullable storage columns.
pub(crate) fn target_from_columns(
    kind: Option<&str>,
    id: Option<i64>,
) -> Result<Option<NotificationTarget>, DomainError> {
    match (kind, id) {
        (Some(kind), Some(id)) => Ok(Some(NotificationTarget {
            kind: TargetKind::parse(kind)?,
            id,
        })),
        (None, None) => Ok(None),
        _ => Err(DomainError::Unexpected(
            "notification target kind/id must be set together".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        NotificationDraft, NotificationTarget, TargetKind, VERB_LIKED_POST, target_from_columns,
    };

    #[test]
    fn drafts_skip_self_notifications() {
        assert!(NotificationDraft::for_action(1, 1, VERB_LIKED_POST).is_none());

        let created = NotificationDraft::for_action(2, 1, VERB_LIKED_POST)
            .expect("different users must produce a notification")
            .about(TargetKind::Post, 5);
        assert_eq!(created.recipient_id, 2);
        assert_eq!(created.actor_id, 1);
        assert_eq!(
            created.target,
            Some(NotificationTarget {
                kind: TargetKind::Post,
                id: 5,
            })
        );
    }

    #[test]
    fn target_columns_must_be_paired() {
        assert!(target_from_columns(None, None).expect("empty is valid").is_none());
        assert!(target_from_columns(Some("post"), None).is_err());
        assert!(target_from_columns(Some("group"), Some(1)).is_err());

        let target = target_from_columns(Some("comment"), Some(9))
            .expect("valid columns")
            .expect("target must be present");
        assert_eq!(target.kind, TargetKind::Comment);
        assert_eq!(target.id, 9);
    }
}
