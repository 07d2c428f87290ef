use notify::model::TargetKind;
use openhome_core::ServiceError;
use openhome_sql::SQLError;
use tracing::warn;

use crate::model::ContentStatus;
use crate::service::SocialService;
use crate::store::counters;

/// Human noun for a target kind, for error messages.
fn noun(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Post => "post",
        TargetKind::Comment => "comment",
        TargetKind::Reply => "reply",
    }
}

impl SocialService {
    /// Like a post, comment, or reply.
    ///
    /// The ledger insert and both counter bumps (target like_count, owner
    /// likes-received) commit as one unit: a duplicate like dies on the
    /// ledger's primary key and rolls the counters back with it.
    pub fn like(
        &self,
        actor: &str,
        target_type: TargetKind,
        target_id: &str,
    ) -> Result<bool, ServiceError> {
        let target = self.content.target_meta(target_type, target_id)?;
        if target.status != ContentStatus::Ok {
            // Hidden or deleted content is not likeable.
            return Err(ServiceError::NotFound(format!(
                "{} {target_id}",
                noun(target_type)
            )));
        }

        let stmts = [
            self.likes.insert_stmt(actor, target_id, target_type),
            counters::like_count_delta(target_type, target_id, 1).required(),
            counters::likes_received_delta(&target.owner_id, 1).required(),
        ];
        match self.sql.exec_tx(&stmts) {
            Ok(_) => {}
            Err(SQLError::Constraint(_)) => {
                return Err(ServiceError::Conflict("already liked".into()))
            }
            Err(SQLError::Aborted { index: 2 }) => {
                return Err(ServiceError::NotFound(format!("user {}", target.owner_id)))
            }
            Err(SQLError::Aborted { .. }) => {
                return Err(ServiceError::NotFound(format!(
                    "{} {target_id}",
                    noun(target_type)
                )))
            }
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        }

        if let Err(e) = self.notify.on_like(actor, target_type, target_id) {
            warn!(error = %e, "like notification fan-out failed");
        }
        Ok(true)
    }

    /// Withdraw a like. Reversal of a like that does not exist is an
    /// invalid state, caught by the ledger delete inside the unit.
    pub fn unlike(
        &self,
        actor: &str,
        target_type: TargetKind,
        target_id: &str,
    ) -> Result<bool, ServiceError> {
        let target = self.content.target_meta(target_type, target_id)?;

        let stmts = [
            self.likes.delete_stmt(actor, target_id, target_type),
            counters::like_count_delta(target_type, target_id, -1).required(),
            counters::likes_received_delta(&target.owner_id, -1).required(),
        ];
        match self.sql.exec_tx(&stmts) {
            Ok(_) => {}
            Err(SQLError::Aborted { index: 0 }) => {
                return Err(ServiceError::InvalidState("not liked".into()))
            }
            Err(SQLError::Aborted { index: 2 }) => {
                return Err(ServiceError::NotFound(format!("user {}", target.owner_id)))
            }
            Err(SQLError::Aborted { .. }) => {
                return Err(ServiceError::NotFound(format!(
                    "{} {target_id}",
                    noun(target_type)
                )))
            }
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        }

        if let Err(e) = self.notify.on_unlike(actor, target_type, target_id) {
            warn!(error = %e, "unlike notification fan-out failed");
        }
        Ok(true)
    }

    /// Whether the viewer currently likes the target. Anonymous viewers
    /// are simply "not liked" — never an error.
    pub fn check_like_status(
        &self,
        viewer: Option<&str>,
        target_type: TargetKind,
        target_id: &str,
    ) -> Result<bool, ServiceError> {
        match viewer {
            None => Ok(false),
            Some(v) if v.is_empty() => Ok(false),
            Some(v) => self.likes.has_like(v, target_id, target_type),
        }
    }
}
