use crate::error::ServiceError;
use crate::model::approval::{Approval, ApprovalStatus};
use crate::model::user::User;
use crate::store::{Store, collections, now_ms};
use serde::Deserialize;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Client-side views over `list_for`; pure predicates, no extra storage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalView {
    /// Awaiting my decision.
    Inbox,
    /// My unsent drafts.
    Draft,
    /// My own documents still pending.
    Pending,
    /// Anything decided that involves me.
    Completed,
}

/// Generic requester -> approver document routing.
#[derive(Clone)]
pub struct ApprovalService {
    store: Store,
}

impl ApprovalService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Documents where the caller is requester or approver, most recently
    /// updated first.
    pub fn list_for(&self, user_id: &str) -> Result<Vec<Approval>, ServiceError> {
        let mut approvals: Vec<Approval> = self.store.load(collections::APPROVALS)?;
        approvals.retain(|a| a.requester_id == user_id || a.approver_id == user_id);
        approvals.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(approvals)
    }

    pub fn matches_view(approval: &Approval, view: ApprovalView, user_id: &str) -> bool {
        match view {
            ApprovalView::Inbox => {
                approval.approver_id == user_id && approval.status == ApprovalStatus::Pending
            }
            ApprovalView::Draft => {
                approval.requester_id == user_id && approval.status == ApprovalStatus::Draft
            }
            ApprovalView::Pending => {
                approval.requester_id == user_id && approval.status == ApprovalStatus::Pending
            }
            ApprovalView::Completed => {
                (approval.requester_id == user_id || approval.approver_id == user_id)
                    && matches!(
                        approval.status,
                        ApprovalStatus::Approved | ApprovalStatus::Rejected
                    )
            }
        }
    }

    /// Create as `draft` (requester-only) or submit straight to `pending`.
    /// Names are denormalized at write time and never refreshed.
    pub fn create(
        &self,
        requester: &User,
        approver_id: &str,
        title: String,
        content: String,
        status: ApprovalStatus,
        attachment: Option<String>,
    ) -> Result<Approval, ServiceError> {
        if !matches!(status, ApprovalStatus::Draft | ApprovalStatus::Pending) {
            return Err(ServiceError::validation(
                "new documents start as draft or pending",
            ));
        }

        let _guard = self.store.guard();
        let users: Vec<User> = self.store.load(collections::USERS)?;
        let approver = users
            .iter()
            .find(|u| u.id == approver_id)
            .ok_or_else(|| ServiceError::not_found(format!("approver {approver_id}")))?;

        let now = now_ms();
        let approval = Approval {
            id: format!("apv_{}", Uuid::new_v4()),
            requester_id: requester.id.clone(),
            requester_name: requester.name.clone(),
            approver_id: approver.id.clone(),
            approver_name: approver.name.clone(),
            title,
            content,
            status,
            attachment,
            created_at: now,
            updated_at: now,
        };

        let mut approvals: Vec<Approval> = self.store.load(collections::APPROVALS)?;
        approvals.insert(0, approval.clone());
        self.store.save(collections::APPROVALS, &approvals)?;

        tracing::info!(approval_id = %approval.id, status = %approval.status, "approval created");
        Ok(approval)
    }

    /// Requester sends a draft on its way.
    pub fn submit(&self, id: &str, actor_id: &str) -> Result<Approval, ServiceError> {
        let _guard = self.store.guard();
        let mut approvals: Vec<Approval> = self.store.load(collections::APPROVALS)?;
        let approval = approvals
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ServiceError::not_found(format!("approval {id}")))?;

        if approval.requester_id != actor_id {
            return Err(ServiceError::forbidden("only the requester may submit"));
        }
        if approval.status != ApprovalStatus::Draft {
            return Err(ServiceError::validation("only drafts can be submitted"));
        }

        approval.status = ApprovalStatus::Pending;
        approval.updated_at = now_ms();
        let updated = approval.clone();
        self.store.save(collections::APPROVALS, &approvals)?;
        Ok(updated)
    }

    /// Decide a pending document. Only the designated approver may call
    /// this, and only while the document is still pending; a second
    /// decision fails loudly rather than silently no-oping.
    pub fn set_status(
        &self,
        id: &str,
        actor_id: &str,
        status: ApprovalStatus,
    ) -> Result<Approval, ServiceError> {
        if !matches!(status, ApprovalStatus::Approved | ApprovalStatus::Rejected) {
            return Err(ServiceError::validation(
                "decision must be approved or rejected",
            ));
        }

        let _guard = self.store.guard();
        let mut approvals: Vec<Approval> = self.store.load(collections::APPROVALS)?;
        let approval = approvals
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ServiceError::not_found(format!("approval {id}")))?;

        if approval.approver_id != actor_id {
            return Err(ServiceError::forbidden(
                "only the designated approver may decide",
            ));
        }
        if approval.status != ApprovalStatus::Pending {
            return Err(ServiceError::validation(
                "only pending documents can be decided",
            ));
        }

        approval.status = status;
        approval.updated_at = now_ms();
        let updated = approval.clone();
        self.store.save(collections::APPROVALS, &approvals)?;

        tracing::info!(approval_id = %id, status = %status, "approval decided");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{seed_users, test_store, user};

    fn setup() -> (tempfile::TempDir, Store, ApprovalService, User, User) {
        let (dir, store) = test_store();
        let requester = user("req", "Requester", 15.0);
        let approver = user("apv", "Approver", 15.0);
        seed_users(&store, &[requester.clone(), approver.clone()]);
        let service = ApprovalService::new(store.clone());
        (dir, store, service, requester, approver)
    }

    #[test]
    fn draft_is_invisible_to_the_approver_inbox() {
        let (_dir, _store, service, requester, _approver) = setup();
        let doc = service
            .create(
                &requester,
                "apv",
                "Expense".into(),
                "body".into(),
                ApprovalStatus::Draft,
                None,
            )
            .unwrap();

        let approver_list = service.list_for("apv").unwrap();
        assert!(
            !approver_list
                .iter()
                .any(|a| ApprovalService::matches_view(a, ApprovalView::Inbox, "apv"))
        );

        // Requester sees it as a draft
        let mine = service.list_for("req").unwrap();
        assert!(
            mine.iter()
                .any(|a| a.id == doc.id
                    && ApprovalService::matches_view(a, ApprovalView::Draft, "req"))
        );
    }

    #[test]
    fn submit_moves_draft_into_the_inbox() {
        let (_dir, _store, service, requester, _approver) = setup();
        let doc = service
            .create(
                &requester,
                "apv",
                "Expense".into(),
                "body".into(),
                ApprovalStatus::Draft,
                None,
            )
            .unwrap();

        service.submit(&doc.id, "req").unwrap();

        let approver_list = service.list_for("apv").unwrap();
        assert!(
            approver_list
                .iter()
                .any(|a| a.id == doc.id
                    && ApprovalService::matches_view(a, ApprovalView::Inbox, "apv"))
        );
        // Gone from the requester's draft view
        let mine = service.list_for("req").unwrap();
        assert!(
            !mine
                .iter()
                .any(|a| ApprovalService::matches_view(a, ApprovalView::Draft, "req"))
        );
    }

    #[test]
    fn only_the_designated_approver_may_decide() {
        let (_dir, _store, service, requester, _approver) = setup();
        let doc = service
            .create(
                &requester,
                "apv",
                "Expense".into(),
                "body".into(),
                ApprovalStatus::Pending,
                None,
            )
            .unwrap();

        let err = service
            .set_status(&doc.id, "req", ApprovalStatus::Approved)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[test]
    fn second_decision_fails_instead_of_no_oping() {
        let (_dir, _store, service, requester, _approver) = setup();
        let doc = service
            .create(
                &requester,
                "apv",
                "Expense".into(),
                "body".into(),
                ApprovalStatus::Pending,
                None,
            )
            .unwrap();

        service
            .set_status(&doc.id, "apv", ApprovalStatus::Approved)
            .unwrap();
        let err = service
            .set_status(&doc.id, "apv", ApprovalStatus::Approved)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn completed_view_covers_both_parties() {
        let (_dir, _store, service, requester, _approver) = setup();
        let doc = service
            .create(
                &requester,
                "apv",
                "Expense".into(),
                "body".into(),
                ApprovalStatus::Pending,
                None,
            )
            .unwrap();
        service
            .set_status(&doc.id, "apv", ApprovalStatus::Rejected)
            .unwrap();

        for id in ["req", "apv"] {
            let list = service.list_for(id).unwrap();
            assert!(
                list.iter()
                    .any(|a| ApprovalService::matches_view(a, ApprovalView::Completed, id))
            );
        }
    }

    #[test]
    fn unknown_approver_is_not_found() {
        let (_dir, _store, service, requester, _approver) = setup();
        let err = service
            .create(
                &requester,
                "ghost",
                "Expense".into(),
                "body".into(),
                ApprovalStatus::Pending,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
