use crate::error::ServiceError;
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user::User;
use crate::store::{Store, collections, now_ms};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Admin correction payload. Only fields present are applied; a changed
/// `days` moves the owner's balance by the delta regardless of the
/// request's status.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLeave {
    #[serde(rename = "type")]
    pub leave_type: Option<LeaveType>,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    pub days: Option<f64>,
}

/// Request lifecycle plus balance bookkeeping.
///
/// The ledger reserves on request: `days` is deducted from the owner's
/// balance at creation, and refunded only on rejection. Approval itself
/// never moves the balance.
#[derive(Clone)]
pub struct LeaveService {
    store: Store,
}

impl LeaveService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Most recent first, by `request_date`.
    pub fn list_requests(&self) -> Result<Vec<LeaveRequest>, ServiceError> {
        let mut requests: Vec<LeaveRequest> = self.store.load(collections::LEAVE_REQUESTS)?;
        requests.sort_by(|a, b| b.request_date.cmp(&a.request_date));
        Ok(requests)
    }

    pub fn create_request(
        &self,
        user_id: &str,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: String,
        emergency_contact: String,
    ) -> Result<LeaveRequest, ServiceError> {
        let _guard = self.store.guard();

        let mut users: Vec<User> = self.store.load(collections::USERS)?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ServiceError::not_found(format!("user {user_id}")))?;

        // Half-day types cost 0.5 and collapse to a single date, whatever
        // end date the caller supplied.
        let (end_date, days) = if leave_type.is_half_day() {
            (start_date, 0.5)
        } else {
            if end_date < start_date {
                return Err(ServiceError::validation("end_date is before start_date"));
            }
            (end_date, ((end_date - start_date).num_days() + 1) as f64)
        };

        let status = if user.can_approve_leave() {
            LeaveStatus::Approved
        } else {
            LeaveStatus::Pending
        };

        let request = LeaveRequest {
            id: format!("leave_{}", Uuid::new_v4()),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            leave_type,
            start_date,
            end_date,
            days,
            reason,
            emergency_contact,
            status,
            request_date: now_ms(),
        };

        let mut requests: Vec<LeaveRequest> = self.store.load(collections::LEAVE_REQUESTS)?;
        requests.insert(0, request.clone());
        self.store.save(collections::LEAVE_REQUESTS, &requests)?;

        // Reserve on request: deducted now, regardless of status.
        user.leave_balance -= days;
        self.store.save(collections::USERS, &users)?;

        tracing::info!(
            request_id = %request.id,
            user_id,
            days,
            status = %request.status,
            "leave request created"
        );
        Ok(request)
    }

    /// Transition a request to `approved` or `rejected`. Rejection refunds
    /// the reserved days; approval leaves the balance untouched.
    ///
    /// The prior status is deliberately not guarded: approving an already
    /// rejected request succeeds without re-deducting, matching the ledger
    /// this replaces. See DESIGN.md for why this stays as-is.
    pub fn set_status(
        &self,
        request_id: &str,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, ServiceError> {
        if status == LeaveStatus::Pending {
            return Err(ServiceError::validation(
                "status must be approved or rejected",
            ));
        }

        let _guard = self.store.guard();
        let mut requests: Vec<LeaveRequest> = self.store.load(collections::LEAVE_REQUESTS)?;
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| ServiceError::not_found(format!("leave request {request_id}")))?;

        request.status = status;
        let updated = request.clone();
        self.store.save(collections::LEAVE_REQUESTS, &requests)?;

        if status == LeaveStatus::Rejected {
            let mut users: Vec<User> = self.store.load(collections::USERS)?;
            // Owner may have been deleted; history stays, refund is skipped.
            if let Some(user) = users.iter_mut().find(|u| u.id == updated.user_id) {
                user.leave_balance += updated.days;
                self.store.save(collections::USERS, &users)?;
            }
        }

        tracing::info!(request_id, status = %status, "leave request decided");
        Ok(updated)
    }

    pub fn edit_request(
        &self,
        request_id: &str,
        updates: UpdateLeave,
    ) -> Result<LeaveRequest, ServiceError> {
        let _guard = self.store.guard();
        let mut requests: Vec<LeaveRequest> = self.store.load(collections::LEAVE_REQUESTS)?;
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| ServiceError::not_found(format!("leave request {request_id}")))?;

        let old_days = request.days;
        if let Some(t) = updates.leave_type {
            request.leave_type = t;
        }
        if let Some(d) = updates.start_date {
            request.start_date = d;
        }
        if let Some(d) = updates.end_date {
            request.end_date = d;
        }
        if let Some(d) = updates.days {
            request.days = d;
        }
        let updated = request.clone();
        self.store.save(collections::LEAVE_REQUESTS, &requests)?;

        // Balance moves by the delta whatever the current status is;
        // flagged in DESIGN.md as an open product question.
        if updated.days != old_days {
            let mut users: Vec<User> = self.store.load(collections::USERS)?;
            if let Some(user) = users.iter_mut().find(|u| u.id == updated.user_id) {
                user.leave_balance += old_days - updated.days;
                self.store.save(collections::USERS, &users)?;
            }
        }

        Ok(updated)
    }

    /// Pure projection, independent of the stored `leave_balance`: replay
    /// all non-rejected requests in ascending start-date order and record
    /// the balance after each one, keyed by request id. The stored balance
    /// and this projection can legitimately disagree.
    pub fn running_balances(&self) -> Result<HashMap<String, f64>, ServiceError> {
        let users: Vec<User> = self.store.load(collections::USERS)?;
        let mut balances: HashMap<String, f64> = users
            .iter()
            .map(|u| (u.id.clone(), u.total_leave))
            .collect();

        let mut requests: Vec<LeaveRequest> = self.store.load(collections::LEAVE_REQUESTS)?;
        requests.sort_by(|a, b| a.start_date.cmp(&b.start_date));

        let mut per_request = HashMap::new();
        for request in &requests {
            if request.status == LeaveStatus::Rejected {
                continue;
            }
            if let Some(balance) = balances.get_mut(&request.user_id) {
                *balance -= request.days;
                per_request.insert(request.id.clone(), *balance);
            }
        }
        Ok(per_request)
    }

    /// Per-user usage over approved requests, with a month-by-month
    /// breakdown for the yearly table.
    pub fn leave_summary(&self) -> Result<Vec<UserLeaveSummary>, ServiceError> {
        let users: Vec<User> = self.store.load(collections::USERS)?;
        let requests: Vec<LeaveRequest> = self.store.load(collections::LEAVE_REQUESTS)?;

        let summaries = users
            .iter()
            .map(|user| {
                let mut mine: Vec<&LeaveRequest> = requests
                    .iter()
                    .filter(|r| r.user_id == user.id && r.status == LeaveStatus::Approved)
                    .collect();
                mine.sort_by(|a, b| a.start_date.cmp(&b.start_date));

                let used: f64 = mine.iter().map(|r| r.days).sum();
                let mut monthly: Vec<MonthUsage> = (1..=12)
                    .map(|month| MonthUsage {
                        month,
                        days: 0.0,
                        details: Vec::new(),
                    })
                    .collect();
                for request in &mine {
                    let slot = &mut monthly[(request.start_date.month() - 1) as usize];
                    slot.days += request.days;
                    slot.details
                        .push(format!("{}({})", request.start_date.day(), request.days));
                }

                UserLeaveSummary {
                    user_id: user.id.clone(),
                    user_name: user.name.clone(),
                    total_leave: user.total_leave,
                    used,
                    remaining: user.total_leave - used,
                    monthly,
                }
            })
            .collect();
        Ok(summaries)
    }
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct MonthUsage {
    pub month: u32,
    pub days: f64,
    /// "day(days)" entries, e.g. "10(0.5)".
    pub details: Vec<String>,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct UserLeaveSummary {
    pub user_id: String,
    pub user_name: String,
    pub total_leave: f64,
    pub used: f64,
    pub remaining: f64,
    pub monthly: Vec<MonthUsage>,
}
