use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    Active,
    Pending,
    Suspended,
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

/// Directory record. Identity plus the leave-entitlement fields the ledger
/// keeps in sync.
///
/// `leave_balance` is stored, not derived on read: every ledger mutation
/// adjusts it eagerly. The intended invariant is
/// `leave_balance = total_leave - sum(days of non-rejected requests)`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    #[schema(example = "2024-01-02", format = "date", value_type = Option<String>)]
    pub join_date: Option<chrono::NaiveDate>,

    /// Annual entitlement in days, may be fractional.
    pub total_leave: f64,
    /// Signed adjustment carried over from the prior year.
    #[serde(default)]
    pub carryover: f64,
    /// Mutable running balance, adjusted on every ledger mutation.
    pub leave_balance: f64,

    /// Explicit permission flag: leave requests by this user auto-approve,
    /// and pending requests are surfaced to this user by the poller.
    #[serde(default)]
    pub leave_approver: bool,

    /// Plain string, compared for equality at login.
    pub password: String,
}

impl User {
    pub fn can_approve_leave(&self) -> bool {
        self.leave_approver || self.role == Role::Admin
    }
}
