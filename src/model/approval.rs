use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// `draft -> pending -> {approved, rejected}`; everything but `pending` is
/// terminal.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

/// Generic requester -> approver document. A `draft` belongs to the
/// requester alone and is invisible to the approver's inbox.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Approval {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub approver_id: String,
    pub approver_name: String,
    pub title: String,
    pub content: String,
    pub status: ApprovalStatus,
    /// Filename only; no binary content is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
