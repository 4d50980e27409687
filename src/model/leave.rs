use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveType {
    Annual,
    MorningHalf,
    AfternoonHalf,
    Sick,
    Event,
    Family,
}

impl LeaveType {
    /// Half-day variants always cost exactly 0.5 day and span one date.
    pub fn is_half_day(&self) -> bool {
        matches!(self, LeaveType::MorningHalf | LeaveType::AfternoonHalf)
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: String,
    pub user_id: String,
    /// Copied from the user record at creation, never refreshed.
    pub user_name: String,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    /// 0.5-day granularity.
    pub days: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub emergency_contact: String,
    pub status: LeaveStatus,
    /// Creation timestamp (epoch ms); sort key and "seen" comparison key.
    pub request_date: i64,
}
