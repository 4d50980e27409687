use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScheduleType {
    Personal,
    Company,
    /// Never stored; projected from approved leave requests at query time.
    Leave,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Schedule {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    #[schema(example = "2026-05-15", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-05-15", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    pub is_all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
