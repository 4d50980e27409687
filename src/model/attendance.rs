use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceType {
    ClockIn,
    ClockOut,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceLog {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub log_type: AttendanceType,
    pub timestamp: i64,
    #[serde(default)]
    pub location: String,
}
