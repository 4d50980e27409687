use crate::auth::auth::AuthUser;
use crate::model::attendance::AttendanceType;
use crate::service::attendance::{AttendanceService, TodayAttendance};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LogAttendanceReq {
    #[serde(rename = "type")]
    pub log_type: AttendanceType,
}

/// Record a clock-in or clock-out for the caller
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = LogAttendanceReq,
    responses((status = 201, description = "Entry recorded")),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn log(
    auth: AuthUser,
    attendance: web::Data<AttendanceService>,
    payload: web::Json<LogAttendanceReq>,
) -> actix_web::Result<impl Responder> {
    let entry = attendance.log(&auth.user_id, payload.log_type)?;
    Ok(HttpResponse::Created().json(entry))
}

/// Today's first clock-in and last clock-out for the caller
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses((status = 200, description = "Today's attendance", body = TodayAttendance)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    attendance: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(attendance.today(&auth.user_id)?))
}
