use crate::auth::auth::AuthUser;
use crate::model::schedule::ScheduleType;
use crate::service::directory::DirectoryService;
use crate::service::schedule::ScheduleService;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateScheduleReq {
    pub title: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    #[schema(example = "2026-05-15", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-05-15", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub color: Option<String>,
}

/// The caller's calendar: public holidays, company events, own personal
/// entries, and their approved leave projected as read-only entries.
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    responses((status = 200, description = "Composed calendar for the caller")),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
pub async fn list(
    auth: AuthUser,
    schedules: web::Data<ScheduleService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(schedules.compose_for(&auth.user_id)?))
}

/// Create a personal or company entry. Company entries require admin;
/// leave entries cannot be created by hand.
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = CreateScheduleReq,
    responses(
        (status = 201, description = "Entry created"),
        (status = 400, description = "Bad range or leave type"),
        (status = 403, description = "Company entries require admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
pub async fn create(
    auth: AuthUser,
    schedules: web::Data<ScheduleService>,
    directory: web::Data<DirectoryService>,
    payload: web::Json<CreateScheduleReq>,
) -> actix_web::Result<impl Responder> {
    let body = payload.into_inner();
    if body.schedule_type == ScheduleType::Company {
        auth.require_admin()?;
    }
    let owner = directory.find(&auth.user_id)?;
    let created = schedules.create(
        &owner,
        body.title,
        body.schedule_type,
        body.start_date,
        body.end_date,
        body.is_all_day,
        body.color,
    )?;
    Ok(HttpResponse::Created().json(created))
}

/// Delete a stored entry, owner or admin only (synthetic holiday/leave
/// entries have no stored id)
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{schedule_id}",
    params(("schedule_id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such entry")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedules"
)]
pub async fn delete(
    auth: AuthUser,
    schedules: web::Data<ScheduleService>,
    directory: web::Data<DirectoryService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let actor = directory.find(&auth.user_id)?;
    schedules.delete(&path.into_inner(), &actor)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted" })))
}
