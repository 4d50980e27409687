use crate::auth::auth::AuthUser;
use crate::model::leave::{LeaveStatus, LeaveType};
use crate::service::leave::{LeaveService, UpdateLeave};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveReq {
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub emergency_contact: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideLeaveReq {
    pub status: LeaveStatus,
}

/// List every leave request, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/leave/requests",
    responses((status = 200, description = "All leave requests")),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_requests(
    _auth: AuthUser,
    leave: web::Data<LeaveService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(leave.list_requests()?))
}

/// File a leave request. The requester's balance is deducted immediately;
/// designated approvers are auto-approved.
#[utoipa::path(
    post,
    path = "/api/v1/leave/requests",
    request_body = CreateLeaveReq,
    responses(
        (status = 201, description = "Request filed"),
        (status = 400, description = "Bad date range")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_request(
    auth: AuthUser,
    leave: web::Data<LeaveService>,
    payload: web::Json<CreateLeaveReq>,
) -> actix_web::Result<impl Responder> {
    let body = payload.into_inner();
    let created = leave.create_request(
        &auth.user_id,
        body.leave_type,
        body.start_date,
        body.end_date,
        body.reason,
        body.emergency_contact,
    )?;
    Ok(HttpResponse::Created().json(created))
}

/// Approve or reject a request (leave approvers only)
#[utoipa::path(
    put,
    path = "/api/v1/leave/requests/{request_id}/status",
    params(("request_id" = String, Path, description = "Leave request id")),
    request_body = DecideLeaveReq,
    responses(
        (status = 200, description = "Decision recorded"),
        (status = 400, description = "Status must be approved or rejected"),
        (status = 403, description = "Not a leave approver"),
        (status = 404, description = "No such request")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn set_status(
    auth: AuthUser,
    leave: web::Data<LeaveService>,
    path: web::Path<String>,
    payload: web::Json<DecideLeaveReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_leave_approver()?;
    let updated = leave.set_status(&path.into_inner(), payload.status)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Edit a request in place; the owner's balance absorbs any day-count delta
#[utoipa::path(
    put,
    path = "/api/v1/leave/requests/{request_id}",
    params(("request_id" = String, Path, description = "Leave request id")),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Request updated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such request")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn edit_request(
    auth: AuthUser,
    leave: web::Data<LeaveService>,
    path: web::Path<String>,
    payload: web::Json<UpdateLeave>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();
    if !auth.is_admin() {
        let owned = leave
            .list_requests()?
            .iter()
            .any(|r| r.id == request_id && r.user_id == auth.user_id);
        if !owned {
            return Err(actix_web::error::ErrorForbidden("Not your request"));
        }
    }
    let updated = leave.edit_request(&request_id, payload.into_inner())?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Remaining balance per request id, replayed over the non-rejected history
#[utoipa::path(
    get,
    path = "/api/v1/leave/balances",
    responses((status = 200, description = "Request id to remaining-days map")),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn running_balances(
    _auth: AuthUser,
    leave: web::Data<LeaveService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(leave.running_balances()?))
}

/// Per-user usage summary with a monthly breakdown (approved requests only)
#[utoipa::path(
    get,
    path = "/api/v1/leave/summary",
    responses((status = 200, description = "Usage summary per user")),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_summary(
    _auth: AuthUser,
    leave: web::Data<LeaveService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(leave.leave_summary()?))
}
