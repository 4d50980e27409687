use crate::auth::auth::AuthUser;
use crate::model::approval::ApprovalStatus;
use crate::service::approval::{ApprovalService, ApprovalView};
use crate::service::directory::DirectoryService;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateApprovalReq {
    pub approver_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub attachment: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideApprovalReq {
    pub status: ApprovalStatus,
}

#[derive(Deserialize)]
pub struct ViewQuery {
    pub view: Option<ApprovalView>,
}

/// Documents where the caller is requester or approver, newest activity
/// first. `?view=inbox|draft|pending|completed` narrows the list.
#[utoipa::path(
    get,
    path = "/api/v1/approvals",
    params(("view" = Option<String>, Query, description = "inbox, draft, pending or completed")),
    responses((status = 200, description = "Approval documents for the caller")),
    security(("bearer_auth" = [])),
    tag = "Approvals"
)]
pub async fn list(
    auth: AuthUser,
    approvals: web::Data<ApprovalService>,
    query: web::Query<ViewQuery>,
) -> actix_web::Result<impl Responder> {
    let mut docs = approvals.list_for(&auth.user_id)?;
    if let Some(view) = query.view {
        docs.retain(|a| ApprovalService::matches_view(a, view, &auth.user_id));
    }
    Ok(HttpResponse::Ok().json(docs))
}

/// Create a document as draft or submit it straight to pending
#[utoipa::path(
    post,
    path = "/api/v1/approvals",
    request_body = CreateApprovalReq,
    responses(
        (status = 201, description = "Document created"),
        (status = 400, description = "New documents start as draft or pending"),
        (status = 404, description = "Approver not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Approvals"
)]
pub async fn create(
    auth: AuthUser,
    approvals: web::Data<ApprovalService>,
    directory: web::Data<DirectoryService>,
    payload: web::Json<CreateApprovalReq>,
) -> actix_web::Result<impl Responder> {
    let requester = directory.find(&auth.user_id)?;
    let body = payload.into_inner();
    let created = approvals.create(
        &requester,
        &body.approver_id,
        body.title,
        body.content,
        body.status,
        body.attachment,
    )?;
    Ok(HttpResponse::Created().json(created))
}

/// Submit a draft for decision (requester only)
#[utoipa::path(
    put,
    path = "/api/v1/approvals/{approval_id}/submit",
    params(("approval_id" = String, Path, description = "Approval document id")),
    responses(
        (status = 200, description = "Now pending"),
        (status = 400, description = "Only drafts can be submitted"),
        (status = 403, description = "Not the requester"),
        (status = 404, description = "No such document")
    ),
    security(("bearer_auth" = [])),
    tag = "Approvals"
)]
pub async fn submit(
    auth: AuthUser,
    approvals: web::Data<ApprovalService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let updated = approvals.submit(&path.into_inner(), &auth.user_id)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Approve or reject a pending document (designated approver only)
#[utoipa::path(
    put,
    path = "/api/v1/approvals/{approval_id}/status",
    params(("approval_id" = String, Path, description = "Approval document id")),
    request_body = DecideApprovalReq,
    responses(
        (status = 200, description = "Decision recorded"),
        (status = 400, description = "Document is not pending"),
        (status = 403, description = "Not the designated approver"),
        (status = 404, description = "No such document")
    ),
    security(("bearer_auth" = [])),
    tag = "Approvals"
)]
pub async fn set_status(
    auth: AuthUser,
    approvals: web::Data<ApprovalService>,
    path: web::Path<String>,
    payload: web::Json<DecideApprovalReq>,
) -> actix_web::Result<impl Responder> {
    let updated = approvals.set_status(&path.into_inner(), &auth.user_id, payload.status)?;
    Ok(HttpResponse::Ok().json(updated))
}
