use crate::auth::auth::AuthUser;
use crate::service::directory::DirectoryService;
use crate::service::message::MessageService;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SendMessageReq {
    pub receiver_id: String,
    pub content: String,
}

/// Messages sent or received by the caller, newest first
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    responses((status = 200, description = "The caller's messages")),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn list(
    auth: AuthUser,
    messages: web::Data<MessageService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(messages.list_for(&auth.user_id)?))
}

/// Send a message to another user
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageReq,
    responses(
        (status = 201, description = "Message sent"),
        (status = 404, description = "Receiver not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn send(
    auth: AuthUser,
    messages: web::Data<MessageService>,
    directory: web::Data<DirectoryService>,
    payload: web::Json<SendMessageReq>,
) -> actix_web::Result<impl Responder> {
    let sender = directory.find(&auth.user_id)?;
    let body = payload.into_inner();
    let sent = messages.send(&sender, &body.receiver_id, body.content)?;
    Ok(HttpResponse::Created().json(sent))
}

/// Mark a message read (receiver only)
#[utoipa::path(
    put,
    path = "/api/v1/messages/{message_id}/read",
    params(("message_id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 403, description = "Not the receiver"),
        (status = 404, description = "No such message")
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn mark_read(
    auth: AuthUser,
    messages: web::Data<MessageService>,
    directory: web::Data<DirectoryService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let actor = directory.find(&auth.user_id)?;
    messages.mark_read(&path.into_inner(), &actor)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Marked read" })))
}

/// Delete a message (sender or receiver)
#[utoipa::path(
    delete,
    path = "/api/v1/messages/{message_id}",
    params(("message_id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "No such message")
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn delete(
    auth: AuthUser,
    messages: web::Data<MessageService>,
    directory: web::Data<DirectoryService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let actor = directory.find(&auth.user_id)?;
    messages.delete(&path.into_inner(), &actor)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted" })))
}
