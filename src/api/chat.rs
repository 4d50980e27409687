use crate::auth::auth::AuthUser;
use crate::service::chat::ChatService;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct StartRoomReq {
    pub other_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SendChatReq {
    pub content: String,
}

/// The caller's rooms, most recent activity first
#[utoipa::path(
    get,
    path = "/api/v1/chat/rooms",
    responses((status = 200, description = "Chat rooms for the caller")),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn rooms(
    auth: AuthUser,
    chat: web::Data<ChatService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(chat.rooms_for(&auth.user_id)?))
}

/// Open a two-party room, reusing an existing one
#[utoipa::path(
    post,
    path = "/api/v1/chat/rooms",
    request_body = StartRoomReq,
    responses((status = 200, description = "Room, new or existing")),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn start(
    auth: AuthUser,
    chat: web::Data<ChatService>,
    payload: web::Json<StartRoomReq>,
) -> actix_web::Result<impl Responder> {
    let room = chat.start(&auth.user_id, &payload.other_id)?;
    Ok(HttpResponse::Ok().json(room))
}

/// Messages in a room, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/chat/rooms/{room_id}/messages",
    params(("room_id" = String, Path, description = "Chat room id")),
    responses(
        (status = 200, description = "Messages in chronological order"),
        (status = 404, description = "No such room")
    ),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn messages(
    _auth: AuthUser,
    chat: web::Data<ChatService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(chat.messages(&path.into_inner())?))
}

/// Post a message into a room
#[utoipa::path(
    post,
    path = "/api/v1/chat/rooms/{room_id}/messages",
    params(("room_id" = String, Path, description = "Chat room id")),
    request_body = SendChatReq,
    responses(
        (status = 201, description = "Message posted"),
        (status = 404, description = "No such room")
    ),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn send(
    auth: AuthUser,
    chat: web::Data<ChatService>,
    path: web::Path<String>,
    payload: web::Json<SendChatReq>,
) -> actix_web::Result<impl Responder> {
    let message = chat.send(
        &path.into_inner(),
        &auth.user_id,
        payload.into_inner().content,
    )?;
    Ok(HttpResponse::Created().json(message))
}
