use crate::auth::auth::AuthUser;
use crate::model::post::PostType;
use crate::service::board::BoardService;
use crate::service::directory::DirectoryService;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreatePostReq {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateCommentReq {
    pub content: String,
}

/// All posts, notices pinned first
#[utoipa::path(
    get,
    path = "/api/v1/board/posts",
    responses((status = 200, description = "Posts, notices first")),
    security(("bearer_auth" = [])),
    tag = "Board"
)]
pub async fn list_posts(
    _auth: AuthUser,
    board: web::Data<BoardService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(board.list_posts()?))
}

/// Write a post. Notices require admin.
#[utoipa::path(
    post,
    path = "/api/v1/board/posts",
    request_body = CreatePostReq,
    responses(
        (status = 201, description = "Post created"),
        (status = 403, description = "Only admins post notices")
    ),
    security(("bearer_auth" = [])),
    tag = "Board"
)]
pub async fn create_post(
    auth: AuthUser,
    board: web::Data<BoardService>,
    directory: web::Data<DirectoryService>,
    payload: web::Json<CreatePostReq>,
) -> actix_web::Result<impl Responder> {
    let body = payload.into_inner();
    if body.post_type == PostType::Notice {
        auth.require_admin()?;
    }
    let author = directory.find(&auth.user_id)?;
    let created = board.create_post(&author, body.title, body.content, body.post_type)?;
    Ok(HttpResponse::Created().json(created))
}

/// Comment on a post
#[utoipa::path(
    post,
    path = "/api/v1/board/posts/{post_id}/comments",
    params(("post_id" = String, Path, description = "Post id")),
    request_body = CreateCommentReq,
    responses(
        (status = 201, description = "Comment added"),
        (status = 404, description = "No such post")
    ),
    security(("bearer_auth" = [])),
    tag = "Board"
)]
pub async fn add_comment(
    auth: AuthUser,
    board: web::Data<BoardService>,
    directory: web::Data<DirectoryService>,
    path: web::Path<String>,
    payload: web::Json<CreateCommentReq>,
) -> actix_web::Result<impl Responder> {
    let author = directory.find(&auth.user_id)?;
    let comment = board.add_comment(&path.into_inner(), &author, payload.into_inner().content)?;
    Ok(HttpResponse::Created().json(comment))
}

/// Bump a post's like counter
#[utoipa::path(
    post,
    path = "/api/v1/board/posts/{post_id}/likes",
    params(("post_id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Updated post"),
        (status = 404, description = "No such post")
    ),
    security(("bearer_auth" = [])),
    tag = "Board"
)]
pub async fn like_post(
    _auth: AuthUser,
    board: web::Data<BoardService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(board.like_post(&path.into_inner())?))
}
