use crate::auth::auth::AuthUser;
use crate::model::user::User;
use crate::service::directory::DirectoryService;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SetPassword {
    pub password: String,
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All user records", body = [User]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    _auth: AuthUser,
    directory: web::Data<DirectoryService>,
) -> actix_web::Result<impl Responder> {
    let users = directory.list_users()?;
    Ok(HttpResponse::Ok().json(users))
}

/// Create a user (admin)
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = User,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "User id already exists"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_user(
    auth: AuthUser,
    directory: web::Data<DirectoryService>,
    payload: web::Json<User>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user = payload.into_inner();
    if user.id.trim().is_empty() || user.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "id and name must not be empty"
        })));
    }

    let created = directory.create_user(user)?;
    Ok(HttpResponse::Created().json(created))
}

/// Delete a user (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "User not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    auth: AuthUser,
    directory: web::Data<DirectoryService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    directory.delete_user(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Successfully deleted" })))
}

/// Change one user's password (self or admin)
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/password",
    params(("user_id" = String, Path, description = "User id")),
    request_body = SetPassword,
    responses(
        (status = 200, description = "Password changed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn set_password(
    auth: AuthUser,
    directory: web::Data<DirectoryService>,
    path: web::Path<String>,
    payload: web::Json<SetPassword>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    if auth.user_id != user_id {
        auth.require_admin()?;
    }
    directory.set_password(&user_id, &payload.password)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password changed" })))
}

/// Reset every user's password to the same value (admin)
#[utoipa::path(
    put,
    path = "/api/v1/users/password/bulk",
    request_body = SetPassword,
    responses(
        (status = 200, description = "All passwords reset"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn bulk_set_password(
    auth: AuthUser,
    directory: web::Data<DirectoryService>,
    payload: web::Json<SetPassword>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    directory.bulk_set_password(&payload.password)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "All passwords reset" })))
}
