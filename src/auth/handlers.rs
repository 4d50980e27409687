use crate::{
    auth::jwt::{generate_access_token, generate_refresh_token, verify_token},
    config::Config,
    model::user::User,
    models::{Claims, LoginReqDto, RefreshTokenRecord, TokenType},
    service::{directory::DirectoryService, notify::NotifyService},
    store::{Store, collections},
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, instrument};

#[derive(Serialize, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    user: User,
}

fn store_refresh_token(store: &Store, claims: &Claims) -> Result<(), crate::error::ServiceError> {
    let _guard = store.guard();
    let mut records: Vec<RefreshTokenRecord> = store.load(collections::REFRESH_TOKENS)?;
    records.push(RefreshTokenRecord {
        user_id: claims.user_id.clone(),
        jti: claims.jti.clone(),
        expires_at: claims.exp as i64,
        revoked: false,
    });
    store.save(collections::REFRESH_TOKENS, &records)
}

fn revoke_refresh_token(store: &Store, jti: &str) -> Result<bool, crate::error::ServiceError> {
    let _guard = store.guard();
    let mut records: Vec<RefreshTokenRecord> = store.load(collections::REFRESH_TOKENS)?;
    let Some(record) = records.iter_mut().find(|r| r.jti == jti && !r.revoked) else {
        return Ok(false);
    };
    record.revoked = true;
    store.save(collections::REFRESH_TOKENS, &records)?;
    Ok(true)
}

/// Login by user id or email. The password is compared as a plain string,
/// faithfully to the system this replaces; see DESIGN.md.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in; returns tokens and the user record"),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(directory, notify, store, config, payload))]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    directory: web::Data<DirectoryService>,
    notify: web::Data<NotifyService>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if payload.user_id.is_none() && payload.email.is_none() {
        info!("Validation failed: no user id or email");
        return HttpResponse::BadRequest().body("user_id or email required");
    }

    let user = match directory.authenticate(
        payload.user_id.as_deref(),
        payload.email.as_deref(),
        &payload.password,
    ) {
        Ok(user) => user,
        Err(crate::error::ServiceError::Forbidden(_)) => {
            info!("Invalid credentials");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Storage error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    debug!(user_id = %user.id, "Generating tokens");
    let access_token = generate_access_token(&user, &config.jwt_secret, config.access_token_ttl);
    let (refresh_token, refresh_claims) =
        generate_refresh_token(&user, &config.jwt_secret, config.refresh_token_ttl);

    if let Err(e) = store_refresh_token(&store, &refresh_claims) {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // Immediate heartbeat so the user shows up online right away
    if let Err(e) = notify.heartbeat(&user.id).await {
        error!(error = %e, "Failed to write login heartbeat");
        // intentionally not failing login
    }

    info!(user_id = %user.id, "Login successful");
    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        user,
    })
}

/// Rotate a refresh token: revoke the presented one, issue a new pair.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New token pair"),
        (status = 401, description = "Missing, invalid or revoked refresh token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh_token(
    req: HttpRequest,
    directory: web::Data<DirectoryService>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    match revoke_refresh_token(&store, &claims.jti) {
        Ok(true) => {}
        Ok(false) => return HttpResponse::Unauthorized().finish(),
        Err(e) => {
            error!(error = %e, "Failed to revoke refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    }

    // Re-read the user so rotated tokens pick up role/permission changes
    let user = match directory.find(&claims.user_id) {
        Ok(u) => u,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    let (new_refresh_token, new_claims) =
        generate_refresh_token(&user, &config.jwt_secret, config.refresh_token_ttl);
    if let Err(e) = store_refresh_token(&store, &new_claims) {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    let access_token = generate_access_token(&user, &config.jwt_secret, config.access_token_ttl);

    HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "refresh_token": new_refresh_token
    }))
}

/// Revoke the refresh token and drop the presence heartbeat. Succeeds
/// (204) even when the token is already gone.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    notify: web::Data<NotifyService>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    // Idempotent revoke
    let _ = revoke_refresh_token(&store, &claims.jti);
    let _ = notify.logout(&claims.user_id).await;

    HttpResponse::NoContent().finish()
}
