use crate::auth::auth::AuthUser;
use crate::service::notify::{Category, NotifyService, TickResult};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use std::collections::HashSet;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Deserialize)]
pub struct TickQuery {
    /// Comma-separated categories whose modal is open on the client.
    pub suppressed: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AckReq {
    pub category: Category,
    /// Required for leave, message and approval; ignored for notices.
    pub timestamp: Option<i64>,
}

/// One poll round: unread count, presence, and at most one fresh item per
/// category. `?suppressed=notice,leave` holds back categories whose modal
/// is already open.
#[utoipa::path(
    get,
    path = "/api/v1/notify/tick",
    params(("suppressed" = Option<String>, Query, description = "Comma-separated categories to hold back")),
    responses(
        (status = 200, description = "Poll result", body = TickResult),
        (status = 400, description = "Unknown category name")
    ),
    security(("bearer_auth" = [])),
    tag = "Notify"
)]
pub async fn tick(
    auth: AuthUser,
    notify: web::Data<NotifyService>,
    query: web::Query<TickQuery>,
) -> actix_web::Result<impl Responder> {
    let mut suppressed = HashSet::new();
    if let Some(raw) = query.suppressed.as_deref() {
        for name in raw.split(',').filter(|s| !s.is_empty()) {
            let category = Category::from_str(name.trim())
                .map_err(|_| actix_web::error::ErrorBadRequest("Unknown category"))?;
            suppressed.insert(category);
        }
    }
    let result = notify.tick(&auth.user_id, &suppressed).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Dismiss the current modal for a category, advancing its watermark
#[utoipa::path(
    post,
    path = "/api/v1/notify/ack",
    request_body = AckReq,
    responses(
        (status = 200, description = "Watermark advanced"),
        (status = 400, description = "Missing item timestamp")
    ),
    security(("bearer_auth" = [])),
    tag = "Notify"
)]
pub async fn acknowledge(
    auth: AuthUser,
    notify: web::Data<NotifyService>,
    payload: web::Json<AckReq>,
) -> actix_web::Result<impl Responder> {
    notify.acknowledge(&auth.user_id, payload.category, payload.timestamp)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Acknowledged" })))
}

/// Poll cadence and presence window, for clients scheduling their timers
#[utoipa::path(
    get,
    path = "/api/v1/notify/config",
    responses((status = 200, description = "Polling parameters")),
    security(("bearer_auth" = [])),
    tag = "Notify"
)]
pub async fn poll_config(
    _auth: AuthUser,
    config: web::Data<crate::config::Config>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "poll_period_ms": config.poll_period_secs * 1000,
        "presence_window_ms": config.presence_window_secs * 1000,
    })))
}

/// Record a liveness heartbeat for the caller
#[utoipa::path(
    post,
    path = "/api/v1/presence/heartbeat",
    responses((status = 204, description = "Heartbeat recorded")),
    security(("bearer_auth" = [])),
    tag = "Notify"
)]
pub async fn heartbeat(
    auth: AuthUser,
    notify: web::Data<NotifyService>,
) -> actix_web::Result<impl Responder> {
    notify.heartbeat(&auth.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// User ids with a heartbeat inside the freshness window
#[utoipa::path(
    get,
    path = "/api/v1/presence",
    responses((status = 200, description = "Online user ids")),
    security(("bearer_auth" = [])),
    tag = "Notify"
)]
pub async fn presence(
    _auth: AuthUser,
    notify: web::Data<NotifyService>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(notify.online_users()))
}
