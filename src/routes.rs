use crate::{
    api::{approval, attendance, board, chat, leave, message, notify, schedule, users},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/users")
                    .service(
                        web::resource("")
                            .route(web::get().to(users::list_users))
                            .route(web::post().to(users::create_user)),
                    )
                    .service(
                        web::resource("/password/bulk")
                            .route(web::put().to(users::bulk_set_password)),
                    )
                    .service(
                        web::resource("/{user_id}/password")
                            .route(web::put().to(users::set_password)),
                    )
                    .service(
                        web::resource("/{user_id}").route(web::delete().to(users::delete_user)),
                    ),
            )
            .service(
                web::scope("/leave")
                    .service(
                        web::resource("/requests")
                            .route(web::get().to(leave::list_requests))
                            .route(web::post().to(leave::create_request)),
                    )
                    .service(
                        web::resource("/requests/{request_id}/status")
                            .route(web::put().to(leave::set_status)),
                    )
                    .service(
                        web::resource("/requests/{request_id}")
                            .route(web::put().to(leave::edit_request)),
                    )
                    .service(
                        web::resource("/balances").route(web::get().to(leave::running_balances)),
                    )
                    .service(web::resource("/summary").route(web::get().to(leave::leave_summary))),
            )
            .service(
                web::scope("/approvals")
                    .service(
                        web::resource("")
                            .route(web::get().to(approval::list))
                            .route(web::post().to(approval::create)),
                    )
                    .service(
                        web::resource("/{approval_id}/submit")
                            .route(web::put().to(approval::submit)),
                    )
                    .service(
                        web::resource("/{approval_id}/status")
                            .route(web::put().to(approval::set_status)),
                    ),
            )
            .service(
                web::scope("/board")
                    .service(
                        web::resource("/posts")
                            .route(web::get().to(board::list_posts))
                            .route(web::post().to(board::create_post)),
                    )
                    .service(
                        web::resource("/posts/{post_id}/comments")
                            .route(web::post().to(board::add_comment)),
                    )
                    .service(
                        web::resource("/posts/{post_id}/likes")
                            .route(web::post().to(board::like_post)),
                    ),
            )
            .service(
                web::scope("/messages")
                    .service(
                        web::resource("")
                            .route(web::get().to(message::list))
                            .route(web::post().to(message::send)),
                    )
                    .service(
                        web::resource("/{message_id}/read")
                            .route(web::put().to(message::mark_read)),
                    )
                    .service(
                        web::resource("/{message_id}").route(web::delete().to(message::delete)),
                    ),
            )
            .service(
                web::scope("/schedules")
                    .service(
                        web::resource("")
                            .route(web::get().to(schedule::list))
                            .route(web::post().to(schedule::create)),
                    )
                    .service(
                        web::resource("/{schedule_id}").route(web::delete().to(schedule::delete)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(web::resource("").route(web::post().to(attendance::log)))
                    .service(web::resource("/today").route(web::get().to(attendance::today))),
            )
            .service(
                web::scope("/chat")
                    .service(
                        web::resource("/rooms")
                            .route(web::get().to(chat::rooms))
                            .route(web::post().to(chat::start)),
                    )
                    .service(
                        web::resource("/rooms/{room_id}/messages")
                            .route(web::get().to(chat::messages))
                            .route(web::post().to(chat::send)),
                    ),
            )
            .service(
                web::scope("/notify")
                    .service(web::resource("/tick").route(web::get().to(notify::tick)))
                    .service(web::resource("/ack").route(web::post().to(notify::acknowledge)))
                    .service(web::resource("/config").route(web::get().to(notify::poll_config))),
            )
            .service(
                web::scope("/presence")
                    .service(web::resource("").route(web::get().to(notify::presence)))
                    .service(
                        web::resource("/heartbeat").route(web::post().to(notify::heartbeat)),
                    ),
            ),
    );
}
