use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod docs;
mod error;
mod holidays;
mod model;
mod models;
mod routes;
mod service;
mod store;

use config::Config;
use store::Store;

use crate::docs::ApiDoc;
use crate::service::{
    approval::ApprovalService, attendance::AttendanceService, board::BoardService,
    chat::ChatService, directory::DirectoryService, leave::LeaveService, message::MessageService,
    notify::NotifyService, schedule::ScheduleService,
};
use std::time::Duration;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Hello World!"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = Store::open(&config.data_dir).expect("failed to open data directory");

    let directory = DirectoryService::new(store.clone());
    let leave = LeaveService::new(store.clone());
    let approvals = ApprovalService::new(store.clone());
    let board = BoardService::new(store.clone());
    let messages = MessageService::new(store.clone());
    let schedules = ScheduleService::new(store.clone());
    let attendance = AttendanceService::new(store.clone());
    let chat = ChatService::new(store.clone());
    let notify = NotifyService::new(
        store.clone(),
        Duration::from_secs(config.presence_window_secs),
    );

    // Restore presence from the persisted heartbeat map
    let notify_for_warmup = notify.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = notify_for_warmup.warmup().await {
            eprintln!("Failed to warm up presence cache: {e:?}");
        }
    });

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(store.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(directory.clone()))
            .app_data(Data::new(leave.clone()))
            .app_data(Data::new(approvals.clone()))
            .app_data(Data::new(board.clone()))
            .app_data(Data::new(messages.clone()))
            .app_data(Data::new(schedules.clone()))
            .app_data(Data::new(attendance.clone()))
            .app_data(Data::new(chat.clone()))
            .app_data(Data::new(notify.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
