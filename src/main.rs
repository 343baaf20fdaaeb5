pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod ru;
pub mod service;
pub mod transport;

use std::{io, sync::Arc};

use actix_web::{web, App, HttpServer};
use log::{error, info};
use tokio_util::sync::CancellationToken;

use config::Config;
use db::JsonStore;
use handlers::{webhook::WebhookSecret, BotContext};
use service::{auth::AdminRoster, log::LoggerMiddleware, session::SessionStore};
use transport::telegram::TelegramClient;

fn startup_error(what: &str, err: errors::MyError) -> io::Error {
    error!("[{:} : {:}] {} failed: {:?}", file!(), line!(), what, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", what, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    service::log::init_logger();
    let config = Config::from_env().map_err(|err| startup_error("configuration", err))?;

    let store = Arc::new(JsonStore::open(config.data_file.clone()).await);
    let sessions = Arc::new(SessionStore::new(config.dialogue_ttl));
    let client = Arc::new(
        TelegramClient::new(&config.telegram_api_url, &config.token)
            .map_err(|err| startup_error("telegram client", err))?,
    );
    let ctx = BotContext {
        store: store.clone(),
        sessions: sessions.clone(),
        messenger: client.clone(),
        authorizer: Arc::new(AdminRoster::new(store.clone(), config.admin_ids.clone())),
    };

    let shutdown = CancellationToken::new();
    actix_rt::spawn(service::scheduler::run(
        store.clone(),
        client.clone(),
        sessions,
        config.reminder_interval,
        shutdown.clone(),
    ));

    let secret = match config.webhook() {
        Some((url, secret)) => {
            client
                .set_webhook(url, secret)
                .await
                .map_err(|err| startup_error("setWebhook", err))?;
            info!("webhook registered at {}", url);
            Some(secret.to_string())
        }
        None => {
            if let Err(err) = client.delete_webhook().await {
                error!("[{:} : {:}] deleteWebhook failed: {:?}", file!(), line!(), err);
            }
            actix_rt::spawn(handlers::webhook::run_polling(ctx.clone(), client.clone(), shutdown.clone()));
            None
        }
    };

    info!("listening on {}:{}", config.bind_addr, config.port);
    let ctx_data = web::Data::new(ctx);
    let secret_data = web::Data::new(WebhookSecret(secret));
    let res = HttpServer::new(move || {
        App::new()
            .wrap(LoggerMiddleware)
            .app_data(ctx_data.clone())
            .app_data(secret_data.clone())
            .configure(handlers::webhook::init_routes)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await;

    shutdown.cancel();
    if let Err(err) = store.save().await {
        error!("[{:} : {:}] final save failed: {:?}", file!(), line!(), err);
    }
    info!("bot stopped");
    res
}
