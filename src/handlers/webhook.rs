use std::{sync::Arc, time::Duration};

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use super::{dispatch, BotContext};
use crate::{
    errors::MyError,
    transport::telegram::{TelegramClient, Update},
};

pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Secret Telegram echoes back on every webhook call. `None` disables the endpoint.
#[derive(Debug, Clone)]
pub struct WebhookSecret(pub Option<String>);

#[post("/webhook")]
pub async fn receive(
    req: HttpRequest,
    update: web::Json<Update>,
    secret: web::Data<WebhookSecret>,
    ctx: web::Data<BotContext>,
) -> impl Responder {
    let expected = match &secret.0 {
        Some(expected) => expected,
        None => return HttpResponse::NotFound().finish(),
    };
    let given = req
        .headers()
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if given != Some(expected.as_str()) {
        warn!("webhook call with a wrong secret from {:?}", req.peer_addr());
        return HttpResponse::from_error(MyError::Unauthorized);
    }
    let update = update.into_inner();
    let update_id = update.update_id;
    match update.into_incoming() {
        Some(incoming) => dispatch(ctx.get_ref(), incoming).await,
        None => debug!("update {} ignored", update_id),
    }
    HttpResponse::Ok().finish()
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(receive)
        .service(health);
}

/// Long polling loop used when no webhook is configured.
pub async fn run_polling(ctx: BotContext, client: Arc<TelegramClient>, shutdown: CancellationToken) {
    let mut offset = 0;
    info!("long polling started");
    loop {
        let res = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("long polling stopped");
                return;
            }
            res = client.get_updates(offset) => res,
        };
        match res {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Some(incoming) = update.into_incoming() {
                        dispatch(&ctx, incoming).await;
                    }
                }
            }
            Err(err) => {
                error!("[{:} : {:}] POLLING ERROR: {:?}", file!(), line!(), err);
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                }
            }
        }
    }
}
