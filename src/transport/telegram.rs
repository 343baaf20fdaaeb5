use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::multipart::{Form, Part};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use super::{Document, Incoming, InlineKeyboard, Messenger};
use crate::errors::MyError;

/// Seconds Telegram holds a `getUpdates` call open.
pub const POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl Update {
    /// Only text messages and callback queries with data are of interest.
    pub fn into_incoming(self) -> Option<Incoming> {
        if let Some(query) = self.callback_query {
            let message = query.message?;
            return Some(Incoming::Callback {
                id: query.id,
                chat_id: message.chat.id,
                user_id: query.from.id,
                message_id: message.message_id,
                data: query.data?,
            });
        }
        let message = self.message?;
        Some(Incoming::Text {
            chat_id: message.chat.id,
            user_id: message.from.map(|u| u.id).unwrap_or(message.chat.id),
            text: message.text?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, MyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 15))
            .build()
            .map_err(|err| {
                error!("[{:} : {:}] HTTP CLIENT ERROR: {:?}", file!(), line!(), err);
                MyError::ConfigError
            })?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn unpack<T: DeserializeOwned>(method: &str, res: reqwest::Result<reqwest::Response>) -> Result<T, MyError> {
        let response = match res {
            Ok(response) => response,
            Err(err) => {
                warn!("telegram {} request failed: {}", method, err.without_url());
                return Err(MyError::TransportError);
            }
        };
        match response.json::<ApiResponse<T>>().await {
            Ok(ApiResponse { ok: true, result: Some(result), .. }) => Ok(result),
            Ok(ApiResponse { description, .. }) => {
                warn!("telegram {} rejected: {}", method, description.unwrap_or_default());
                Err(MyError::TransportError)
            }
            Err(err) => {
                warn!("telegram {} returned unreadable body: {}", method, err.without_url());
                Err(MyError::TransportError)
            }
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, payload: serde_json::Value) -> Result<T, MyError> {
        debug!("telegram call {}", method);
        let res = self.client.post(self.url(method)).json(&payload).send().await;
        Self::unpack(method, res).await
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, MyError> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": POLL_TIMEOUT_SECS,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    pub async fn set_webhook(&self, url: &str, secret: &str) -> Result<(), MyError> {
        let _: bool = self
            .call(
                "setWebhook",
                json!({
                    "url": url,
                    "secret_token": secret,
                    "allowed_updates": ["message", "callback_query"],
                }),
            )
            .await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<(), MyError> {
        let _: bool = self.call("deleteWebhook", json!({})).await?;
        Ok(())
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), MyError> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = json!(keyboard);
        }
        let _: serde_json::Value = self.call("sendMessage", payload).await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: i64, document: Document) -> Result<(), MyError> {
        let part = Part::bytes(document.content)
            .file_name(document.file_name)
            .mime_str("text/plain; charset=utf-8")
            .map_err(|_| MyError::InternalError)?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", document.caption)
            .part("document", part);
        let res = self
            .client
            .post(self.url("sendDocument"))
            .multipart(form)
            .send()
            .await;
        let _: serde_json::Value = Self::unpack("sendDocument", res).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), MyError> {
        let _: bool = self
            .call("answerCallbackQuery", json!({ "callback_query_id": callback_id }))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), MyError> {
        let _: bool = self
            .call("deleteMessage", json!({ "chat_id": chat_id, "message_id": message_id }))
            .await?;
        Ok(())
    }
}
