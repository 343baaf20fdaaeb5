pub mod telegram;

use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use crate::{
    dto::{Callback, CALLBACK_DATA_LIMIT},
    errors::MyError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

/// Inline keyboard in the Bot API shape, one row per `Vec`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn button(text: &str, callback: &Callback) -> Option<InlineButton> {
        let callback_data = callback.to_string();
        if callback_data.len() > CALLBACK_DATA_LIMIT {
            debug!("dropping button {:?}: callback data {} bytes", text, callback_data.len());
            return None;
        }
        Some(InlineButton {
            text: text.to_string(),
            callback_data,
        })
    }

    /// Adds a single-button row. Buttons with oversized callback data are skipped.
    pub fn row(mut self, text: &str, callback: Callback) -> Self {
        if let Some(button) = Self::button(text, &callback) {
            self.inline_keyboard.push(vec![button]);
        }
        self
    }

    /// Adds one row holding every button that fits; empty rows are not added.
    pub fn row_of(mut self, buttons: Vec<(&str, Callback)>) -> Self {
        let row: Vec<InlineButton> = buttons
            .iter()
            .filter_map(|(text, callback)| Self::button(text, callback))
            .collect();
        if !row.is_empty() {
            self.inline_keyboard.push(row);
        }
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.inline_keyboard.iter().flatten()
    }

    pub fn has_callback(&self, callback: &Callback) -> bool {
        let data = callback.to_string();
        self.buttons().any(|b| b.callback_data == data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub caption: String,
    pub content: Vec<u8>,
}

/// What the bot reacts to, stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Text {
        chat_id: i64,
        user_id: i64,
        text: String,
    },
    Callback {
        id: String,
        chat_id: i64,
        user_id: i64,
        message_id: i64,
        data: String,
    },
}

impl Incoming {
    pub fn chat_id(&self) -> i64 {
        match self {
            Incoming::Text { chat_id, .. } => *chat_id,
            Incoming::Callback { chat_id, .. } => *chat_id,
        }
    }

    pub fn user_id(&self) -> i64 {
        match self {
            Incoming::Text { user_id, .. } => *user_id,
            Incoming::Callback { user_id, .. } => *user_id,
        }
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), MyError>;

    async fn send_document(&self, chat_id: i64, document: Document) -> Result<(), MyError>;

    async fn answer_callback(&self, callback_id: &str) -> Result<(), MyError>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), MyError>;
}

#[cfg(test)]
pub mod testing {
    use std::{collections::HashSet, sync::Mutex};

    use async_trait::async_trait;

    use super::{Document, InlineKeyboard, Messenger};
    use crate::errors::MyError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Sent {
        pub chat_id: i64,
        pub text: String,
        pub keyboard: Option<InlineKeyboard>,
    }

    /// Records everything; chats listed in `unreachable` fail delivery.
    #[derive(Default)]
    pub struct RecordingMessenger {
        pub messages: Mutex<Vec<Sent>>,
        pub documents: Mutex<Vec<(i64, Document)>>,
        pub unreachable: Mutex<HashSet<i64>>,
    }

    impl RecordingMessenger {
        pub fn block(&self, chat_id: i64) {
            self.unreachable.lock().unwrap().insert(chat_id);
        }

        pub fn take(&self) -> Vec<Sent> {
            std::mem::take(&mut *self.messages.lock().unwrap())
        }

        pub fn last(&self) -> Sent {
            self.messages.lock().unwrap().last().cloned().expect("nothing was sent")
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_message(
            &self,
            chat_id: i64,
            text: &str,
            keyboard: Option<&InlineKeyboard>,
        ) -> Result<(), MyError> {
            if self.unreachable.lock().unwrap().contains(&chat_id) {
                return Err(MyError::TransportError);
            }
            self.messages.lock().unwrap().push(Sent {
                chat_id,
                text: text.to_string(),
                keyboard: keyboard.cloned(),
            });
            Ok(())
        }

        async fn send_document(&self, chat_id: i64, document: Document) -> Result<(), MyError> {
            self.documents.lock().unwrap().push((chat_id, document));
            Ok(())
        }

        async fn answer_callback(&self, _callback_id: &str) -> Result<(), MyError> {
            Ok(())
        }

        async fn delete_message(&self, _chat_id: i64, _message_id: i64) -> Result<(), MyError> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_callback_buttons_are_dropped() {
        let long_id = "x".repeat(60);
        let keyboard = InlineKeyboard::new()
            .row("ok", Callback::ReviewEvent("short".into()))
            .row("too long", Callback::ReviewEvent(long_id.clone()))
            .row_of(vec![("a", Callback::ViewEvent(long_id)), ("b", Callback::AdminMenu)]);
        let texts: Vec<&str> = keyboard.buttons().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["ok", "b"]);
        assert_eq!(keyboard.inline_keyboard.len(), 2);
    }

    #[test]
    fn keyboard_serializes_in_bot_api_shape() {
        let keyboard = InlineKeyboard::new().row("Назад", Callback::AdminMenu);
        assert_eq!(
            serde_json::to_value(&keyboard).unwrap(),
            serde_json::json!({"inline_keyboard": [[{"text": "Назад", "callback_data": "admin_back"}]]})
        );
    }
}
