//! Messaging port traits and their teloxide-backed implementation.

use teloxide::payloads::GetUpdatesSetters;
use teloxide::prelude::Requester;
use teloxide::types::{ChatId, UpdateKind};
use teloxide::Bot;

use crate::error::OpError;
use crate::events::{IncomingMessage, Update};

/// Polling half of the messaging port.
#[allow(async_fn_in_trait)]
pub trait FetchUpdates {
    async fn fetch_updates(&self, offset: i64, limit: u8) -> Result<Vec<Update>, OpError>;
}

/// Sending half of the messaging port.
#[allow(async_fn_in_trait)]
pub trait SendMessage {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), OpError>;
}

/// The production client: a thin shell around `teloxide::Bot`.
#[derive(Clone)]
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl FetchUpdates for TelegramClient {
    async fn fetch_updates(&self, offset: i64, limit: u8) -> Result<Vec<Update>, OpError> {
        let updates = self
            .bot
            .get_updates()
            .offset(offset as i32)
            .limit(limit)
            .await
            .map_err(|e| OpError::wrap("get updates", e))?;

        Ok(updates.into_iter().map(into_update).collect())
    }
}

impl SendMessage for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), OpError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| OpError::wrap("send message", e))?;
        Ok(())
    }
}

// Only plain text messages become events; edits, media, callback queries
// and the rest come through with no payload and are dropped downstream.
fn into_update(update: teloxide::types::Update) -> Update {
    let id = i64::from(update.id.0);
    let message = match &update.kind {
        UpdateKind::Message(msg) => msg.text().map(|text| IncomingMessage {
            text: text.to_owned(),
            chat_id: msg.chat.id.0,
            user_name: msg
                .from()
                .and_then(|user| user.username.clone())
                .unwrap_or_default(),
        }),
        _ => None,
    };

    Update { id, message }
}
