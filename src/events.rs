//! Normalized inbound updates and the offset-driven fetch loop half.

use tracing::debug;

use crate::error::OpError;
use crate::telegram::FetchUpdates;

/// One raw update as the transport reports it, already stripped down to
/// the fields this bot consumes.
#[derive(Debug, Clone)]
pub struct Update {
    pub id: i64,
    /// `None` for anything that is not a plain text message.
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub text: String,
    pub chat_id: i64,
    pub user_name: String,
}

/// A normalized inbound message, ready for dispatch.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub text: String,
    pub chat_id: i64,
    pub user_name: String,
}

/// Classifies one update; message-less updates carry no event.
pub fn translate(update: Update) -> Option<MessageEvent> {
    match update.message {
        Some(message) => Some(MessageEvent {
            text: message.text,
            chat_id: message.chat_id,
            user_name: message.user_name,
        }),
        None => {
            debug!("dropping update {}: no message payload", update.id);
            None
        }
    }
}

/// Polls the transport and owns the exclusive lower-bound offset.
pub struct Fetcher<C> {
    client: C,
    offset: i64,
    limit: u8,
}

impl<C: FetchUpdates> Fetcher<C> {
    pub fn new(client: C, limit: u8) -> Self {
        Self {
            client,
            offset: 0,
            limit,
        }
    }

    /// One poll round: fetch everything past the offset, advance it to
    /// `max(id) + 1`, and hand back the translated events in arrival order.
    /// An empty batch leaves the offset untouched.
    pub async fn fetch(&mut self) -> Result<Vec<MessageEvent>, OpError> {
        let updates = self.client.fetch_updates(self.offset, self.limit).await?;
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(max_id) = updates.iter().map(|u| u.id).max() {
            self.offset = max_id + 1;
        }

        Ok(updates.into_iter().filter_map(translate).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn message_update(id: i64, chat_id: i64, text: &str) -> Update {
        Update {
            id,
            message: Some(IncomingMessage {
                text: text.to_owned(),
                chat_id,
                user_name: "tester".to_owned(),
            }),
        }
    }

    fn blank_update(id: i64) -> Update {
        Update { id, message: None }
    }

    /// Hands out scripted batches and records every requested offset.
    struct ScriptedClient {
        batches: Mutex<Vec<Vec<Update>>>,
        seen_offsets: Mutex<Vec<i64>>,
    }

    impl ScriptedClient {
        fn new(batches: Vec<Vec<Update>>) -> Self {
            Self {
                batches: Mutex::new(batches),
                seen_offsets: Mutex::new(Vec::new()),
            }
        }

        fn offsets(&self) -> Vec<i64> {
            self.seen_offsets.lock().unwrap().clone()
        }
    }

    impl FetchUpdates for &ScriptedClient {
        async fn fetch_updates(&self, offset: i64, _limit: u8) -> Result<Vec<Update>, OpError> {
            self.seen_offsets.lock().unwrap().push(offset);
            let mut batches = self.batches.lock().unwrap();
            if batches.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(batches.remove(0))
            }
        }
    }

    #[tokio::test]
    async fn offset_advances_past_the_highest_seen_id() {
        let client = ScriptedClient::new(vec![
            vec![
                message_update(5, 1, "one"),
                message_update(6, 1, "two"),
                message_update(7, 1, "three"),
            ],
            vec![],
        ]);
        let mut fetcher = Fetcher::new(&client, 100);

        let events = fetcher.fetch().await.unwrap();
        assert_eq!(events.len(), 3);

        fetcher.fetch().await.unwrap();
        assert_eq!(client.offsets(), vec![0, 8]);
    }

    #[tokio::test]
    async fn empty_batches_leave_the_offset_alone() {
        let client = ScriptedClient::new(vec![vec![], vec![message_update(3, 1, "hi")], vec![]]);
        let mut fetcher = Fetcher::new(&client, 100);

        fetcher.fetch().await.unwrap();
        fetcher.fetch().await.unwrap();
        fetcher.fetch().await.unwrap();
        assert_eq!(client.offsets(), vec![0, 0, 4]);
    }

    #[tokio::test]
    async fn message_less_updates_advance_the_offset_but_emit_nothing() {
        let client = ScriptedClient::new(vec![
            vec![blank_update(10), message_update(11, 2, "hello")],
            vec![],
        ]);
        let mut fetcher = Fetcher::new(&client, 100);

        let events = fetcher.fetch().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text, "hello");
        assert_eq!(events[0].chat_id, 2);

        fetcher.fetch().await.unwrap();
        assert_eq!(client.offsets(), vec![0, 12]);
    }
}
