//! The conversation state machine: one inbound message in, the replies of
//! whichever dialogue owns it out.

use tracing::{info, instrument};

use crate::database::item::Item;
use crate::database::ItemStore;
use crate::events::MessageEvent;
use crate::flashcard;
use crate::state::{ChatMode, ConversationStore};
use crate::telegram::SendMessage;
use crate::HandlerResult;

pub const SAVE_CMD: &str = "/save";
pub const GET_CMD: &str = "/get";
pub const HELP_CMD: &str = "/help";
pub const START_CMD: &str = "/start";
pub const LIST_CMD: &str = "/list";
pub const DELETE_CMD: &str = "/delete";
pub const NEXT_CMD: &str = "/next";

pub const MSG_HELP: &str = "I can save flashcard decks and quiz you on them:
/save - save a new deck (I'll ask for the cards, then a name)
/get - start a quiz on a saved deck
/next - reveal the answer and move to the next question
/list - list your saved decks
/delete - delete a deck
";
pub const MSG_HELLO: &str = "Welcome! Use /help to see commands.";
pub const MSG_UNKNOWN_COMMAND: &str = "Sorry, I didn't understand that. Type /help for usage.";
pub const MSG_ASK_BODY: &str =
    "Send the cards as lines of q: question and a: answer, one pair after another.";
pub const MSG_ASK_NAME: &str = "Got it. Now send a name for this deck.";
pub const MSG_ASK_DELETE_TARGET: &str = "Which deck do you want to delete?";
pub const MSG_ASK_GET_TARGET: &str = "Which deck do you want to practice?";
pub const MSG_SAVED: &str = "Saved!";
pub const MSG_ALREADY_EXISTS: &str = "A deck with that name already exists.";
pub const MSG_INVALID_FORMAT: &str =
    "Invalid format. I need at least one q:/a: pair, each marker on its own line.";
pub const MSG_NO_SUCH_ITEM: &str = "No deck found by that name.";
pub const MSG_NO_SAVED_ITEMS: &str = "You have no saved decks yet.";
pub const MSG_NO_ACTIVE_QUIZ: &str = "No active quiz. Use /get to start one.";
pub const MSG_QUIZ_COMPLETE: &str = "Quiz complete!";

/// Routes every inbound event and owns all transient per-chat state.
pub struct Processor<C, S> {
    pub(crate) client: C,
    pub(crate) store: S,
    pub(crate) conversations: ConversationStore,
}

impl<C: SendMessage, S: ItemStore> Processor<C, S> {
    pub fn new(client: C, store: S) -> Self {
        Self {
            client,
            store,
            conversations: ConversationStore::new(),
        }
    }

    /// Dispatches one event. Pending dialogue steps win over command
    /// parsing; a chat mid-quiz still gets its commands dispatched.
    #[instrument(level = "info", skip(self, event), fields(chat_id = event.chat_id))]
    pub async fn process(&mut self, event: &MessageEvent) -> HandlerResult {
        let text = event.text.trim();
        let chat_id = event.chat_id;
        let user = event.user_name.as_str();
        info!("got new message '{}' from '{}'", text, user);

        match self.conversations.take(chat_id) {
            ChatMode::AwaitingSaveName { body } => {
                self.finish_save(chat_id, user, &body, text).await
            }
            ChatMode::AwaitingSaveBody => {
                self.conversations.set(
                    chat_id,
                    ChatMode::AwaitingSaveName {
                        body: text.to_owned(),
                    },
                );
                self.client.send_message(chat_id, MSG_ASK_NAME).await
            }
            ChatMode::AwaitingDeleteTarget => self.remove_item(chat_id, user, text).await,
            ChatMode::AwaitingGetTarget => self.start_quiz(chat_id, user, text).await,
            mode => {
                // Idle, or a quiz that plain commands leave running.
                self.conversations.set(chat_id, mode);
                self.do_cmd(chat_id, user, text).await
            }
        }
    }

    async fn do_cmd(&mut self, chat_id: i64, user: &str, text: &str) -> HandlerResult {
        match text {
            SAVE_CMD => {
                self.conversations.set(chat_id, ChatMode::AwaitingSaveBody);
                self.client.send_message(chat_id, MSG_ASK_BODY).await
            }
            GET_CMD => {
                self.conversations.set(chat_id, ChatMode::AwaitingGetTarget);
                self.client.send_message(chat_id, MSG_ASK_GET_TARGET).await
            }
            DELETE_CMD => {
                self.conversations
                    .set(chat_id, ChatMode::AwaitingDeleteTarget);
                self.client
                    .send_message(chat_id, MSG_ASK_DELETE_TARGET)
                    .await
            }
            NEXT_CMD => self.advance_quiz(chat_id).await,
            LIST_CMD => self.list_items(chat_id, user).await,
            HELP_CMD => self.client.send_message(chat_id, MSG_HELP).await,
            START_CMD => self.client.send_message(chat_id, MSG_HELLO).await,
            _ => self.client.send_message(chat_id, MSG_UNKNOWN_COMMAND).await,
        }
    }

    /// Final step of the save flow: `body` arrived earlier, `name` just now.
    /// Nothing is persisted unless the body parses and the name is free.
    async fn finish_save(
        &mut self,
        chat_id: i64,
        user: &str,
        body: &str,
        name: &str,
    ) -> HandlerResult {
        if flashcard::parse(body).is_empty() {
            return self.client.send_message(chat_id, MSG_INVALID_FORMAT).await;
        }

        if self.store.is_exists(user, name).await? {
            return self.client.send_message(chat_id, MSG_ALREADY_EXISTS).await;
        }

        let item = Item::new(user, name, body);
        self.store.save(&item).await?;
        info!("saved deck '{}' for '{}'", name, user);
        self.client.send_message(chat_id, MSG_SAVED).await
    }

    async fn remove_item(&mut self, chat_id: i64, user: &str, name: &str) -> HandlerResult {
        if !self.store.is_exists(user, name).await? {
            return self.client.send_message(chat_id, MSG_NO_SUCH_ITEM).await;
        }

        self.store.remove(user, name).await?;
        info!("removed deck '{}' for '{}'", name, user);
        self.client
            .send_message(chat_id, &format!("Deleted deck \u{201c}{name}\u{201d}."))
            .await
    }

    async fn list_items(&mut self, chat_id: i64, user: &str) -> HandlerResult {
        let names = self.store.list(user).await?;
        if names.is_empty() {
            return self.client.send_message(chat_id, MSG_NO_SAVED_ITEMS).await;
        }

        self.client
            .send_message(chat_id, &format!("Your decks:\n{}", names.join("\n")))
            .await
    }
}
