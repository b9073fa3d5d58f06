//! Quiz replay: starting a session from a stored deck and stepping it.

use tracing::{info, instrument};

use crate::database::ItemStore;
use crate::flashcard;
use crate::processor::{
    Processor, MSG_INVALID_FORMAT, MSG_NO_ACTIVE_QUIZ, MSG_NO_SUCH_ITEM, MSG_QUIZ_COMPLETE,
};
use crate::state::{ChatMode, QuizSession};
use crate::telegram::SendMessage;
use crate::HandlerResult;

impl<C: SendMessage, S: ItemStore> Processor<C, S> {
    /// Opens a session over the named deck and asks its first question.
    #[instrument(level = "info", skip(self))]
    pub(crate) async fn start_quiz(
        &mut self,
        chat_id: i64,
        user: &str,
        name: &str,
    ) -> HandlerResult {
        let Some(item) = self.store.get(user, name).await? else {
            return self.client.send_message(chat_id, MSG_NO_SUCH_ITEM).await;
        };

        let pairs = flashcard::parse(&item.content);
        if pairs.is_empty() {
            return self.client.send_message(chat_id, MSG_INVALID_FORMAT).await;
        }

        info!("'{}' starts a quiz on '{}' ({} cards)", user, name, pairs.len());
        let first_question = pairs[0].question.clone();
        self.conversations
            .set(chat_id, ChatMode::InQuiz(QuizSession::new(pairs)));
        self.client.send_message(chat_id, &first_question).await
    }

    /// One `/next`: reveal the current answer, then either ask the next
    /// question or finish the session. A failed send leaves the cursor
    /// where the last delivered message put it.
    pub(crate) async fn advance_quiz(&mut self, chat_id: i64) -> HandlerResult {
        let Some(session) = self.conversations.quiz_mut(chat_id) else {
            return self.client.send_message(chat_id, MSG_NO_ACTIVE_QUIZ).await;
        };

        let answer = session.current().answer.clone();
        self.client.send_message(chat_id, &answer).await?;

        if session.advance() {
            let question = session.current().question.clone();
            self.client.send_message(chat_id, &question).await
        } else {
            self.conversations.clear(chat_id);
            self.client.send_message(chat_id, MSG_QUIZ_COMPLETE).await
        }
    }
}
