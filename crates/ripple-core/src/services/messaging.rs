//! Direct messages and the conversation inbox.

use std::sync::Arc;

use uuid::Uuid;

use super::Notifier;
use super::views::{Summaries, load_summaries, summary_for};
use crate::domain::{
    Conversation, LastMessage, Message, MessageView, NotificationKind, group_conversations,
};
use crate::error::DomainError;
use crate::ports::{MessageRepository, UserRepository};

#[derive(Clone)]
pub struct Messaging {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl Messaging {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            messages,
            users,
            notifier,
        }
    }

    /// Send a message and notify the receiver on a best-effort basis.
    pub async fn send(
        &self,
        sender: Uuid,
        receiver: Uuid,
        text: &str,
    ) -> Result<MessageView, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("Message text is required"));
        }
        if self.users.find_by_id(receiver).await?.is_none() {
            return Err(DomainError::not_found("User", receiver));
        }

        let message = self
            .messages
            .create(Message::new(sender, receiver, text.to_string()))
            .await?;

        self.notifier
            .notify(receiver, sender, NotificationKind::Message)
            .await;

        tracing::debug!(message_id = %message.id, sender = %sender, receiver = %receiver, "Message sent");

        let summaries = load_summaries(self.users.as_ref(), [sender, receiver]).await?;
        Ok(view(&summaries, message))
    }

    /// History between `requester` and `counterpart`, oldest first.
    ///
    /// Reading is a mutation: everything the counterpart sent to the
    /// requester is marked read in the same store operation.
    pub async fn thread(
        &self,
        requester: Uuid,
        counterpart: Uuid,
    ) -> Result<Vec<MessageView>, DomainError> {
        let messages = self.messages.read_thread(requester, counterpart).await?;
        let summaries = load_summaries(self.users.as_ref(), [requester, counterpart]).await?;
        Ok(messages.into_iter().map(|m| view(&summaries, m)).collect())
    }

    /// Mark the counterpart's messages to `requester` as read.
    pub async fn mark_read(&self, requester: Uuid, counterpart: Uuid) -> Result<u64, DomainError> {
        let updated = self.messages.mark_read(requester, counterpart).await?;
        tracing::debug!(receiver = %requester, sender = %counterpart, updated, "Messages marked read");
        Ok(updated)
    }

    /// One entry per counterpart, newest conversation first.
    pub async fn conversations(&self, user_id: Uuid) -> Result<Vec<Conversation>, DomainError> {
        let messages = self.messages.involving(user_id).await?;
        let threads = group_conversations(user_id, &messages);

        let summaries =
            load_summaries(self.users.as_ref(), threads.iter().map(|t| t.counterpart)).await?;

        Ok(threads
            .into_iter()
            .filter_map(|thread| {
                let user = summaries.get(&thread.counterpart)?.clone();
                Some(Conversation {
                    user,
                    last_message: LastMessage::from(&thread.last_message),
                    unread_count: thread.unread_count,
                })
            })
            .collect())
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<u64, DomainError> {
        Ok(self.messages.unread_count(user_id).await?)
    }
}

fn view(summaries: &Summaries, message: Message) -> MessageView {
    MessageView {
        id: message.id,
        sender: summary_for(summaries, message.sender_id),
        receiver: summary_for(summaries, message.receiver_id),
        text: message.text,
        read: message.read,
        created_at: message.created_at,
    }
}
