//! Conversation aggregation over the message store.
//!
//! Conversations are never stored. They are recomputed on every request by
//! grouping a user's messages per counterpart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Message, UserSummary};

/// One counterpart's messages folded down to what the inbox needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationThread {
    pub counterpart: Uuid,
    pub last_message: Message,
    /// Messages from the counterpart the user has not read yet.
    pub unread_count: u64,
}

/// Inbox entry as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub user: UserSummary,
    pub last_message: LastMessage,
    pub unread_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub id: Uuid,
    pub text: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for LastMessage {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            text: message.text.clone(),
            read: message.read,
            created_at: message.created_at,
        }
    }
}

/// Group `messages` by counterpart of `user_id`.
///
/// Messages not involving the user are ignored. Result is ordered by the
/// last message's creation time, newest first; equal timestamps keep the
/// order in which the counterparts first appear in `messages`.
pub fn group_conversations(user_id: Uuid, messages: &[Message]) -> Vec<ConversationThread> {
    let mut threads: Vec<ConversationThread> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for message in messages.iter().filter(|m| m.involves(user_id)) {
        let counterpart = message.counterpart(user_id);
        let unread = u64::from(message.receiver_id == user_id && !message.read);

        match index.get(&counterpart) {
            Some(&i) => {
                let thread = &mut threads[i];
                if message.created_at > thread.last_message.created_at {
                    thread.last_message = message.clone();
                }
                thread.unread_count += unread;
            }
            None => {
                index.insert(counterpart, threads.len());
                threads.push(ConversationThread {
                    counterpart,
                    last_message: message.clone(),
                    unread_count: unread,
                });
            }
        }
    }

    threads.sort_by(|a, b| b.last_message.created_at.cmp(&a.last_message.created_at));
    threads
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn message_at(from: Uuid, to: Uuid, text: &str, minutes: i64, read: bool) -> Message {
        let mut m = Message::new(from, to, text.to_string());
        m.created_at = DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minutes);
        m.read = read;
        m
    }

    #[test]
    fn test_one_entry_per_counterpart_with_newest_message() {
        let me = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let eve = Uuid::new_v4();

        let messages = vec![
            message_at(me, bob, "hey bob", 1, true),
            message_at(bob, me, "hi!", 5, false),
            message_at(eve, me, "yo", 3, false),
            message_at(bob, me, "you there?", 4, false),
        ];

        let threads = group_conversations(me, &messages);

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].counterpart, bob);
        assert_eq!(threads[0].last_message.text, "hi!");
        assert_eq!(threads[0].unread_count, 2);
        assert_eq!(threads[1].counterpart, eve);
        assert_eq!(threads[1].unread_count, 1);
    }

    #[test]
    fn test_sent_messages_never_count_as_unread() {
        let me = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let messages = vec![message_at(me, bob, "unread by bob", 1, false)];
        let threads = group_conversations(me, &messages);

        assert_eq!(threads[0].unread_count, 0);
    }

    #[test]
    fn test_ties_keep_storage_order() {
        let me = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let eve = Uuid::new_v4();

        let messages = vec![
            message_at(eve, me, "a", 2, true),
            message_at(bob, me, "b", 2, true),
        ];
        let threads = group_conversations(me, &messages);

        assert_eq!(threads[0].counterpart, eve);
        assert_eq!(threads[1].counterpart, bob);
    }

    #[test]
    fn test_unrelated_messages_ignored() {
        let me = Uuid::new_v4();
        let messages = vec![message_at(Uuid::new_v4(), Uuid::new_v4(), "x", 1, false)];
        assert!(group_conversations(me, &messages).is_empty());
    }
}
