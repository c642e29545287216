//! Domain entities - the core business objects.

mod conversation;
mod message;
mod notification;
mod post;
mod user;

pub use conversation::{Conversation, ConversationThread, LastMessage, group_conversations};
pub use message::{Message, MessageView};
pub use notification::{Notification, NotificationKind, NotificationType, NotificationView};
pub use post::{Comment, CommentView, Post, PostKind, PostPreview, PostView};
pub use user::{DEFAULT_GENDER, ProfileUpdate, User, UserKey, UserSummary};
