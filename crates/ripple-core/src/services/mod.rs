//! Services - the engagement coordinator and the account/content flows
//! around it.
//!
//! Every service receives its storage handles explicitly and performs a
//! short read-modify-write sequence per call. Notification writes go through
//! [`Notifier`], which never lets a failed fan-out fail the parent action.

mod accounts;
mod engagement;
mod graph;
mod messaging;
mod notifications;
mod notifier;
mod posts;
mod views;

pub use accounts::{Accounts, NewAccount, Session};
pub use engagement::{Engagement, LikeOutcome};
pub use graph::SocialGraph;
pub use messaging::Messaging;
pub use notifications::NotificationInbox;
pub use notifier::Notifier;
pub use posts::{NewPost, PostService};
