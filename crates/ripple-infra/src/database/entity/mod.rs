//! SeaORM entities, one per table.

pub mod comment;
pub mod follow;
pub mod message;
pub mod notification;
pub mod post;
pub mod post_like;
pub mod saved_post;
pub mod user;
