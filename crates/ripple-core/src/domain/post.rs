use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserSummary;
use crate::error::DomainError;

/// What kind of media a post carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Photo,
    Reel,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Photo => "photo",
            PostKind::Reel => "reel",
        }
    }
}

impl FromStr for PostKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(PostKind::Photo),
            "reel" => Ok(PostKind::Reel),
            other => Err(DomainError::Validation(format!("Unknown post type: {other}"))),
        }
    }
}

/// Post entity - a media upload with its likes and comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub kind: PostKind,
    pub media: Option<String>,
    pub caption: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with no likes or comments.
    pub fn new(
        author_id: Uuid,
        kind: PostKind,
        media: Option<String>,
        caption: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            kind,
            media,
            caption,
            location,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn preview(&self) -> PostPreview {
        PostPreview {
            id: self.id,
            media: self.media.clone(),
            caption: self.caption.clone(),
        }
    }
}

/// A comment embedded in a post. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a comment from raw input. The stored text is trimmed and must
    /// not be empty.
    pub fn new(author_id: Uuid, text: &str) -> Result<Self, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation(
                "Comment text is required".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            text: text.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// Comment with its author's display fields resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub author: UserSummary,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Post as rendered in feeds: author and comment authors resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub author: UserSummary,
    pub kind: PostKind,
    pub media: Option<String>,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub likes: Vec<Uuid>,
    pub likes_count: usize,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
}

/// Minimal post reference shown next to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPreview {
    pub id: Uuid,
    pub media: Option<String>,
    pub caption: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_text_is_trimmed() {
        let comment = Comment::new(Uuid::new_v4(), "  nice shot  ").unwrap();
        assert_eq!(comment.text, "nice shot");
    }

    #[test]
    fn test_blank_comment_rejected() {
        let result = Comment::new(Uuid::new_v4(), "   \n\t");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_post_kind_parse() {
        assert_eq!("reel".parse::<PostKind>().unwrap(), PostKind::Reel);
        assert!("story".parse::<PostKind>().is_err());
    }
}
