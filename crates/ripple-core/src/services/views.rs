//! Resolving ids to display fields for read models.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::domain::{Comment, CommentView, Post, PostView, UserSummary};
use crate::error::RepoError;
use crate::ports::UserRepository;

pub(crate) type Summaries = HashMap<Uuid, UserSummary>;

/// Load display fields for every distinct id in `ids`.
pub(crate) async fn load_summaries(
    users: &dyn UserRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<Summaries, RepoError> {
    let ids: Vec<Uuid> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(Summaries::new());
    }

    let found = users.summaries(&ids).await?;
    Ok(found.into_iter().map(|s| (s.id, s)).collect())
}

/// Summary for `id`, or a bare placeholder when the user no longer resolves.
pub(crate) fn summary_for(summaries: &Summaries, id: Uuid) -> UserSummary {
    summaries.get(&id).cloned().unwrap_or_else(|| UserSummary {
        id,
        username: "unknown".to_string(),
        display_name: None,
        avatar: None,
    })
}

pub(crate) fn comment_view(summaries: &Summaries, comment: Comment) -> CommentView {
    CommentView {
        id: comment.id,
        author: summary_for(summaries, comment.author_id),
        text: comment.text,
        created_at: comment.created_at,
    }
}

/// Resolve authors and comment authors for a batch of posts.
pub(crate) async fn post_views(
    users: &dyn UserRepository,
    posts: Vec<Post>,
) -> Result<Vec<PostView>, RepoError> {
    let ids = posts.iter().flat_map(|p| {
        std::iter::once(p.author_id).chain(p.comments.iter().map(|c| c.author_id))
    });
    let summaries = load_summaries(users, ids).await?;

    Ok(posts
        .into_iter()
        .map(|post| PostView {
            id: post.id,
            author: summary_for(&summaries, post.author_id),
            kind: post.kind,
            media: post.media,
            caption: post.caption,
            location: post.location,
            likes_count: post.likes.len(),
            likes: post.likes,
            comments: post
                .comments
                .into_iter()
                .map(|c| comment_view(&summaries, c))
                .collect(),
            created_at: post.created_at,
        })
        .collect())
}
