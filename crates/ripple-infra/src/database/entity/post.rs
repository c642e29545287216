//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use ripple_core::domain::{Comment, Post, PostKind};
use ripple_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub kind: String,
    pub media: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub caption: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::post_like::Entity")]
    Like,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Like.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Domain post with its liker set and comment thread attached.
    pub fn into_domain(self, likes: Vec<Uuid>, comments: Vec<Comment>) -> Result<Post, RepoError> {
        let kind: PostKind = self
            .kind
            .parse()
            .map_err(|_| RepoError::Query(format!("Unknown post kind in row: {}", self.kind)))?;

        Ok(Post {
            id: self.id,
            author_id: self.author_id,
            kind,
            media: self.media,
            caption: self.caption,
            location: self.location,
            likes,
            comments,
            created_at: self.created_at.into(),
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            kind: Set(post.kind.as_str().to_string()),
            media: Set(post.media),
            caption: Set(post.caption),
            location: Set(post.location),
            created_at: Set(post.created_at.into()),
        }
    }
}
