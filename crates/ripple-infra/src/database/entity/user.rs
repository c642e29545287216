//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use ripple_core::domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub gender: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Domain user with the given graph sets attached.
    pub fn into_domain(
        self,
        followers: Vec<Uuid>,
        following: Vec<Uuid>,
        saved_posts: Vec<Uuid>,
    ) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            display_name: self.display_name,
            avatar: self.avatar,
            bio: self.bio,
            website: self.website,
            phone: self.phone,
            gender: self.gender,
            followers,
            following,
            saved_posts,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel. Graph sets live in
/// their own tables and are not part of the row.
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            display_name: Set(user.display_name),
            avatar: Set(user.avatar),
            bio: Set(user.bio),
            website: Set(user.website),
            phone: Set(user.phone),
            gender: Set(user.gender),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
