use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gender value stored when the user never set one.
pub const DEFAULT_GENDER: &str = "Not specified";

/// User entity - an account plus its follow graph and saved posts.
///
/// `followers`, `following` and `saved_posts` behave as sets: repositories
/// never hand out duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub gender: String,
    #[serde(default)]
    pub followers: Vec<Uuid>,
    #[serde(default)]
    pub following: Vec<Uuid>,
    #[serde(default)]
    pub saved_posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            display_name: None,
            avatar: None,
            bio: None,
            website: None,
            phone: None,
            gender: DEFAULT_GENDER.to_string(),
            followers: Vec::new(),
            following: Vec::new(),
            saved_posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Display fields used wherever another record references this user.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            avatar: self.avatar.clone(),
        }
    }

    /// Apply the supplied fields of a profile update, leaving the rest untouched.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(v) = &update.display_name {
            self.display_name = Some(v.clone());
        }
        if let Some(v) = &update.username {
            self.username = v.clone();
        }
        if let Some(v) = &update.email {
            self.email = v.clone();
        }
        if let Some(v) = &update.bio {
            self.bio = Some(v.clone());
        }
        if let Some(v) = &update.website {
            self.website = Some(v.clone());
        }
        if let Some(v) = &update.phone {
            self.phone = Some(v.clone());
        }
        if let Some(v) = &update.gender {
            self.gender = v.clone();
        }
        if let Some(v) = &update.avatar {
            self.avatar = Some(v.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Public display fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

/// Partial profile edit. `None` means "leave as is".
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn avatar(path: impl Into<String>) -> Self {
        Self {
            avatar: Some(path.into()),
            ..Self::default()
        }
    }
}

/// How a route refers to a user: by id, or by username when the segment
/// is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Id(Uuid),
    Username(String),
}

impl UserKey {
    pub fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Username(raw.to_string()),
        }
    }
}

impl std::fmt::Display for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("ana".into(), "ana@example.com".into(), "hash".into());
        assert_eq!(user.gender, DEFAULT_GENDER);
        assert!(user.followers.is_empty());
        assert!(user.saved_posts.is_empty());
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut user = User::new("ana".into(), "ana@example.com".into(), "hash".into());
        user.bio = Some("old bio".into());

        user.apply(&ProfileUpdate {
            display_name: Some("Ana".into()),
            ..ProfileUpdate::default()
        });

        assert_eq!(user.display_name.as_deref(), Some("Ana"));
        assert_eq!(user.bio.as_deref(), Some("old bio"));
        assert_eq!(user.username, "ana");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("ana".into(), "ana@example.com".into(), "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("savedPosts"));
    }

    #[test]
    fn test_user_key_parse() {
        let id = Uuid::new_v4();
        assert_eq!(UserKey::parse(&id.to_string()), UserKey::Id(id));
        assert_eq!(UserKey::parse("ana"), UserKey::Username("ana".into()));
    }
}
