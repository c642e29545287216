//! Signup, signin and profile management.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ProfileUpdate, User, UserKey};
use crate::error::DomainError;
use crate::ports::{
    AuthError, MediaError, MediaStore, MediaUpload, PasswordService, TokenService, UserRepository,
};

const MIN_PASSWORD_LEN: usize = 6;
const SEARCH_LIMIT: u64 = 20;

/// Input for a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub avatar: Option<MediaUpload>,
}

/// A signed-in user and their access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    media: Arc<dyn MediaStore>,
}

impl Accounts {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            media,
        }
    }

    pub async fn signup(&self, account: NewAccount) -> Result<User, DomainError> {
        let username = account.username.trim().to_string();
        let email = account.email.trim().to_lowercase();

        if username.is_empty() {
            return Err(DomainError::validation("Username is required"));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("Invalid email address"));
        }
        if account.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Duplicate("Username already taken".to_string()));
        }
        if self.users.find_by_login(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(&account.password)?;

        let mut user = User::new(username, email, password_hash);
        user.bio = account.bio.filter(|b| !b.trim().is_empty());
        if let Some(upload) = account.avatar {
            user.avatar = Some(self.store_avatar(upload).await?);
        }

        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    /// Sign in with an email or a username.
    pub async fn signin(&self, login: &str, password: &str) -> Result<Session, DomainError> {
        let login = login.trim();
        let user = match self.users.find_by_login(login).await? {
            Some(user) => user,
            None => match self.users.find_by_login(&login.to_lowercase()).await? {
                Some(user) => user,
                None => return Err(AuthError::InvalidCredentials.into()),
            },
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.generate_token(user.id, &user.username)?;
        Ok(Session {
            token,
            expires_in: self.tokens.expiration_seconds(),
            user,
        })
    }

    pub async fn get(&self, key: &UserKey) -> Result<User, DomainError> {
        let found = match key {
            UserKey::Id(id) => self.users.find_by_id(*id).await?,
            UserKey::Username(name) => self.users.find_by_username(name).await?,
        };
        found.ok_or_else(|| DomainError::not_found("User", key))
    }

    /// Edit the profile of `key`. Users may only edit themselves.
    pub async fn update_profile(
        &self,
        actor: Uuid,
        key: &UserKey,
        mut update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let target = self.owned(actor, key).await?;

        if let Some(username) = &update.username {
            let username = username.trim();
            if username.is_empty() {
                return Err(DomainError::validation("Username cannot be empty"));
            }
            update.username = Some(username.to_string());
        }
        if let Some(email) = &update.email {
            let email = email.trim().to_lowercase();
            if !email.contains('@') {
                return Err(DomainError::validation("Invalid email address"));
            }
            update.email = Some(email);
        }

        self.users
            .update_profile(target.id, update)
            .await?
            .ok_or_else(|| DomainError::not_found("User", target.id))
    }

    pub async fn update_avatar(
        &self,
        actor: Uuid,
        key: &UserKey,
        upload: MediaUpload,
    ) -> Result<User, DomainError> {
        let target = self.owned(actor, key).await?;
        let path = self.store_avatar(upload).await?;

        self.users
            .update_profile(target.id, ProfileUpdate::avatar(path))
            .await?
            .ok_or_else(|| DomainError::not_found("User", target.id))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<User>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("Search query is required"));
        }
        let users = self.users.search(query, SEARCH_LIMIT).await?;
        tracing::debug!(query = %query, found = users.len(), "User search");
        Ok(users)
    }

    async fn owned(&self, actor: Uuid, key: &UserKey) -> Result<User, DomainError> {
        let target = self.get(key).await?;
        if target.id != actor {
            return Err(DomainError::Forbidden(
                "You can only edit your own profile".to_string(),
            ));
        }
        Ok(target)
    }

    async fn store_avatar(&self, upload: MediaUpload) -> Result<String, DomainError> {
        if !upload.is_image() {
            return Err(MediaError::UnsupportedType(upload.content_type).into());
        }
        Ok(self.media.store(upload).await?)
    }
}
